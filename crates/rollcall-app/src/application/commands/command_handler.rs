use async_trait::async_trait;
use rollcall_domain::shared::DomainError;

/// Marker for anything a [`CommandHandler`] accepts.
pub trait Command: Send + Sync {}

#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    type Result;

    async fn handle(&self, command: C) -> Result<Self::Result, DomainError>;
}
