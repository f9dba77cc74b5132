use async_trait::async_trait;

use super::Event;
use crate::shared::{DomainError, UserId};

/// Listings beyond the plain paging of [`crate::shared::Repository::list`].
#[async_trait]
pub trait EventDirectoryRepository: Send + Sync {
    /// Public events, oldest first.
    async fn list_public(&self, skip: u32, limit: u32) -> Result<Vec<Event>, DomainError>;

    /// Events created by `creator_id`, public or not.
    async fn list_by_creator(
        &self,
        creator_id: &UserId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Event>, DomainError>;
}
