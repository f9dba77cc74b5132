use async_trait::async_trait;

use super::StreakState;
use crate::shared::{DomainError, UserId};

/// Read side of the per-pair streak cache written by each check-in.
#[async_trait]
pub trait StreakStateRepository: Send + Sync {
    /// Cached states of every event the user has checked in to, as stored
    /// at the time of their latest check-in.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<StreakState>, DomainError>;
}
