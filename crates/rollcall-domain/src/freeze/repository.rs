use async_trait::async_trait;
use chrono::NaiveDate;

use super::FreezeToken;
use crate::shared::{DomainError, EventId, FreezeId, UserId};

#[async_trait]
pub trait StreakFreezeRepository: Send + Sync {
    async fn save(&self, token: &FreezeToken) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &FreezeId) -> Result<Option<FreezeToken>, DomainError>;

    /// Unused tokens still valid on `today`, oldest first.
    async fn list_available(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        today: NaiveDate,
    ) -> Result<Vec<FreezeToken>, DomainError>;

    /// Every token for the pair, oldest first.
    async fn list_all(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<Vec<FreezeToken>, DomainError>;

    /// Mark the oldest available token as used on `today` with one
    /// conditional update. `None` means nothing was claimable.
    async fn claim_oldest_available(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        today: NaiveDate,
    ) -> Result<Option<FreezeId>, DomainError>;
}
