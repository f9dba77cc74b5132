use async_trait::async_trait;

use super::User;
use crate::shared::DomainError;

#[async_trait]
pub trait UserRankingRepository: Send + Sync {
    /// Users by their best run in any event, then by check-in count.
    async fn top_by_longest_streak(&self, limit: u32) -> Result<Vec<User>, DomainError>;
}
