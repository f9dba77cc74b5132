use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::{DomainError, EventId, FreezeId, UserId};
use crate::check_in::CheckIn;
use crate::freeze::FreezeToken;
use crate::leaderboard::{EventAggregate, ParticipantSummary};
use crate::streak::StreakState;

/// One check-in as a single storage transaction.
///
/// Every read and write the check-in needs goes through the same handle, so
/// the duplicate check, the freeze claim and the insert either all land or
/// none of them do. Dropping the handle without `commit` rolls back.
#[async_trait]
pub trait CheckInTransaction: Send {
    /// Whether the pair has a check-in with `from <= day < until`.
    async fn has_check_in_between(
        &mut self,
        user_id: &UserId,
        event_id: &EventId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<bool, DomainError>;

    async fn latest_check_in(
        &mut self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<Option<CheckIn>, DomainError>;

    /// Highest `streak_count_at_time` ever stored for the pair (0 if none).
    async fn longest_streak(
        &mut self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<u32, DomainError>;

    /// Atomically mark the oldest available freeze as used on `today`.
    async fn claim_oldest_freeze(
        &mut self,
        user_id: &UserId,
        event_id: &EventId,
        today: NaiveDate,
    ) -> Result<Option<FreezeId>, DomainError>;

    /// Insert the check-in. A clash on (user, event, day) is `DuplicateCheckIn`.
    async fn insert_check_in(&mut self, check_in: &CheckIn) -> Result<(), DomainError>;

    async fn grant_freeze(&mut self, token: &FreezeToken) -> Result<(), DomainError>;

    async fn participant_summaries(
        &mut self,
        event_id: &EventId,
    ) -> Result<Vec<ParticipantSummary>, DomainError>;

    async fn save_event_aggregate(&mut self, aggregate: &EventAggregate)
        -> Result<(), DomainError>;

    /// Upsert the pair's cached state; the stored longest never decreases.
    async fn save_streak_state(
        &mut self,
        state: &StreakState,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Bump the user's cached counters for one more check-in.
    async fn record_user_check_in(
        &mut self,
        user_id: &UserId,
        streak: u32,
    ) -> Result<(), DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}

/// Opens [`CheckInTransaction`]s.
#[async_trait]
pub trait CheckInUnitOfWork: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn CheckInTransaction>, DomainError>;
}
