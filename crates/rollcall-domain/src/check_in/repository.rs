use async_trait::async_trait;
use chrono::NaiveDate;

use super::CheckIn;
use crate::leaderboard::ParticipantSummary;
use crate::shared::{DomainError, EventId, UserId};

/// Read access to the ledger. Writes only happen inside a
/// [`crate::shared::CheckInTransaction`].
#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Most recent check-in for the pair, by day.
    async fn find_latest(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<Option<CheckIn>, DomainError>;

    /// Whether a check-in exists with `from <= day < until`.
    async fn has_check_in_between(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<bool, DomainError>;

    /// Highest stored streak for the pair, 0 when there are no check-ins.
    async fn longest_streak(&self, user_id: &UserId, event_id: &EventId)
        -> Result<u32, DomainError>;

    /// The pair's check-ins, newest day first.
    async fn list_for_pair(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<CheckIn>, DomainError>;

    /// Every check-in of an event, newest day first.
    async fn list_for_event(
        &self,
        event_id: &EventId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<CheckIn>, DomainError>;

    /// One row per participant of the event.
    async fn participant_summaries(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<ParticipantSummary>, DomainError>;

    /// Events the user has at least one check-in for.
    async fn events_for_user(&self, user_id: &UserId) -> Result<Vec<EventId>, DomainError>;
}
