use async_trait::async_trait;
use chrono::NaiveDate;
use rollcall_domain::check_in::{CheckIn, CheckInRepository};
use rollcall_domain::leaderboard::ParticipantSummary;
use rollcall_domain::shared::{DomainError, EventId, UserId};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::persistence::ledger;
use crate::persistence::rows::CheckInRow;
use crate::persistence::SqliteRepositoryBase;

pub struct SqliteCheckInRepository {
    base: SqliteRepositoryBase,
}

impl SqliteCheckInRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl CheckInRepository for SqliteCheckInRepository {
    async fn find_latest(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<Option<CheckIn>, DomainError> {
        ledger::latest_check_in(self.base.pool(), user_id, event_id).await
    }

    async fn has_check_in_between(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<bool, DomainError> {
        ledger::has_check_in_between(self.base.pool(), user_id, event_id, from, until).await
    }

    async fn longest_streak(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<u32, DomainError> {
        ledger::longest_streak(self.base.pool(), user_id, event_id).await
    }

    async fn list_for_pair(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<CheckIn>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM check_ins
            WHERE user_id = ?1 AND event_id = ?2
            ORDER BY day DESC
            LIMIT ?3 OFFSET ?4
        "#,
            CheckInRow::COLUMNS
        );

        let rows: Vec<CheckInRow> = self
            .base
            .fetch_all(
                sqlx::query_as(&query)
                    .bind(user_id.as_str())
                    .bind(event_id.as_str())
                    .bind(i64::from(limit))
                    .bind(i64::from(skip)),
                "List check-ins for user and event",
            )
            .await?;

        rows.into_iter().map(CheckInRow::try_into_check_in).collect()
    }

    async fn list_for_event(
        &self,
        event_id: &EventId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<CheckIn>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM check_ins
            WHERE event_id = ?1
            ORDER BY day DESC, checked_in_at DESC
            LIMIT ?2 OFFSET ?3
        "#,
            CheckInRow::COLUMNS
        );

        let rows: Vec<CheckInRow> = self
            .base
            .fetch_all(
                sqlx::query_as(&query)
                    .bind(event_id.as_str())
                    .bind(i64::from(limit))
                    .bind(i64::from(skip)),
                "List check-ins for event",
            )
            .await?;

        rows.into_iter().map(CheckInRow::try_into_check_in).collect()
    }

    async fn participant_summaries(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<ParticipantSummary>, DomainError> {
        ledger::participant_summaries(self.base.pool(), event_id).await
    }

    async fn events_for_user(&self, user_id: &UserId) -> Result<Vec<EventId>, DomainError> {
        let query = "SELECT DISTINCT event_id FROM check_ins WHERE user_id = ?1 ORDER BY event_id";

        let ids: Vec<(String,)> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(user_id.as_str()),
                "List events for user",
            )
            .await?;

        Ok(ids.into_iter().map(|(id,)| EventId::from_string(&id)).collect())
    }
}
