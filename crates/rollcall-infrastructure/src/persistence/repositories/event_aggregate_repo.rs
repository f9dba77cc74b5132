use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_domain::leaderboard::{EventAggregate, EventAggregateRepository};
use rollcall_domain::shared::{DomainError, EventId, UserId};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::rows::to_count;
use crate::persistence::{RepositoryErrorMapper, SqliteRepositoryBase};

#[derive(FromRow)]
struct EventAggregateRow {
    event_id: String,
    total_checkins: i64,
    highest_streak: i64,
    streak_leader_user_ids: String,
    avg_streak: i64,
    updated_at: DateTime<Utc>,
}

impl EventAggregateRow {
    fn try_into_aggregate(self) -> Result<EventAggregate, DomainError> {
        let leaders: Vec<String> = serde_json::from_str(&self.streak_leader_user_ids)
            .map_err(|e| RepositoryErrorMapper::map_json_error(e, "Decode streak leaders"))?;

        Ok(EventAggregate {
            event_id: EventId::from_string(&self.event_id),
            total_checkins: to_count(self.total_checkins, "total_checkins")?,
            highest_streak: to_count(self.highest_streak, "highest_streak")?,
            streak_leader_user_ids: leaders.iter().map(|id| UserId::from_string(id)).collect(),
            avg_streak: to_count(self.avg_streak, "avg_streak")?,
            updated_at: self.updated_at,
        })
    }
}

pub struct SqliteEventAggregateRepository {
    base: SqliteRepositoryBase,
}

impl SqliteEventAggregateRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl EventAggregateRepository for SqliteEventAggregateRepository {
    async fn find_by_event(
        &self,
        event_id: &EventId,
    ) -> Result<Option<EventAggregate>, DomainError> {
        let query = r#"
            SELECT event_id, total_checkins, highest_streak, streak_leader_user_ids, avg_streak, updated_at
            FROM event_aggregates
            WHERE event_id = ?1
        "#;

        let row: Option<EventAggregateRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(query).bind(event_id.as_str()),
                "Find event aggregate",
            )
            .await?;

        row.map(EventAggregateRow::try_into_aggregate).transpose()
    }
}
