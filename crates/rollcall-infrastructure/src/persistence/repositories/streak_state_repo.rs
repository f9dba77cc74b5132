use async_trait::async_trait;
use rollcall_domain::shared::{DomainError, EventId, UserId};
use rollcall_domain::streak::{StreakState, StreakStateRepository};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::rows::{parse_optional_day, to_count};
use crate::persistence::SqliteRepositoryBase;

#[derive(FromRow)]
struct StreakStateRow {
    user_id: String,
    event_id: String,
    current_streak: i64,
    longest_streak: i64,
    last_check_in_day: Option<String>,
}

impl StreakStateRow {
    fn try_into_state(self) -> Result<StreakState, DomainError> {
        Ok(StreakState::restore(
            UserId::from_string(&self.user_id),
            EventId::from_string(&self.event_id),
            to_count(self.current_streak, "current_streak")?,
            to_count(self.longest_streak, "longest_streak")?,
            parse_optional_day(self.last_check_in_day, "last_check_in_day")?,
        ))
    }
}

pub struct SqliteStreakStateRepository {
    base: SqliteRepositoryBase,
}

impl SqliteStreakStateRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl StreakStateRepository for SqliteStreakStateRepository {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<StreakState>, DomainError> {
        let query = r#"
            SELECT user_id, event_id, current_streak, longest_streak, last_check_in_day
            FROM streak_states
            WHERE user_id = ?1
            ORDER BY last_check_in_day DESC, event_id ASC
        "#;

        let rows: Vec<StreakStateRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(user_id.as_str()),
                "List streak states",
            )
            .await?;

        rows.into_iter().map(StreakStateRow::try_into_state).collect()
    }
}
