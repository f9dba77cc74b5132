use async_trait::async_trait;
use chrono::NaiveDate;
use rollcall_domain::freeze::{FreezeToken, StreakFreezeRepository};
use rollcall_domain::shared::{DomainError, EventId, FreezeId, UserId};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::persistence::ledger;
use crate::persistence::rows::{day_key, FreezeRow};
use crate::persistence::SqliteRepositoryBase;

pub struct SqliteStreakFreezeRepository {
    base: SqliteRepositoryBase,
}

impl SqliteStreakFreezeRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl StreakFreezeRepository for SqliteStreakFreezeRepository {
    async fn save(&self, token: &FreezeToken) -> Result<(), DomainError> {
        ledger::insert_freeze(self.base.pool(), token).await
    }

    async fn find_by_id(&self, id: &FreezeId) -> Result<Option<FreezeToken>, DomainError> {
        let query = format!("SELECT {} FROM streak_freezes WHERE id = ?1", FreezeRow::COLUMNS);

        let row: Option<FreezeRow> = self
            .base
            .fetch_optional(sqlx::query_as(&query).bind(id.as_str()), "Find streak freeze")
            .await?;

        row.map(FreezeRow::try_into_token).transpose()
    }

    async fn list_available(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        today: NaiveDate,
    ) -> Result<Vec<FreezeToken>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM streak_freezes
            WHERE user_id = ?1
              AND event_id = ?2
              AND is_used = 0
              AND (expiry_day IS NULL OR expiry_day > ?3)
            ORDER BY created_at ASC, rowid ASC
        "#,
            FreezeRow::COLUMNS
        );

        let rows: Vec<FreezeRow> = self
            .base
            .fetch_all(
                sqlx::query_as(&query)
                    .bind(user_id.as_str())
                    .bind(event_id.as_str())
                    .bind(day_key(today)),
                "List available streak freezes",
            )
            .await?;

        rows.into_iter().map(FreezeRow::try_into_token).collect()
    }

    async fn list_all(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<Vec<FreezeToken>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM streak_freezes
            WHERE user_id = ?1 AND event_id = ?2
            ORDER BY created_at ASC, rowid ASC
        "#,
            FreezeRow::COLUMNS
        );

        let rows: Vec<FreezeRow> = self
            .base
            .fetch_all(
                sqlx::query_as(&query)
                    .bind(user_id.as_str())
                    .bind(event_id.as_str()),
                "List streak freezes",
            )
            .await?;

        rows.into_iter().map(FreezeRow::try_into_token).collect()
    }

    async fn claim_oldest_available(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        today: NaiveDate,
    ) -> Result<Option<FreezeId>, DomainError> {
        let claimed = ledger::claim_oldest_freeze(self.base.pool(), user_id, event_id, today).await?;
        if let Some(id) = &claimed {
            tracing::info!(freeze_id = %id, user_id = %user_id, event_id = %event_id, "Streak freeze claimed");
        }
        Ok(claimed)
    }
}
