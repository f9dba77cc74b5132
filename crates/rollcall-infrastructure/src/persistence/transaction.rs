use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rollcall_domain::check_in::CheckIn;
use rollcall_domain::freeze::FreezeToken;
use rollcall_domain::leaderboard::{EventAggregate, ParticipantSummary};
use rollcall_domain::shared::transaction::{CheckInTransaction, CheckInUnitOfWork};
use rollcall_domain::shared::{DomainError, EventId, FreezeId, UserId};
use rollcall_domain::streak::StreakState;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;

use super::rows::day_key;
use super::{ledger, RepositoryErrorMapper};

/// A check-in unit of work on one pooled connection.
///
/// The sqlx transaction rolls back when dropped, so an early `?` return
/// anywhere in the check-in leaves nothing behind.
pub struct SqliteCheckInTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteCheckInTransaction {
    pub fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl CheckInTransaction for SqliteCheckInTransaction {
    async fn has_check_in_between(
        &mut self,
        user_id: &UserId,
        event_id: &EventId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<bool, DomainError> {
        ledger::has_check_in_between(&mut *self.tx, user_id, event_id, from, until).await
    }

    async fn latest_check_in(
        &mut self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<Option<CheckIn>, DomainError> {
        ledger::latest_check_in(&mut *self.tx, user_id, event_id).await
    }

    async fn longest_streak(
        &mut self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<u32, DomainError> {
        ledger::longest_streak(&mut *self.tx, user_id, event_id).await
    }

    async fn claim_oldest_freeze(
        &mut self,
        user_id: &UserId,
        event_id: &EventId,
        today: NaiveDate,
    ) -> Result<Option<FreezeId>, DomainError> {
        ledger::claim_oldest_freeze(&mut *self.tx, user_id, event_id, today).await
    }

    async fn insert_check_in(&mut self, check_in: &CheckIn) -> Result<(), DomainError> {
        ledger::insert_check_in(&mut *self.tx, check_in).await
    }

    async fn grant_freeze(&mut self, token: &FreezeToken) -> Result<(), DomainError> {
        ledger::insert_freeze(&mut *self.tx, token).await
    }

    async fn participant_summaries(
        &mut self,
        event_id: &EventId,
    ) -> Result<Vec<ParticipantSummary>, DomainError> {
        ledger::participant_summaries(&mut *self.tx, event_id).await
    }

    async fn save_event_aggregate(
        &mut self,
        aggregate: &EventAggregate,
    ) -> Result<(), DomainError> {
        let leaders = serde_json::to_string(&aggregate.streak_leader_user_ids)
            .map_err(|e| RepositoryErrorMapper::map_json_error(e, "Encode streak leaders"))?;

        let query = r#"
            INSERT INTO event_aggregates (event_id, total_checkins, highest_streak, streak_leader_user_ids, avg_streak, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(event_id) DO UPDATE SET
                total_checkins = ?2,
                highest_streak = ?3,
                streak_leader_user_ids = ?4,
                avg_streak = ?5,
                updated_at = ?6
        "#;

        sqlx::query(query)
            .bind(aggregate.event_id.as_str())
            .bind(i64::from(aggregate.total_checkins))
            .bind(i64::from(aggregate.highest_streak))
            .bind(leaders)
            .bind(i64::from(aggregate.avg_streak))
            .bind(aggregate.updated_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Save event aggregate"))?;

        Ok(())
    }

    async fn save_streak_state(
        &mut self,
        state: &StreakState,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO streak_states (user_id, event_id, current_streak, longest_streak, last_check_in_day, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id, event_id) DO UPDATE SET
                current_streak = ?3,
                longest_streak = MAX(streak_states.longest_streak, ?4),
                last_check_in_day = ?5,
                updated_at = ?6
        "#;

        sqlx::query(query)
            .bind(state.user_id().as_str())
            .bind(state.event_id().as_str())
            .bind(i64::from(state.current_streak()))
            .bind(i64::from(state.longest_streak()))
            .bind(state.last_check_in_day().map(day_key))
            .bind(updated_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Save streak state"))?;

        Ok(())
    }

    async fn record_user_check_in(
        &mut self,
        user_id: &UserId,
        streak: u32,
    ) -> Result<(), DomainError> {
        let query = r#"
            UPDATE users
            SET total_checkins = total_checkins + 1,
                longest_streak = MAX(longest_streak, ?2)
            WHERE id = ?1
        "#;

        let result = sqlx::query(query)
            .bind(user_id.as_str())
            .bind(i64::from(streak))
            .execute(&mut *self.tx)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Update user counters"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let this = *self;
        this.tx
            .commit()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Commit check-in"))
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        let this = *self;
        this.tx
            .rollback()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Roll back check-in"))
    }
}

/// Opens check-in transactions with `BEGIN IMMEDIATE`: the write lock is
/// taken before the first read, so a concurrent check-in waits on the busy
/// timeout and then sees the rows committed ahead of it.
pub struct SqliteCheckInUnitOfWork {
    pool: Arc<SqlitePool>,
}

impl SqliteCheckInUnitOfWork {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckInUnitOfWork for SqliteCheckInUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn CheckInTransaction>, DomainError> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Begin check-in"))?;

        Ok(Box::new(SqliteCheckInTransaction::new(tx)))
    }
}
