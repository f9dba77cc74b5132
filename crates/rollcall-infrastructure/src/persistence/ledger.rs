//! Ledger SQL, written once against any SQLite executor so the same statements
//! run on the pool (reads) and inside the check-in transaction.

use chrono::NaiveDate;
use rollcall_domain::check_in::CheckIn;
use rollcall_domain::freeze::FreezeToken;
use rollcall_domain::leaderboard::ParticipantSummary;
use rollcall_domain::shared::{DomainError, EventId, FreezeId, UserId};
use sqlx::{Executor, Sqlite};

use super::rows::{day_key, to_count, CheckInRow, ParticipantRow};
use super::RepositoryErrorMapper;

pub(crate) async fn latest_check_in<'e, E>(
    executor: E,
    user_id: &UserId,
    event_id: &EventId,
) -> Result<Option<CheckIn>, DomainError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = format!(
        "SELECT {} FROM check_ins WHERE user_id = ?1 AND event_id = ?2 ORDER BY day DESC LIMIT 1",
        CheckInRow::COLUMNS
    );

    let row: Option<CheckInRow> = sqlx::query_as(&query)
        .bind(user_id.as_str())
        .bind(event_id.as_str())
        .fetch_optional(executor)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find latest check-in"))?;

    row.map(CheckInRow::try_into_check_in).transpose()
}

/// `from <= day < until`, compared on the stored day text.
pub(crate) async fn has_check_in_between<'e, E>(
    executor: E,
    user_id: &UserId,
    event_id: &EventId,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<bool, DomainError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = r#"
        SELECT EXISTS(
            SELECT 1 FROM check_ins
            WHERE user_id = ?1 AND event_id = ?2 AND day >= ?3 AND day < ?4
        )
    "#;

    let exists: bool = sqlx::query_scalar(query)
        .bind(user_id.as_str())
        .bind(event_id.as_str())
        .bind(day_key(from))
        .bind(day_key(until))
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Check existing check-in"))?;

    Ok(exists)
}

pub(crate) async fn longest_streak<'e, E>(
    executor: E,
    user_id: &UserId,
    event_id: &EventId,
) -> Result<u32, DomainError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = r#"
        SELECT COALESCE(MAX(streak_count_at_time), 0)
        FROM check_ins
        WHERE user_id = ?1 AND event_id = ?2
    "#;

    let max: i64 = sqlx::query_scalar(query)
        .bind(user_id.as_str())
        .bind(event_id.as_str())
        .fetch_one(executor)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find longest streak"))?;

    to_count(max, "longest streak")
}

pub(crate) async fn participant_summaries<'e, E>(
    executor: E,
    event_id: &EventId,
) -> Result<Vec<ParticipantSummary>, DomainError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = r#"
        SELECT
            c.user_id AS user_id,
            (
                SELECT l.streak_count_at_time
                FROM check_ins l
                WHERE l.user_id = c.user_id AND l.event_id = c.event_id
                ORDER BY l.day DESC
                LIMIT 1
            ) AS latest_streak,
            MAX(c.day) AS last_day,
            COUNT(*) AS total_checkins,
            MAX(c.streak_count_at_time) AS best_streak
        FROM check_ins c
        WHERE c.event_id = ?1
        GROUP BY c.user_id, c.event_id
    "#;

    let rows: Vec<ParticipantRow> = sqlx::query_as(query)
        .bind(event_id.as_str())
        .fetch_all(executor)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Summarize participants"))?;

    rows.into_iter().map(ParticipantRow::try_into_summary).collect()
}

pub(crate) async fn insert_check_in<'e, E>(executor: E, check_in: &CheckIn) -> Result<(), DomainError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = r#"
        INSERT INTO check_ins (id, user_id, event_id, day, checked_in_at, note, mood, streak_count_at_time)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    "#;

    sqlx::query(query)
        .bind(check_in.id().as_str())
        .bind(check_in.user_id().as_str())
        .bind(check_in.event_id().as_str())
        .bind(day_key(check_in.day()))
        .bind(check_in.checked_in_at())
        .bind(check_in.note())
        .bind(check_in.mood())
        .bind(i64::from(check_in.streak_count_at_time()))
        .execute(executor)
        .await
        .map_err(|e| {
            RepositoryErrorMapper::map_check_in_insert_error(
                e,
                &format!("{} on {}", check_in.event_id(), check_in.day()),
            )
        })?;

    Ok(())
}

pub(crate) async fn insert_freeze<'e, E>(executor: E, token: &FreezeToken) -> Result<(), DomainError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = r#"
        INSERT INTO streak_freezes (id, user_id, event_id, is_used, used_on_day, expiry_day, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#;

    sqlx::query(query)
        .bind(token.id().as_str())
        .bind(token.user_id().as_str())
        .bind(token.event_id().as_str())
        .bind(token.is_used())
        .bind(token.used_on_day().map(day_key))
        .bind(token.expiry_day().map(day_key))
        .bind(token.created_at())
        .execute(executor)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Save streak freeze"))?;

    Ok(())
}

/// Claim the oldest usable freeze in one statement. The inner select picks a
/// candidate and the outer `is_used = 0` guard makes a concurrent claim of the
/// same row update nothing.
pub(crate) async fn claim_oldest_freeze<'e, E>(
    executor: E,
    user_id: &UserId,
    event_id: &EventId,
    today: NaiveDate,
) -> Result<Option<FreezeId>, DomainError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let query = r#"
        UPDATE streak_freezes
        SET is_used = 1, used_on_day = ?3
        WHERE id = (
            SELECT id FROM streak_freezes
            WHERE user_id = ?1
              AND event_id = ?2
              AND is_used = 0
              AND (expiry_day IS NULL OR expiry_day > ?3)
            ORDER BY created_at ASC, rowid ASC
            LIMIT 1
        )
        AND is_used = 0
        RETURNING id
    "#;

    let claimed: Option<String> = sqlx::query_scalar(query)
        .bind(user_id.as_str())
        .bind(event_id.as_str())
        .bind(day_key(today))
        .fetch_optional(executor)
        .await
        .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Claim streak freeze"))?;

    Ok(claimed.map(|id| FreezeId::from_string(&id)))
}
