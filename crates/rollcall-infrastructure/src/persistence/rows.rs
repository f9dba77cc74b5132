//! Row types shared by the pooled repositories and the check-in transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rollcall_domain::check_in::CheckIn;
use rollcall_domain::freeze::FreezeToken;
use rollcall_domain::leaderboard::ParticipantSummary;
use rollcall_domain::shared::{CheckInId, DomainError, EventId, FreezeId, UserId};
use sqlx::FromRow;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Days are stored as 'YYYY-MM-DD' text so range comparisons sort correctly.
pub(crate) fn day_key(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub(crate) fn parse_day(value: &str, column: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value, DAY_FORMAT).map_err(|e| {
        DomainError::DataIntegrity(format!("Invalid {}: {} ({})", column, value, e))
    })
}

pub(crate) fn parse_optional_day(
    value: Option<String>,
    column: &str,
) -> Result<Option<NaiveDate>, DomainError> {
    value.map(|v| parse_day(&v, column)).transpose()
}

pub(crate) fn to_count(value: i64, column: &str) -> Result<u32, DomainError> {
    u32::try_from(value)
        .map_err(|_| DomainError::DataIntegrity(format!("Invalid {}: {}", column, value)))
}

#[derive(FromRow)]
pub(crate) struct CheckInRow {
    id: String,
    user_id: String,
    event_id: String,
    day: String,
    checked_in_at: DateTime<Utc>,
    note: Option<String>,
    mood: Option<String>,
    streak_count_at_time: i64,
}

impl CheckInRow {
    pub(crate) const COLUMNS: &'static str =
        "id, user_id, event_id, day, checked_in_at, note, mood, streak_count_at_time";

    pub(crate) fn try_into_check_in(self) -> Result<CheckIn, DomainError> {
        Ok(CheckIn::restore(
            CheckInId::from_string(&self.id),
            UserId::from_string(&self.user_id),
            EventId::from_string(&self.event_id),
            parse_day(&self.day, "check-in day")?,
            self.checked_in_at,
            self.note,
            self.mood,
            to_count(self.streak_count_at_time, "streak_count_at_time")?,
        ))
    }
}

#[derive(FromRow)]
pub(crate) struct FreezeRow {
    id: String,
    user_id: String,
    event_id: String,
    is_used: bool,
    used_on_day: Option<String>,
    expiry_day: Option<String>,
    created_at: DateTime<Utc>,
}

impl FreezeRow {
    pub(crate) const COLUMNS: &'static str =
        "id, user_id, event_id, is_used, used_on_day, expiry_day, created_at";

    pub(crate) fn try_into_token(self) -> Result<FreezeToken, DomainError> {
        Ok(FreezeToken::restore(
            FreezeId::from_string(&self.id),
            UserId::from_string(&self.user_id),
            EventId::from_string(&self.event_id),
            self.is_used,
            parse_optional_day(self.used_on_day, "used_on_day")?,
            parse_optional_day(self.expiry_day, "expiry_day")?,
            self.created_at,
        ))
    }
}

#[derive(FromRow)]
pub(crate) struct ParticipantRow {
    user_id: String,
    latest_streak: i64,
    last_day: String,
    total_checkins: i64,
    best_streak: i64,
}

impl ParticipantRow {
    pub(crate) fn try_into_summary(self) -> Result<ParticipantSummary, DomainError> {
        Ok(ParticipantSummary {
            user_id: UserId::from_string(&self.user_id),
            latest_streak: to_count(self.latest_streak, "latest_streak")?,
            last_check_in_day: parse_day(&self.last_day, "last check-in day")?,
            total_checkins: to_count(self.total_checkins, "total_checkins")?,
            best_streak: to_count(self.best_streak, "best_streak")?,
        })
    }
}
