use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{CheckInId, DomainError, EventId, UserId};

pub const MAX_NOTE_CHARS: usize = 500;
pub const MAX_MOOD_CHARS: usize = 50;

/// One day's check-in for a (user, event) pair.
///
/// The streak value is computed before the record is written and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    id: CheckInId,
    user_id: UserId,
    event_id: EventId,
    day: NaiveDate,
    checked_in_at: DateTime<Utc>,
    note: Option<String>,
    mood: Option<String>,
    streak_count_at_time: u32,
}

impl CheckIn {
    /// Build a new check-in at `checked_in_at`; the UTC calendar date becomes
    /// its day.
    pub fn record(
        user_id: UserId,
        event_id: EventId,
        checked_in_at: DateTime<Utc>,
        note: Option<String>,
        mood: Option<String>,
        streak_count_at_time: u32,
    ) -> Result<Self, DomainError> {
        if streak_count_at_time == 0 {
            return Err(DomainError::Validation(
                "A recorded check-in must carry a streak of at least 1".to_string(),
            ));
        }

        Ok(Self {
            id: CheckInId::new(),
            user_id,
            event_id,
            day: checked_in_at.date_naive(),
            checked_in_at,
            note: normalize_text("note", note, MAX_NOTE_CHARS)?,
            mood: normalize_text("mood", mood, MAX_MOOD_CHARS)?,
            streak_count_at_time,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: CheckInId,
        user_id: UserId,
        event_id: EventId,
        day: NaiveDate,
        checked_in_at: DateTime<Utc>,
        note: Option<String>,
        mood: Option<String>,
        streak_count_at_time: u32,
    ) -> Self {
        Self {
            id,
            user_id,
            event_id,
            day,
            checked_in_at,
            note,
            mood,
            streak_count_at_time,
        }
    }

    pub fn id(&self) -> &CheckInId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn checked_in_at(&self) -> DateTime<Utc> {
        self.checked_in_at
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn mood(&self) -> Option<&str> {
        self.mood.as_deref()
    }

    pub fn streak_count_at_time(&self) -> u32 {
        self.streak_count_at_time
    }
}

/// Blank input is stored as absent; anything longer than `max` characters is
/// rejected rather than truncated.
pub(crate) fn normalize_text(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, DomainError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}
