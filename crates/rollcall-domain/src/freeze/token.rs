use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, EventId, FreezeId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreezeStatus {
    Available,
    Consumed,
    Expired,
}

impl FreezeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FreezeStatus::Available => "available",
            FreezeStatus::Consumed => "consumed",
            FreezeStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for FreezeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token that bridges one missed day of a streak.
///
/// Consumption is terminal. Expiry is terminal too, but derived from the
/// date rather than stored: a token with `expiry_day` is usable only while
/// `today < expiry_day`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeToken {
    id: FreezeId,
    user_id: UserId,
    event_id: EventId,
    is_used: bool,
    used_on_day: Option<NaiveDate>,
    expiry_day: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl FreezeToken {
    pub fn grant(
        user_id: UserId,
        event_id: EventId,
        expiry_day: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let today = now.date_naive();
        if let Some(expiry) = expiry_day {
            if expiry <= today {
                return Err(DomainError::Validation(format!(
                    "Freeze expiry {expiry} must be after today ({today})"
                )));
            }
        }

        Ok(Self {
            id: FreezeId::new(),
            user_id,
            event_id,
            is_used: false,
            used_on_day: None,
            expiry_day,
            created_at: now,
        })
    }

    pub fn restore(
        id: FreezeId,
        user_id: UserId,
        event_id: EventId,
        is_used: bool,
        used_on_day: Option<NaiveDate>,
        expiry_day: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            event_id,
            is_used,
            used_on_day,
            expiry_day,
            created_at,
        }
    }

    pub fn status(&self, today: NaiveDate) -> FreezeStatus {
        if self.is_used {
            FreezeStatus::Consumed
        } else if self.expiry_day.is_some_and(|expiry| today >= expiry) {
            FreezeStatus::Expired
        } else {
            FreezeStatus::Available
        }
    }

    pub fn is_available(&self, today: NaiveDate) -> bool {
        self.status(today) == FreezeStatus::Available
    }

    pub fn consume(&mut self, today: NaiveDate) -> Result<(), DomainError> {
        match self.status(today) {
            FreezeStatus::Available => {
                self.is_used = true;
                self.used_on_day = Some(today);
                Ok(())
            }
            FreezeStatus::Consumed => Err(DomainError::Validation(format!(
                "Freeze {} was already used",
                self.id
            ))),
            FreezeStatus::Expired => Err(DomainError::Validation(format!(
                "Freeze {} has expired",
                self.id
            ))),
        }
    }

    pub fn id(&self) -> &FreezeId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn is_used(&self) -> bool {
        self.is_used
    }

    pub fn used_on_day(&self) -> Option<NaiveDate> {
        self.used_on_day
    }

    pub fn expiry_day(&self) -> Option<NaiveDate> {
        self.expiry_day
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
