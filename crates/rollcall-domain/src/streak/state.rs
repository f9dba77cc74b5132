use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{LastCheckIn, StreakCalculator};
use crate::shared::{EventId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    user_id: UserId,
    event_id: EventId,
    current_streak: u32,
    longest_streak: u32,
    last_check_in_day: Option<NaiveDate>,
}

impl StreakState {
    /// Derive the state for a pair from its latest check-in and the highest
    /// streak it has ever stored.
    pub fn derive(
        user_id: UserId,
        event_id: EventId,
        latest: Option<LastCheckIn>,
        historical_max: u32,
        today: NaiveDate,
        freeze_available: bool,
    ) -> Self {
        let current = StreakCalculator::current(latest, today, freeze_available);
        Self {
            user_id,
            event_id,
            current_streak: current,
            longest_streak: StreakCalculator::longest(historical_max, current),
            last_check_in_day: latest.map(|l| l.day),
        }
    }

    /// State right after a check-in was stored with `streak` on `day`.
    pub fn after_check_in(
        user_id: UserId,
        event_id: EventId,
        day: NaiveDate,
        streak: u32,
        previous_longest: u32,
    ) -> Self {
        Self {
            user_id,
            event_id,
            current_streak: streak,
            longest_streak: previous_longest.max(streak),
            last_check_in_day: Some(day),
        }
    }

    /// The cached state as a read on `today` sees it. The cached current
    /// streak is the one stored on the latest check-in, so the usual decay
    /// applies; the longest never shrinks.
    pub fn as_of(&self, today: NaiveDate, freeze_available: bool) -> Self {
        let latest = self.last_check_in_day.map(|day| LastCheckIn {
            day,
            streak: self.current_streak,
        });
        Self::derive(
            self.user_id.clone(),
            self.event_id.clone(),
            latest,
            self.longest_streak,
            today,
            freeze_available,
        )
    }

    pub fn restore(
        user_id: UserId,
        event_id: EventId,
        current_streak: u32,
        longest_streak: u32,
        last_check_in_day: Option<NaiveDate>,
    ) -> Self {
        Self {
            user_id,
            event_id,
            current_streak,
            longest_streak: longest_streak.max(current_streak),
            last_check_in_day,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn last_check_in_day(&self) -> Option<NaiveDate> {
        self.last_check_in_day
    }
}
