mod aggregate;
mod ranking;
mod repository;

pub use aggregate::EventAggregate;
pub use ranking::{rank_by_checkins, rank_by_streak, CheckInCountEntry, LeaderboardEntry};
pub use repository::EventAggregateRepository;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::UserId;
use crate::streak::{DayGap, LastCheckIn, StreakCalculator};

/// What the ledger knows about one participant of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub user_id: UserId,
    /// Streak stored on the participant's most recent check-in.
    pub latest_streak: u32,
    pub last_check_in_day: NaiveDate,
    pub total_checkins: u32,
    /// Highest streak the participant ever stored in this event.
    pub best_streak: u32,
}

impl ParticipantSummary {
    fn last_check_in(&self) -> LastCheckIn {
        LastCheckIn {
            day: self.last_check_in_day,
            streak: self.latest_streak,
        }
    }

    /// Whether the streak only survives on `today` if a freeze is available.
    pub fn needs_freeze_on(&self, today: NaiveDate) -> bool {
        DayGap::between(self.last_check_in_day, today) == DayGap::OneMissedDay
    }

    /// The streak a read on `today` reports; same rule as a single pair.
    pub fn current_streak(&self, today: NaiveDate, freeze_available: bool) -> u32 {
        StreakCalculator::current(Some(self.last_check_in()), today, freeze_available)
    }
}
