use chrono::NaiveDate;

use crate::check_in::CheckIn;

/// How far the latest check-in lies behind today, in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayGap {
    /// Latest check-in is today (or, with a skewed clock, later).
    SameDay,
    /// Latest check-in was yesterday.
    Consecutive,
    /// Exactly one calendar day was skipped.
    OneMissedDay,
    /// Two or more days were skipped.
    Broken,
}

impl DayGap {
    pub fn between(latest: NaiveDate, today: NaiveDate) -> Self {
        match (today - latest).num_days() {
            d if d <= 0 => DayGap::SameDay,
            1 => DayGap::Consecutive,
            2 => DayGap::OneMissedDay,
            _ => DayGap::Broken,
        }
    }
}

/// The parts of the latest check-in the calculator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastCheckIn {
    pub day: NaiveDate,
    pub streak: u32,
}

impl From<&CheckIn> for LastCheckIn {
    fn from(check_in: &CheckIn) -> Self {
        Self {
            day: check_in.day(),
            streak: check_in.streak_count_at_time(),
        }
    }
}

/// Streak value for a check-in that is about to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakPlan {
    Settled(u32),
    /// One missed day: the outcome depends on whether a freeze can be claimed.
    NeedsFreeze { bridged: u32, reset: u32 },
}

impl StreakPlan {
    pub fn needs_freeze(&self) -> bool {
        matches!(self, StreakPlan::NeedsFreeze { .. })
    }

    pub fn resolve(self, freeze_claimed: bool) -> u32 {
        match self {
            StreakPlan::Settled(value) => value,
            StreakPlan::NeedsFreeze { bridged, reset } => {
                if freeze_claimed {
                    bridged
                } else {
                    reset
                }
            }
        }
    }
}

/// Streak rules for a single (user, event) pair.
pub struct StreakCalculator;

impl StreakCalculator {
    /// Plan the streak stored on a check-in made `today`.
    ///
    /// A claimed freeze stands in for the missed day, so today continues the
    /// run as if yesterday had been checked.
    pub fn plan_next(latest: Option<LastCheckIn>, today: NaiveDate) -> StreakPlan {
        let Some(latest) = latest else {
            return StreakPlan::Settled(1);
        };

        match DayGap::between(latest.day, today) {
            DayGap::SameDay => StreakPlan::Settled(latest.streak),
            DayGap::Consecutive => StreakPlan::Settled(latest.streak.saturating_add(1)),
            DayGap::OneMissedDay => StreakPlan::NeedsFreeze {
                bridged: latest.streak.saturating_add(1),
                reset: 1,
            },
            DayGap::Broken => StreakPlan::Settled(1),
        }
    }

    /// Current streak as seen by a read. Never consumes anything: a pending
    /// freeze only keeps the value alive.
    pub fn current(latest: Option<LastCheckIn>, today: NaiveDate, freeze_available: bool) -> u32 {
        let Some(latest) = latest else {
            return 0;
        };

        match DayGap::between(latest.day, today) {
            DayGap::SameDay | DayGap::Consecutive => latest.streak,
            DayGap::OneMissedDay if freeze_available => latest.streak,
            DayGap::OneMissedDay | DayGap::Broken => 0,
        }
    }

    pub fn longest(historical_max: u32, current: u32) -> u32 {
        historical_max.max(current)
    }
}
