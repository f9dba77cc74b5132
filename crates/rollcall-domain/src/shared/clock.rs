use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::sync::RwLock;

/// Source of "now" for every day comparison in the domain.
///
/// All day arithmetic is done on UTC calendar dates, never on elapsed
/// 24-hour windows: 23:59 and 00:01 the next day are consecutive days.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Clock pinned to `time` on `day` (UTC).
    pub fn at(day: NaiveDate, time: NaiveTime) -> Self {
        Self::new(day.and_time(time).and_utc())
    }

    /// Clock pinned to noon of `day` (UTC).
    pub fn on_day(day: NaiveDate) -> Self {
        Self::at(day, NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn set_day(&self, day: NaiveDate) {
        let time = self.now().time();
        self.set(day.and_time(time).and_utc());
    }

    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances_by_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let clock = FixedClock::at(day, NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        assert_eq!(clock.today(), day);

        clock.advance(Duration::minutes(2));
        assert_eq!(clock.today(), day.succ_opt().unwrap());
    }

    #[test]
    fn test_set_day_keeps_time_of_day() {
        let clock = FixedClock::on_day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let target = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        clock.set_day(target);
        assert_eq!(clock.today(), target);
        assert_eq!(clock.now().time(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }
}
