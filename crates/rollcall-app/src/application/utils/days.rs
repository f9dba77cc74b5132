use chrono::{Days, NaiveDate};
use rollcall_domain::shared::DomainError;

/// The calendar day after `day`, the exclusive end of a one-day range.
pub fn next_day(day: NaiveDate) -> Result<NaiveDate, DomainError> {
    day.checked_add_days(Days::new(1))
        .ok_or_else(|| DomainError::Validation(format!("No calendar day after {}", day)))
}
