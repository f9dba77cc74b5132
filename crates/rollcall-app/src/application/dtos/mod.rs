mod check_in_dto;
mod directory_dto;
mod freeze_dto;
mod leaderboard_dto;
mod streak_dto;

pub use check_in_dto::CheckInDto;
pub use directory_dto::{EventDto, UserDto};
pub use freeze_dto::FreezeDto;
pub use leaderboard_dto::{CheckInCountEntryDto, EventSummaryDto, LeaderboardEntryDto};
pub use streak_dto::StreakDto;

use chrono::NaiveDate;

/// Dates cross the boundary as `YYYY-MM-DD`.
pub(crate) fn date_string(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
