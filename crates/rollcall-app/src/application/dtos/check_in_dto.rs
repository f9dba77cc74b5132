use rollcall_domain::check_in::CheckIn;
use serde::{Deserialize, Serialize};

use super::date_string;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInDto {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub day: String,          // YYYY-MM-DD (UTC)
    pub checked_in_at: String, // RFC 3339
    pub note: Option<String>,
    pub mood: Option<String>,
    pub streak_count_at_time: u32,
}

impl From<&CheckIn> for CheckInDto {
    fn from(check_in: &CheckIn) -> Self {
        Self {
            id: check_in.id().to_string(),
            user_id: check_in.user_id().to_string(),
            event_id: check_in.event_id().to_string(),
            day: date_string(check_in.day()),
            checked_in_at: check_in.checked_in_at().to_rfc3339(),
            note: check_in.note().map(str::to_string),
            mood: check_in.mood().map(str::to_string),
            streak_count_at_time: check_in.streak_count_at_time(),
        }
    }
}
