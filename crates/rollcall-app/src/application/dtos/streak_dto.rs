use rollcall_domain::streak::StreakState;
use serde::{Deserialize, Serialize};

use super::date_string;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakDto {
    pub user_id: String,
    pub event_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_check_in_day: Option<String>, // YYYY-MM-DD
    pub available_freezes: u32,
}

impl StreakDto {
    pub fn from_state(state: &StreakState, available_freezes: u32) -> Self {
        Self {
            user_id: state.user_id().to_string(),
            event_id: state.event_id().to_string(),
            current_streak: state.current_streak(),
            longest_streak: state.longest_streak(),
            last_check_in_day: state.last_check_in_day().map(date_string),
            available_freezes,
        }
    }
}
