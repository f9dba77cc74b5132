use rollcall_domain::leaderboard::{CheckInCountEntry, EventAggregate, LeaderboardEntry};
use serde::{Deserialize, Serialize};

use super::date_string;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntryDto {
    pub rank: u32,
    pub user_id: String,
    pub current_streak: u32,
    pub last_check_in_day: String,
}

impl From<LeaderboardEntry> for LeaderboardEntryDto {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            user_id: entry.user_id.to_string(),
            current_streak: entry.current_streak,
            last_check_in_day: date_string(entry.last_check_in_day),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInCountEntryDto {
    pub rank: u32,
    pub user_id: String,
    pub total_checkins: u32,
    pub last_check_in_day: String,
}

impl From<CheckInCountEntry> for CheckInCountEntryDto {
    fn from(entry: CheckInCountEntry) -> Self {
        Self {
            rank: entry.rank,
            user_id: entry.user_id.to_string(),
            total_checkins: entry.total_checkins,
            last_check_in_day: date_string(entry.last_check_in_day),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummaryDto {
    pub event_id: String,
    pub total_checkins: u32,
    pub highest_streak: u32,
    pub streak_leader_user_ids: Vec<String>,
    pub avg_streak: u32,
    pub updated_at: String,
}

impl From<EventAggregate> for EventSummaryDto {
    fn from(aggregate: EventAggregate) -> Self {
        Self {
            event_id: aggregate.event_id.to_string(),
            total_checkins: aggregate.total_checkins,
            highest_streak: aggregate.highest_streak,
            streak_leader_user_ids: aggregate
                .streak_leader_user_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
            avg_streak: aggregate.avg_streak,
            updated_at: aggregate.updated_at.to_rfc3339(),
        }
    }
}
