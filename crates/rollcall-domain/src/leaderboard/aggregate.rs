use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ParticipantSummary;
use crate::shared::{EventId, UserId};

/// Cached per-event statistics, rebuilt on every check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAggregate {
    pub event_id: EventId,
    pub total_checkins: u32,
    pub highest_streak: u32,
    /// Everyone who reached `highest_streak`, sorted by id.
    pub streak_leader_user_ids: Vec<UserId>,
    /// Truncated mean of each participant's latest streak.
    pub avg_streak: u32,
    pub updated_at: DateTime<Utc>,
}

impl EventAggregate {
    pub fn empty(event_id: EventId, now: DateTime<Utc>) -> Self {
        Self {
            event_id,
            total_checkins: 0,
            highest_streak: 0,
            streak_leader_user_ids: Vec::new(),
            avg_streak: 0,
            updated_at: now,
        }
    }

    pub fn from_summaries(
        event_id: EventId,
        participants: &[ParticipantSummary],
        now: DateTime<Utc>,
    ) -> Self {
        if participants.is_empty() {
            return Self::empty(event_id, now);
        }

        let total_checkins = participants.iter().map(|p| p.total_checkins).sum();
        let highest_streak = participants
            .iter()
            .map(|p| p.best_streak)
            .max()
            .unwrap_or(0);

        let mut streak_leader_user_ids: Vec<UserId> = participants
            .iter()
            .filter(|p| highest_streak > 0 && p.best_streak == highest_streak)
            .map(|p| p.user_id.clone())
            .collect();
        streak_leader_user_ids.sort();

        let latest_sum: u64 = participants.iter().map(|p| u64::from(p.latest_streak)).sum();
        let avg_streak = (latest_sum / participants.len() as u64) as u32;

        Self {
            event_id,
            total_checkins,
            highest_streak,
            streak_leader_user_ids,
            avg_streak,
            updated_at: now,
        }
    }
}
