use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

use super::ParticipantSummary;
use crate::shared::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub current_streak: u32,
    pub last_check_in_day: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInCountEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub total_checkins: u32,
    pub last_check_in_day: NaiveDate,
}

/// Highest current streak first, as a read on `today` sees it: a run whose
/// last check-in is older than yesterday counts as 0 unless the participant is
/// in `freeze_holders` and only one day was missed. Equal streaks go to
/// whoever reached theirs first (earliest last check-in), then by user id so
/// the order is total.
pub fn rank_by_streak(
    participants: Vec<ParticipantSummary>,
    today: NaiveDate,
    freeze_holders: &HashSet<UserId>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut scored: Vec<(u32, ParticipantSummary)> = participants
        .into_iter()
        .map(|p| {
            let current = p.current_streak(today, freeze_holders.contains(&p.user_id));
            (current, p)
        })
        .collect();

    scored.sort_by(|(a_streak, a), (b_streak, b)| {
        b_streak
            .cmp(a_streak)
            .then(a.last_check_in_day.cmp(&b.last_check_in_day))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    scored
        .into_iter()
        .take(limit)
        .zip(1u32..)
        .map(|((current_streak, p), rank)| LeaderboardEntry {
            rank,
            user_id: p.user_id,
            current_streak,
            last_check_in_day: p.last_check_in_day,
        })
        .collect()
}

/// Most check-ins first; ties favour the most recently active participant.
pub fn rank_by_checkins(
    mut participants: Vec<ParticipantSummary>,
    limit: usize,
) -> Vec<CheckInCountEntry> {
    participants.sort_by_key(|p| {
        (
            Reverse(p.total_checkins),
            Reverse(p.last_check_in_day),
            p.user_id.clone(),
        )
    });

    participants
        .into_iter()
        .take(limit)
        .zip(1u32..)
        .map(|(p, rank)| CheckInCountEntry {
            rank,
            user_id: p.user_id,
            total_checkins: p.total_checkins,
            last_check_in_day: p.last_check_in_day,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, n).unwrap()
    }

    fn summary(user: &UserId, latest: u32, last: NaiveDate, total: u32) -> ParticipantSummary {
        ParticipantSummary {
            user_id: user.clone(),
            latest_streak: latest,
            last_check_in_day: last,
            total_checkins: total,
            best_streak: latest,
        }
    }

    fn no_freezes() -> HashSet<UserId> {
        HashSet::new()
    }

    #[test]
    fn test_streak_ties_broken_by_earliest_day() {
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());
        // b's last check-in is two days back; a pending freeze keeps it alive.
        let holders: HashSet<UserId> = [b.clone()].into_iter().collect();
        let ranked = rank_by_streak(
            vec![
                summary(&a, 5, day(2), 5),
                summary(&b, 5, day(1), 5),
                summary(&c, 3, day(3), 3),
            ],
            day(3),
            &holders,
            10,
        );

        let got: Vec<_> = ranked
            .iter()
            .map(|e| (e.last_check_in_day, e.current_streak))
            .collect();
        assert_eq!(got, vec![(day(1), 5), (day(2), 5), (day(3), 3)]);
        assert_eq!(ranked[0].user_id, b);
        assert_eq!(
            ranked.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_lapsed_run_ranks_below_active_one() {
        let (quitter, active) = (UserId::new(), UserId::new());
        let ranked = rank_by_streak(
            vec![summary(&quitter, 5, day(5), 5), summary(&active, 2, day(20), 2)],
            day(20),
            &no_freezes(),
            10,
        );

        assert_eq!(ranked[0].user_id, active);
        assert_eq!(ranked[0].current_streak, 2);
        assert_eq!(ranked[1].user_id, quitter);
        assert_eq!(ranked[1].current_streak, 0);
    }

    #[test]
    fn test_one_missed_day_without_freeze_drops_to_zero() {
        let user = UserId::new();
        let entries = vec![summary(&user, 4, day(8), 4)];

        let without = rank_by_streak(entries.clone(), day(10), &no_freezes(), 10);
        assert_eq!(without[0].current_streak, 0);

        let holders: HashSet<UserId> = [user].into_iter().collect();
        let with = rank_by_streak(entries, day(10), &holders, 10);
        assert_eq!(with[0].current_streak, 4);
    }

    #[test]
    fn test_full_tie_falls_back_to_user_id() {
        let a = UserId::from_string("00000000-0000-4000-8000-000000000001");
        let b = UserId::from_string("00000000-0000-4000-8000-000000000002");
        let ranked = rank_by_streak(
            vec![summary(&b, 2, day(1), 2), summary(&a, 2, day(1), 2)],
            day(1),
            &no_freezes(),
            10,
        );
        assert_eq!(ranked[0].user_id, a);
        assert_eq!(ranked[1].user_id, b);
    }

    #[test]
    fn test_limit_truncates() {
        let entries: Vec<_> = (1..=5)
            .map(|n| summary(&UserId::new(), n, day(5), n))
            .collect();
        let ranked = rank_by_streak(entries, day(5), &no_freezes(), 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].current_streak, 5);
    }

    #[test]
    fn test_checkin_ranking_prefers_recent_activity_on_tie() {
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());
        let ranked = rank_by_checkins(
            vec![
                summary(&a, 1, day(3), 7),
                summary(&b, 1, day(9), 7),
                summary(&c, 1, day(1), 12),
            ],
            10,
        );
        assert_eq!(ranked[0].user_id, c);
        assert_eq!(ranked[1].user_id, b);
        assert_eq!(ranked[2].user_id, a);
    }

    #[test]
    fn test_empty_input_gives_empty_board() {
        assert!(rank_by_streak(Vec::new(), day(1), &no_freezes(), 10).is_empty());
        assert!(rank_by_checkins(Vec::new(), 10).is_empty());
    }
}
