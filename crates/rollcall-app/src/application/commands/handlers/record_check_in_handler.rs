use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;

use rollcall_domain::check_in::CheckIn;
use rollcall_domain::event::Event;
use rollcall_domain::freeze::FreezeToken;
use rollcall_domain::leaderboard::EventAggregate;
use rollcall_domain::shared::{
    CheckInTransaction, CheckInUnitOfWork, Clock, DomainError, EventId, FreezeId, Repository,
    UserId,
};
use rollcall_domain::streak::{LastCheckIn, StreakCalculator, StreakState};
use rollcall_domain::user::User;

use crate::application::commands::check_in_commands::*;
use crate::application::commands::command_handler::CommandHandler;
use crate::application::config::StreakConfig;
use crate::application::dtos::{CheckInDto, FreezeDto};
use crate::application::services::PairLocks;
use crate::application::utils::next_day;

/// Records one check-in.
///
/// Everything after the existence checks runs under the pair's lock and in
/// one storage transaction; any error rolls the whole check-in back,
/// including a freeze it had already claimed.
pub struct RecordCheckInCommandHandler {
    user_repo: Arc<dyn Repository<User>>,
    event_repo: Arc<dyn Repository<Event>>,
    unit_of_work: Arc<dyn CheckInUnitOfWork>,
    locks: Arc<PairLocks>,
    clock: Arc<dyn Clock>,
    streak_config: StreakConfig,
}

struct Recorded {
    check_in: CheckIn,
    freeze_used: Option<FreezeId>,
    milestone_freeze: Option<FreezeToken>,
}

impl RecordCheckInCommandHandler {
    pub fn new(
        user_repo: Arc<dyn Repository<User>>,
        event_repo: Arc<dyn Repository<Event>>,
        unit_of_work: Arc<dyn CheckInUnitOfWork>,
        locks: Arc<PairLocks>,
        clock: Arc<dyn Clock>,
        streak_config: StreakConfig,
    ) -> Self {
        Self {
            user_repo,
            event_repo,
            unit_of_work,
            locks,
            clock,
            streak_config,
        }
    }

    async fn record(
        &self,
        tx: &mut dyn CheckInTransaction,
        user_id: &UserId,
        event_id: &EventId,
        cmd: RecordCheckInCommand,
        now: DateTime<Utc>,
    ) -> Result<Recorded, DomainError> {
        let today = now.date_naive();
        let tomorrow = next_day(today)?;

        // 1. One check-in per calendar day
        if tx
            .has_check_in_between(user_id, event_id, today, tomorrow)
            .await?
        {
            return Err(DomainError::DuplicateCheckIn(format!(
                "user {} already checked in to event {} on {}",
                user_id, event_id, today
            )));
        }

        // 2. Streak for today's record
        let latest = tx
            .latest_check_in(user_id, event_id)
            .await?
            .as_ref()
            .map(LastCheckIn::from);
        let previous_longest = tx.longest_streak(user_id, event_id).await?;

        let plan = StreakCalculator::plan_next(latest, today);
        let freeze_used = if plan.needs_freeze() {
            tx.claim_oldest_freeze(user_id, event_id, today).await?
        } else {
            None
        };
        let streak = plan.resolve(freeze_used.is_some());

        // 3. Store it
        let check_in = CheckIn::record(
            user_id.clone(),
            event_id.clone(),
            now,
            cmd.note,
            cmd.mood,
            streak,
        )?;
        tx.insert_check_in(&check_in).await?;

        // 4. Milestone reward
        let milestone_freeze = if self.streak_config.milestone_reached(streak) {
            let token = FreezeToken::grant(
                user_id.clone(),
                event_id.clone(),
                self.streak_config.default_expiry(today),
                now,
            )?;
            tx.grant_freeze(&token).await?;
            Some(token)
        } else {
            None
        };

        // 5. Derived caches
        let participants = tx.participant_summaries(event_id).await?;
        let aggregate = EventAggregate::from_summaries(event_id.clone(), &participants, now);
        tx.save_event_aggregate(&aggregate).await?;

        let state = StreakState::after_check_in(
            user_id.clone(),
            event_id.clone(),
            today,
            streak,
            previous_longest,
        );
        tx.save_streak_state(&state, now).await?;
        tx.record_user_check_in(user_id, streak).await?;

        Ok(Recorded {
            check_in,
            freeze_used,
            milestone_freeze,
        })
    }
}

#[async_trait]
impl CommandHandler<RecordCheckInCommand> for RecordCheckInCommandHandler {
    type Result = RecordCheckInResult;

    async fn handle(&self, cmd: RecordCheckInCommand) -> Result<Self::Result, DomainError> {
        let user_id = UserId::parse(&cmd.user_id)?;
        let event_id = EventId::parse(&cmd.event_id)?;

        self.user_repo.require(&user_id).await?;
        self.event_repo.require(&event_id).await?;

        let _pair_guard = self.locks.lock(&user_id, &event_id).await;
        let now = self.clock.now();

        let mut tx = self.unit_of_work.begin().await?;
        let recorded = match self
            .record(tx.as_mut(), &user_id, &event_id, cmd, now)
            .await
        {
            Ok(recorded) => recorded,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(
                        "[check_in] Rollback failed for user {} in event {}: {}",
                        user_id, event_id, rollback_err
                    );
                }
                warn!(
                    "[check_in] Check-in rejected for user {} in event {}: {}",
                    user_id,
                    event_id,
                    e.format_with_code()
                );
                return Err(e);
            }
        };
        tx.commit().await?;

        let check_in = &recorded.check_in;
        info!(
            "[check_in] User {} checked in to event {} on {} (streak {}{})",
            user_id,
            event_id,
            check_in.day(),
            check_in.streak_count_at_time(),
            if recorded.freeze_used.is_some() {
                ", freeze used"
            } else {
                ""
            }
        );
        if let Some(token) = &recorded.milestone_freeze {
            info!(
                "[freeze] Milestone freeze {} granted to user {} in event {}",
                token.id(),
                user_id,
                event_id
            );
        }

        let today = now.date_naive();
        Ok(RecordCheckInResult {
            check_in: CheckInDto::from(check_in),
            freeze_used: recorded.freeze_used.map(|id| id.to_string()),
            milestone_freeze: recorded
                .milestone_freeze
                .as_ref()
                .map(|token| FreezeDto::from_token(token, today)),
        })
    }
}
