use futures::future::try_join_all;
use log::debug;
use std::sync::Arc;

use rollcall_domain::check_in::CheckInRepository;
use rollcall_domain::event::Event;
use rollcall_domain::freeze::StreakFreezeRepository;
use rollcall_domain::shared::{Clock, DomainError, EventId, Repository, UserId};
use rollcall_domain::streak::{LastCheckIn, StreakState, StreakStateRepository};
use rollcall_domain::user::User;

use crate::application::config::LeaderboardConfig;
use crate::application::dtos::{CheckInDto, StreakDto};
use crate::application::services::freeze_service::parse_pair;
use crate::application::utils::next_day;

/// Side-effect free streak reads. A pending freeze keeps a streak alive
/// here but is never consumed.
pub struct StreakQueries {
    user_repo: Arc<dyn Repository<User>>,
    event_repo: Arc<dyn Repository<Event>>,
    check_in_repo: Arc<dyn CheckInRepository>,
    freeze_repo: Arc<dyn StreakFreezeRepository>,
    streak_state_repo: Arc<dyn StreakStateRepository>,
    clock: Arc<dyn Clock>,
    paging: LeaderboardConfig,
}

impl StreakQueries {
    pub fn new(
        user_repo: Arc<dyn Repository<User>>,
        event_repo: Arc<dyn Repository<Event>>,
        check_in_repo: Arc<dyn CheckInRepository>,
        freeze_repo: Arc<dyn StreakFreezeRepository>,
        streak_state_repo: Arc<dyn StreakStateRepository>,
        clock: Arc<dyn Clock>,
        paging: LeaderboardConfig,
    ) -> Self {
        Self {
            user_repo,
            event_repo,
            check_in_repo,
            freeze_repo,
            streak_state_repo,
            clock,
            paging,
        }
    }

    /// Current and longest streak for the pair.
    pub async fn compute_streak(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<StreakDto, DomainError> {
        let (user_id, event_id) = parse_pair(user_id, event_id)?;
        self.user_repo.require(&user_id).await?;
        self.event_repo.require(&event_id).await?;

        self.streak_for(&user_id, &event_id).await
    }

    /// One entry per event the user has checked in to, served from the
    /// cached pair states and decayed to today.
    pub async fn user_streaks(&self, user_id: &str) -> Result<Vec<StreakDto>, DomainError> {
        let user_id = UserId::parse(user_id)?;
        self.user_repo.require(&user_id).await?;

        let today = self.clock.today();
        let states = self.streak_state_repo.list_for_user(&user_id).await?;
        debug!(
            "[streak] Reading {} cached streaks for user {}",
            states.len(),
            user_id
        );

        let available = try_join_all(states.iter().map(|state| {
            self.freeze_repo
                .list_available(state.user_id(), state.event_id(), today)
        }))
        .await?;

        Ok(states
            .iter()
            .zip(available)
            .map(|(state, freezes)| {
                StreakDto::from_state(
                    &state.as_of(today, !freezes.is_empty()),
                    u32::try_from(freezes.len()).unwrap_or(u32::MAX),
                )
            })
            .collect())
    }

    pub async fn has_checked_in_today(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<bool, DomainError> {
        let (user_id, event_id) = parse_pair(user_id, event_id)?;
        let today = self.clock.today();
        let tomorrow = next_day(today)?;

        self.check_in_repo
            .has_check_in_between(&user_id, &event_id, today, tomorrow)
            .await
    }

    /// The pair's check-ins, newest day first.
    pub async fn check_in_history(
        &self,
        user_id: &str,
        event_id: &str,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<CheckInDto>, DomainError> {
        let (user_id, event_id) = parse_pair(user_id, event_id)?;
        let page = self.paging.page(skip, limit);

        let check_ins = self
            .check_in_repo
            .list_for_pair(&user_id, &event_id, page.skip, page.limit)
            .await?;
        Ok(check_ins.iter().map(CheckInDto::from).collect())
    }

    /// Every participant's check-ins for an event, newest day first.
    pub async fn event_check_ins(
        &self,
        event_id: &str,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<CheckInDto>, DomainError> {
        let event_id = EventId::parse(event_id)?;
        self.event_repo.require(&event_id).await?;
        let page = self.paging.page(skip, limit);

        let check_ins = self
            .check_in_repo
            .list_for_event(&event_id, page.skip, page.limit)
            .await?;
        Ok(check_ins.iter().map(CheckInDto::from).collect())
    }

    async fn streak_for(
        &self,
        user_id: &UserId,
        event_id: &EventId,
    ) -> Result<StreakDto, DomainError> {
        let today = self.clock.today();

        let latest = self
            .check_in_repo
            .find_latest(user_id, event_id)
            .await?
            .as_ref()
            .map(LastCheckIn::from);
        let historical_max = self.check_in_repo.longest_streak(user_id, event_id).await?;
        let available = self
            .freeze_repo
            .list_available(user_id, event_id, today)
            .await?;

        let state = StreakState::derive(
            user_id.clone(),
            event_id.clone(),
            latest,
            historical_max,
            today,
            !available.is_empty(),
        );

        Ok(StreakDto::from_state(
            &state,
            u32::try_from(available.len()).unwrap_or(u32::MAX),
        ))
    }
}
