use chrono::NaiveDate;
use futures::future::try_join_all;
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

use rollcall_domain::check_in::CheckInRepository;
use rollcall_domain::event::Event;
use rollcall_domain::freeze::StreakFreezeRepository;
use rollcall_domain::leaderboard::{
    rank_by_checkins, rank_by_streak, EventAggregate, EventAggregateRepository,
    ParticipantSummary,
};
use rollcall_domain::shared::{Clock, DomainError, EventId, Repository, UserId};

use crate::application::config::LeaderboardConfig;
use crate::application::dtos::{CheckInCountEntryDto, EventSummaryDto, LeaderboardEntryDto};

pub struct LeaderboardQueries {
    event_repo: Arc<dyn Repository<Event>>,
    check_in_repo: Arc<dyn CheckInRepository>,
    freeze_repo: Arc<dyn StreakFreezeRepository>,
    aggregate_repo: Arc<dyn EventAggregateRepository>,
    clock: Arc<dyn Clock>,
    config: LeaderboardConfig,
}

impl LeaderboardQueries {
    pub fn new(
        event_repo: Arc<dyn Repository<Event>>,
        check_in_repo: Arc<dyn CheckInRepository>,
        freeze_repo: Arc<dyn StreakFreezeRepository>,
        aggregate_repo: Arc<dyn EventAggregateRepository>,
        clock: Arc<dyn Clock>,
        config: LeaderboardConfig,
    ) -> Self {
        Self {
            event_repo,
            check_in_repo,
            freeze_repo,
            aggregate_repo,
            clock,
            config,
        }
    }

    /// Ranked by each participant's current streak as of today. A run whose
    /// last check-in is older than yesterday counts as zero unless a pending
    /// freeze still covers the one missed day.
    pub async fn event_leaderboard(
        &self,
        event_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<LeaderboardEntryDto>, DomainError> {
        let event_id = self.known_event(event_id).await?;
        let limit = self.config.page(None, limit).limit;

        let today = self.clock.today();
        let participants = self.check_in_repo.participant_summaries(&event_id).await?;
        let freeze_holders = self
            .freeze_holders(&event_id, &participants, today)
            .await?;
        debug!(
            "[leaderboard] Ranking {} participants of event {} by streak (limit {}, {} covered by a freeze)",
            participants.len(),
            event_id,
            limit,
            freeze_holders.len()
        );

        Ok(rank_by_streak(participants, today, &freeze_holders, limit as usize)
            .into_iter()
            .map(LeaderboardEntryDto::from)
            .collect())
    }

    /// Ranked by number of check-ins.
    pub async fn event_checkin_leaderboard(
        &self,
        event_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<CheckInCountEntryDto>, DomainError> {
        let event_id = self.known_event(event_id).await?;
        let limit = self.config.page(None, limit).limit;

        let participants = self.check_in_repo.participant_summaries(&event_id).await?;
        debug!(
            "[leaderboard] Ranking {} participants of event {} by check-ins (limit {})",
            participants.len(),
            event_id,
            limit
        );

        Ok(rank_by_checkins(participants, limit as usize)
            .into_iter()
            .map(CheckInCountEntryDto::from)
            .collect())
    }

    /// Cached event statistics; all zero before the first check-in.
    pub async fn event_summary(&self, event_id: &str) -> Result<EventSummaryDto, DomainError> {
        let event_id = self.known_event(event_id).await?;

        let aggregate = match self.aggregate_repo.find_by_event(&event_id).await? {
            Some(aggregate) => aggregate,
            None => EventAggregate::empty(event_id, self.clock.now()),
        };
        Ok(EventSummaryDto::from(aggregate))
    }

    /// Participants whose run hinges on a freeze and who hold one.
    async fn freeze_holders(
        &self,
        event_id: &EventId,
        participants: &[ParticipantSummary],
        today: NaiveDate,
    ) -> Result<HashSet<UserId>, DomainError> {
        let at_risk: Vec<&UserId> = participants
            .iter()
            .filter(|p| p.needs_freeze_on(today))
            .map(|p| &p.user_id)
            .collect();

        let available = try_join_all(
            at_risk
                .iter()
                .map(|user_id| self.freeze_repo.list_available(user_id, event_id, today)),
        )
        .await?;

        Ok(at_risk
            .into_iter()
            .zip(available)
            .filter(|(_, freezes)| !freezes.is_empty())
            .map(|(user_id, _)| user_id.clone())
            .collect())
    }

    async fn known_event(&self, event_id: &str) -> Result<EventId, DomainError> {
        let event_id = EventId::parse(event_id)?;
        self.event_repo.require(&event_id).await?;
        Ok(event_id)
    }
}
