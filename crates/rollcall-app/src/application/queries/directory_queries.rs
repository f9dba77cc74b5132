use futures::future::try_join_all;
use log::debug;
use std::sync::Arc;

use rollcall_domain::check_in::CheckInRepository;
use rollcall_domain::event::{Event, EventDirectoryRepository};
use rollcall_domain::shared::{DomainError, EventId, Repository, UserId};
use rollcall_domain::user::{User, UserRankingRepository};

use crate::application::config::LeaderboardConfig;
use crate::application::dtos::{EventDto, UserDto};

/// Lookups and listings of users and events.
pub struct DirectoryQueries {
    user_repo: Arc<dyn Repository<User>>,
    user_ranking: Arc<dyn UserRankingRepository>,
    event_repo: Arc<dyn Repository<Event>>,
    event_directory: Arc<dyn EventDirectoryRepository>,
    check_in_repo: Arc<dyn CheckInRepository>,
    paging: LeaderboardConfig,
}

impl DirectoryQueries {
    pub fn new(
        user_repo: Arc<dyn Repository<User>>,
        user_ranking: Arc<dyn UserRankingRepository>,
        event_repo: Arc<dyn Repository<Event>>,
        event_directory: Arc<dyn EventDirectoryRepository>,
        check_in_repo: Arc<dyn CheckInRepository>,
        paging: LeaderboardConfig,
    ) -> Self {
        Self {
            user_repo,
            user_ranking,
            event_repo,
            event_directory,
            check_in_repo,
            paging,
        }
    }

    /// The user with their lifetime counters.
    pub async fn get_user(&self, user_id: &str) -> Result<UserDto, DomainError> {
        let user_id = UserId::parse(user_id)?;
        let user = self.user_repo.require(&user_id).await?;
        Ok(UserDto::from(&user))
    }

    pub async fn list_users(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<UserDto>, DomainError> {
        let page = self.paging.page(skip, limit);
        let users = self.user_repo.list(page.skip, page.limit).await?;
        Ok(users.iter().map(UserDto::from).collect())
    }

    /// Users ranked by the longest streak they ever reached in any event.
    pub async fn user_leaderboard(&self, limit: Option<u32>) -> Result<Vec<UserDto>, DomainError> {
        let limit = self.paging.page(None, limit).limit;
        debug!("[directory] Ranking users by longest streak (limit {})", limit);

        let users = self.user_ranking.top_by_longest_streak(limit).await?;
        Ok(users.iter().map(UserDto::from).collect())
    }

    pub async fn get_event(&self, event_id: &str) -> Result<EventDto, DomainError> {
        let event_id = EventId::parse(event_id)?;
        let event = self.event_repo.require(&event_id).await?;
        Ok(EventDto::from(&event))
    }

    /// Public events only; private events show up under their creator.
    pub async fn list_public_events(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<EventDto>, DomainError> {
        let page = self.paging.page(skip, limit);
        let events = self
            .event_directory
            .list_public(page.skip, page.limit)
            .await?;
        Ok(events.iter().map(EventDto::from).collect())
    }

    pub async fn events_created_by(
        &self,
        creator_id: &str,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<EventDto>, DomainError> {
        let creator_id = UserId::parse(creator_id)?;
        self.user_repo.require(&creator_id).await?;
        let page = self.paging.page(skip, limit);

        let events = self
            .event_directory
            .list_by_creator(&creator_id, page.skip, page.limit)
            .await?;
        Ok(events.iter().map(EventDto::from).collect())
    }

    /// Events the user has checked in to at least once.
    pub async fn participating_events(&self, user_id: &str) -> Result<Vec<EventDto>, DomainError> {
        let user_id = UserId::parse(user_id)?;
        self.user_repo.require(&user_id).await?;

        let event_ids = self.check_in_repo.events_for_user(&user_id).await?;
        let events = try_join_all(event_ids.iter().map(|id| self.event_repo.get(id))).await?;
        Ok(events.iter().flatten().map(EventDto::from).collect())
    }
}
