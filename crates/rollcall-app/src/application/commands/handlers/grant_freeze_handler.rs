use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use rollcall_domain::event::Event;
use rollcall_domain::freeze::{FreezeToken, StreakFreezeRepository};
use rollcall_domain::shared::{Clock, DomainError, EventId, Repository, UserId};
use rollcall_domain::user::User;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::freeze_commands::GrantFreezeCommand;
use crate::application::config::StreakConfig;
use crate::application::dtos::FreezeDto;

pub struct GrantFreezeCommandHandler {
    user_repo: Arc<dyn Repository<User>>,
    event_repo: Arc<dyn Repository<Event>>,
    freeze_repo: Arc<dyn StreakFreezeRepository>,
    clock: Arc<dyn Clock>,
    streak_config: StreakConfig,
}

impl GrantFreezeCommandHandler {
    pub fn new(
        user_repo: Arc<dyn Repository<User>>,
        event_repo: Arc<dyn Repository<Event>>,
        freeze_repo: Arc<dyn StreakFreezeRepository>,
        clock: Arc<dyn Clock>,
        streak_config: StreakConfig,
    ) -> Self {
        Self {
            user_repo,
            event_repo,
            freeze_repo,
            clock,
            streak_config,
        }
    }
}

#[async_trait]
impl CommandHandler<GrantFreezeCommand> for GrantFreezeCommandHandler {
    type Result = FreezeDto;

    async fn handle(&self, cmd: GrantFreezeCommand) -> Result<Self::Result, DomainError> {
        let user_id = UserId::parse(&cmd.user_id)?;
        let event_id = EventId::parse(&cmd.event_id)?;

        self.user_repo.require(&user_id).await?;
        self.event_repo.require(&event_id).await?;

        let now = self.clock.now();
        let today = now.date_naive();
        let expiry_day = cmd
            .expiry_day
            .or_else(|| self.streak_config.default_expiry(today));

        let token = FreezeToken::grant(user_id, event_id, expiry_day, now)?;
        self.freeze_repo.save(&token).await?;

        info!(
            "[freeze] Granted freeze {} to user {} in event {} (expires {})",
            token.id(),
            token.user_id(),
            token.event_id(),
            expiry_day
                .map(|day| day.to_string())
                .unwrap_or_else(|| "never".to_string())
        );

        Ok(FreezeDto::from_token(&token, today))
    }
}
