use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use rollcall_domain::event::Event;
use rollcall_domain::shared::{Clock, DomainError, EventId, Repository, UserId};
use rollcall_domain::user::User;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::directory_commands::*;
use crate::application::dtos::{EventDto, UserDto};

pub struct CreateUserCommandHandler {
    user_repo: Arc<dyn Repository<User>>,
    clock: Arc<dyn Clock>,
}

impl CreateUserCommandHandler {
    pub fn new(user_repo: Arc<dyn Repository<User>>, clock: Arc<dyn Clock>) -> Self {
        Self { user_repo, clock }
    }
}

#[async_trait]
impl CommandHandler<CreateUserCommand> for CreateUserCommandHandler {
    type Result = UserDto;

    async fn handle(&self, cmd: CreateUserCommand) -> Result<Self::Result, DomainError> {
        let user = User::new(cmd.username, cmd.display_name, self.clock.now())?;
        self.user_repo.create(&user).await?;

        let dto = UserDto::from(&user);
        info!("Created user {} ({})", dto.username, dto.id);
        Ok(dto)
    }
}

pub struct CreateEventCommandHandler {
    user_repo: Arc<dyn Repository<User>>,
    event_repo: Arc<dyn Repository<Event>>,
    clock: Arc<dyn Clock>,
}

impl CreateEventCommandHandler {
    pub fn new(
        user_repo: Arc<dyn Repository<User>>,
        event_repo: Arc<dyn Repository<Event>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            event_repo,
            clock,
        }
    }
}

#[async_trait]
impl CommandHandler<CreateEventCommand> for CreateEventCommandHandler {
    type Result = EventDto;

    async fn handle(&self, cmd: CreateEventCommand) -> Result<Self::Result, DomainError> {
        let creator_id = UserId::parse(&cmd.creator_id)?;
        self.user_repo.require(&creator_id).await?;

        let event = Event::new(
            cmd.title,
            cmd.description,
            creator_id,
            cmd.category,
            cmd.is_public,
            self.clock.now(),
        )?;
        self.event_repo.create(&event).await?;

        let dto = EventDto::from(&event);
        info!("Created event '{}' ({})", dto.title, dto.id);
        Ok(dto)
    }
}

pub struct RenameUserCommandHandler {
    user_repo: Arc<dyn Repository<User>>,
}

impl RenameUserCommandHandler {
    pub fn new(user_repo: Arc<dyn Repository<User>>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl CommandHandler<RenameUserCommand> for RenameUserCommandHandler {
    type Result = UserDto;

    async fn handle(&self, cmd: RenameUserCommand) -> Result<Self::Result, DomainError> {
        let user_id = UserId::parse(&cmd.user_id)?;
        let mut user = self.user_repo.require(&user_id).await?;

        user.rename(cmd.display_name);
        self.user_repo.update(&user).await?;

        info!("Renamed user {} ({})", user.username(), user_id);
        Ok(UserDto::from(&user))
    }
}

pub struct DeleteUserCommandHandler {
    user_repo: Arc<dyn Repository<User>>,
}

impl DeleteUserCommandHandler {
    pub fn new(user_repo: Arc<dyn Repository<User>>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl CommandHandler<DeleteUserCommand> for DeleteUserCommandHandler {
    type Result = ();

    async fn handle(&self, cmd: DeleteUserCommand) -> Result<Self::Result, DomainError> {
        let user_id = UserId::parse(&cmd.user_id)?;
        if !self.user_repo.delete(&user_id).await? {
            return Err(DomainError::NotFound(format!("user {}", user_id)));
        }

        warn!("Deleted user {} with their events and check-ins", user_id);
        Ok(())
    }
}

pub struct UpdateEventCommandHandler {
    event_repo: Arc<dyn Repository<Event>>,
}

impl UpdateEventCommandHandler {
    pub fn new(event_repo: Arc<dyn Repository<Event>>) -> Self {
        Self { event_repo }
    }
}

#[async_trait]
impl CommandHandler<UpdateEventCommand> for UpdateEventCommandHandler {
    type Result = EventDto;

    async fn handle(&self, cmd: UpdateEventCommand) -> Result<Self::Result, DomainError> {
        let event_id = EventId::parse(&cmd.event_id)?;
        let acting_user_id = UserId::parse(&cmd.acting_user_id)?;
        if cmd.changes.is_empty() {
            return Err(DomainError::Validation(
                "Nothing to update: pass at least one field".to_string(),
            ));
        }

        let mut event = self.event_repo.require(&event_id).await?;
        event.ensure_creator(&acting_user_id)?;
        event.revise(cmd.changes)?;
        self.event_repo.update(&event).await?;

        let dto = EventDto::from(&event);
        info!("Updated event '{}' ({})", dto.title, dto.id);
        Ok(dto)
    }
}

pub struct DeleteEventCommandHandler {
    event_repo: Arc<dyn Repository<Event>>,
}

impl DeleteEventCommandHandler {
    pub fn new(event_repo: Arc<dyn Repository<Event>>) -> Self {
        Self { event_repo }
    }
}

#[async_trait]
impl CommandHandler<DeleteEventCommand> for DeleteEventCommandHandler {
    type Result = ();

    async fn handle(&self, cmd: DeleteEventCommand) -> Result<Self::Result, DomainError> {
        let event_id = EventId::parse(&cmd.event_id)?;
        let acting_user_id = UserId::parse(&cmd.acting_user_id)?;

        let event = self.event_repo.require(&event_id).await?;
        event.ensure_creator(&acting_user_id)?;
        if !self.event_repo.delete(&event_id).await? {
            return Err(DomainError::NotFound(format!("event {}", event_id)));
        }

        warn!("Deleted event '{}' ({}) with its check-ins", event.title(), event_id);
        Ok(())
    }
}
