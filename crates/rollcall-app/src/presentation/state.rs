use sqlx::SqlitePool;
use std::sync::Arc;

use crate::application::commands::handlers::*;
use crate::application::config::AppConfig;
use crate::application::queries::{DirectoryQueries, LeaderboardQueries, StreakQueries};
use crate::application::services::{FreezeService, PairLocks};
use rollcall_domain::check_in::CheckInRepository;
use rollcall_domain::event::{Event, EventDirectoryRepository};
use rollcall_domain::freeze::StreakFreezeRepository;
use rollcall_domain::leaderboard::EventAggregateRepository;
use rollcall_domain::shared::{CheckInUnitOfWork, Clock, DomainError, Repository};
use rollcall_domain::streak::StreakStateRepository;
use rollcall_domain::user::{User, UserRankingRepository};
use rollcall_infrastructure::persistence::Database;

pub struct CommandHandlers {
    pub create_user: Arc<CreateUserCommandHandler>,
    pub create_event: Arc<CreateEventCommandHandler>,
    pub rename_user: Arc<RenameUserCommandHandler>,
    pub delete_user: Arc<DeleteUserCommandHandler>,
    pub update_event: Arc<UpdateEventCommandHandler>,
    pub delete_event: Arc<DeleteEventCommandHandler>,
    pub record_check_in: Arc<RecordCheckInCommandHandler>,
    pub grant_freeze: Arc<GrantFreezeCommandHandler>,
}

pub struct Runtime {
    pub pool: Arc<SqlitePool>,
    pub db: Arc<Database>,
    pub clock: Arc<dyn Clock>,
    pub config: AppConfig,
}

pub struct Repositories {
    pub user: Arc<dyn Repository<User>>,
    pub user_ranking: Arc<dyn UserRankingRepository>,
    pub event: Arc<dyn Repository<Event>>,
    pub event_directory: Arc<dyn EventDirectoryRepository>,
    pub check_in: Arc<dyn CheckInRepository>,
    pub freeze: Arc<dyn StreakFreezeRepository>,
    pub streak_state: Arc<dyn StreakStateRepository>,
    pub event_aggregate: Arc<dyn EventAggregateRepository>,
    pub unit_of_work: Arc<dyn CheckInUnitOfWork>,
}

pub struct Services {
    pub freeze: Arc<FreezeService>,
    pub pair_locks: Arc<PairLocks>,
}

pub struct Queries {
    pub streak: Arc<StreakQueries>,
    pub leaderboard: Arc<LeaderboardQueries>,
    pub directory: Arc<DirectoryQueries>,
}

pub struct AppState {
    pub runtime: Runtime,
    pub repositories: Repositories,
    pub services: Services,
    pub queries: Queries,
    pub command_handlers: CommandHandlers,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, DomainError> {
        crate::presentation::bootstrap::build_app_state(config).await
    }

    pub async fn shutdown(&self) {
        self.runtime.db.close().await;
    }
}
