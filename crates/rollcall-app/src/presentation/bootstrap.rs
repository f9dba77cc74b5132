use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::application::commands::handlers::*;
use crate::application::config::AppConfig;
use crate::application::queries::{DirectoryQueries, LeaderboardQueries, StreakQueries};
use crate::application::services::{FreezeService, PairLocks};
use crate::presentation::state::{
    AppState, CommandHandlers, Queries, Repositories, Runtime, Services,
};
use rollcall_domain::check_in::CheckInRepository;
use rollcall_domain::event::{Event, EventDirectoryRepository};
use rollcall_domain::freeze::StreakFreezeRepository;
use rollcall_domain::leaderboard::EventAggregateRepository;
use rollcall_domain::shared::{CheckInUnitOfWork, Clock, DomainError, Repository, SystemClock};
use rollcall_domain::streak::StreakStateRepository;
use rollcall_domain::user::{User, UserRankingRepository};
use rollcall_infrastructure::persistence::{
    repositories::{
        SqliteCheckInRepository, SqliteEventAggregateRepository, SqliteEventRepository,
        SqliteStreakFreezeRepository, SqliteStreakStateRepository, SqliteUserRepository,
    },
    Database, SqliteCheckInUnitOfWork,
};

/// Open the configured database file and wire everything on the wall clock.
pub async fn build_app_state(config: AppConfig) -> Result<AppState, DomainError> {
    config.validate()?;

    let started_at = Instant::now();
    let db = Database::new(&config.database.path, config.database.max_connections).await?;
    info!(
        "✓ Opened database at {} ({}ms)",
        config.database.path.display(),
        started_at.elapsed().as_millis()
    );

    build_app_state_with(db, config, Arc::new(SystemClock)).await
}

/// Wire the application around an already opened database and a clock.
pub async fn build_app_state_with(
    db: Database,
    config: AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<AppState, DomainError> {
    let startup_started_at = Instant::now();

    let started_at = Instant::now();
    db.run_migrations().await?;
    info!(
        "✓ Database migrations applied ({}ms)",
        started_at.elapsed().as_millis()
    );

    let pool = db.pool();
    let db = Arc::new(db);

    let started_at = Instant::now();
    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_repo: Arc<dyn Repository<User>> = users.clone();
    let user_ranking: Arc<dyn UserRankingRepository> = users;
    let events = Arc::new(SqliteEventRepository::new(pool.clone()));
    let event_repo: Arc<dyn Repository<Event>> = events.clone();
    let event_directory: Arc<dyn EventDirectoryRepository> = events;
    let check_in_repo: Arc<dyn CheckInRepository> =
        Arc::new(SqliteCheckInRepository::new(pool.clone()));
    let freeze_repo: Arc<dyn StreakFreezeRepository> =
        Arc::new(SqliteStreakFreezeRepository::new(pool.clone()));
    let aggregate_repo: Arc<dyn EventAggregateRepository> =
        Arc::new(SqliteEventAggregateRepository::new(pool.clone()));
    let streak_state_repo: Arc<dyn StreakStateRepository> =
        Arc::new(SqliteStreakStateRepository::new(pool.clone()));
    let unit_of_work: Arc<dyn CheckInUnitOfWork> =
        Arc::new(SqliteCheckInUnitOfWork::new(pool.clone()));
    info!(
        "✓ Repositories initialized ({}ms)",
        started_at.elapsed().as_millis()
    );

    let pair_locks = Arc::new(PairLocks::new());
    let freeze_service = Arc::new(FreezeService::new(freeze_repo.clone(), clock.clone()));

    let streak_queries = Arc::new(StreakQueries::new(
        user_repo.clone(),
        event_repo.clone(),
        check_in_repo.clone(),
        freeze_repo.clone(),
        streak_state_repo.clone(),
        clock.clone(),
        config.leaderboard.clone(),
    ));
    let leaderboard_queries = Arc::new(LeaderboardQueries::new(
        event_repo.clone(),
        check_in_repo.clone(),
        freeze_repo.clone(),
        aggregate_repo.clone(),
        clock.clone(),
        config.leaderboard.clone(),
    ));
    let directory_queries = Arc::new(DirectoryQueries::new(
        user_repo.clone(),
        user_ranking.clone(),
        event_repo.clone(),
        event_directory.clone(),
        check_in_repo.clone(),
        config.leaderboard.clone(),
    ));

    let command_handlers = CommandHandlers {
        create_user: Arc::new(CreateUserCommandHandler::new(
            user_repo.clone(),
            clock.clone(),
        )),
        create_event: Arc::new(CreateEventCommandHandler::new(
            user_repo.clone(),
            event_repo.clone(),
            clock.clone(),
        )),
        rename_user: Arc::new(RenameUserCommandHandler::new(user_repo.clone())),
        delete_user: Arc::new(DeleteUserCommandHandler::new(user_repo.clone())),
        update_event: Arc::new(UpdateEventCommandHandler::new(event_repo.clone())),
        delete_event: Arc::new(DeleteEventCommandHandler::new(event_repo.clone())),
        record_check_in: Arc::new(RecordCheckInCommandHandler::new(
            user_repo.clone(),
            event_repo.clone(),
            unit_of_work.clone(),
            pair_locks.clone(),
            clock.clone(),
            config.streak.clone(),
        )),
        grant_freeze: Arc::new(GrantFreezeCommandHandler::new(
            user_repo.clone(),
            event_repo.clone(),
            freeze_repo.clone(),
            clock.clone(),
            config.streak.clone(),
        )),
    };

    info!(
        "✓ Application state ready ({}ms)",
        startup_started_at.elapsed().as_millis()
    );

    Ok(AppState {
        runtime: Runtime {
            pool,
            db,
            clock,
            config,
        },
        repositories: Repositories {
            user: user_repo,
            user_ranking,
            event: event_repo,
            event_directory,
            check_in: check_in_repo,
            freeze: freeze_repo,
            streak_state: streak_state_repo,
            event_aggregate: aggregate_repo,
            unit_of_work,
        },
        services: Services {
            freeze: freeze_service,
            pair_locks,
        },
        queries: Queries {
            streak: streak_queries,
            leaderboard: leaderboard_queries,
            directory: directory_queries,
        },
        command_handlers,
    })
}
