use chrono::NaiveDate;
use rollcall_domain::shared::{DomainError, FixedClock};
use rollcall_infrastructure::persistence::Database;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use std::sync::Arc;

use crate::application::commands::{
    CommandHandler, CreateEventCommand, CreateUserCommand, GrantFreezeCommand,
    RecordCheckInCommand, RecordCheckInResult,
};
use crate::application::config::AppConfig;
use crate::application::dtos::FreezeDto;
use crate::presentation::bootstrap::build_app_state_with;
use crate::presentation::AppState;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Fully wired application on a single-connection in-memory database and a
/// clock pinned to noon UTC.
pub struct TestApp {
    pub state: AppState,
    pub clock: Arc<FixedClock>,
}

impl TestApp {
    pub async fn on(today: NaiveDate) -> Self {
        Self::with_config(today, AppConfig::default()).await
    }

    pub async fn with_config(today: NaiveDate, config: AppConfig) -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("open in-memory database");

        let clock = Arc::new(FixedClock::on_day(today));
        let state = build_app_state_with(Database::from_pool(pool), config, clock.clone())
            .await
            .expect("build app state");

        Self { state, clock }
    }

    /// Same wiring on a WAL database file in `dir` with a real connection
    /// pool, for tests that need check-ins to actually run in parallel.
    pub async fn on_disk(dir: &Path, today: NaiveDate, max_connections: u32) -> Self {
        let db = Database::new(&dir.join("rollcall-test.db"), max_connections)
            .await
            .expect("open database file");

        let clock = Arc::new(FixedClock::on_day(today));
        let state = build_app_state_with(db, AppConfig::default(), clock.clone())
            .await
            .expect("build app state");

        Self { state, clock }
    }

    pub fn set_day(&self, today: NaiveDate) {
        self.clock.set_day(today);
    }

    /// Create a user and return its id.
    pub async fn user(&self, username: &str) -> String {
        self.state
            .command_handlers
            .create_user
            .handle(CreateUserCommand {
                username: username.to_string(),
                display_name: None,
            })
            .await
            .expect("create user")
            .id
    }

    /// Create a public event owned by `creator_id` and return its id.
    pub async fn event(&self, creator_id: &str, title: &str) -> String {
        self.state
            .command_handlers
            .create_event
            .handle(CreateEventCommand {
                title: title.to_string(),
                description: None,
                creator_id: creator_id.to_string(),
                category: None,
                is_public: true,
            })
            .await
            .expect("create event")
            .id
    }

    pub async fn check_in(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> Result<RecordCheckInResult, DomainError> {
        self.state
            .command_handlers
            .record_check_in
            .handle(RecordCheckInCommand {
                user_id: user_id.to_string(),
                event_id: event_id.to_string(),
                note: None,
                mood: None,
            })
            .await
    }

    /// Set the clock to `on` and check in.
    pub async fn check_in_on(&self, user_id: &str, event_id: &str, on: NaiveDate) -> u32 {
        self.set_day(on);
        self.check_in(user_id, event_id)
            .await
            .expect("check-in recorded")
            .check_in
            .streak_count_at_time
    }

    pub async fn grant_freeze(
        &self,
        user_id: &str,
        event_id: &str,
        expiry_day: Option<NaiveDate>,
    ) -> FreezeDto {
        self.state
            .command_handlers
            .grant_freeze
            .handle(GrantFreezeCommand {
                user_id: user_id.to_string(),
                event_id: event_id.to_string(),
                expiry_day,
            })
            .await
            .expect("grant freeze")
    }
}
