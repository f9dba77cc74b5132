pub mod check_in_repo;
pub mod event_aggregate_repo;
pub mod record_repo;
pub mod streak_freeze_repo;
pub mod streak_state_repo;

mod event_record;
mod user_record;

pub use check_in_repo::SqliteCheckInRepository;
pub use event_aggregate_repo::SqliteEventAggregateRepository;
pub use record_repo::{SqliteRecord, SqliteRecordRepository};
pub use streak_freeze_repo::SqliteStreakFreezeRepository;
pub use streak_state_repo::SqliteStreakStateRepository;

use rollcall_domain::event::Event;
use rollcall_domain::user::User;

pub type SqliteUserRepository = SqliteRecordRepository<User>;
pub type SqliteEventRepository = SqliteRecordRepository<Event>;
