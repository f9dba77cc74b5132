// Domain layer - Pure business logic
// No dependencies on infrastructure or presentation layers

pub mod check_in;
pub mod event;
pub mod freeze;
pub mod leaderboard;
pub mod shared;
pub mod streak;
pub mod user;

// Re-exports for convenience
pub use shared::{CheckInId, DomainError, EventId, FreezeId, UserId};
