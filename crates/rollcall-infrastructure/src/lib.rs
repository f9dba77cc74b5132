// Infrastructure layer - SQLite persistence and logging
// Implements the repository and unit-of-work traits of rollcall-domain

pub mod logging;
pub mod persistence;
