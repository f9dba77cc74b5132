use chrono::{Days, NaiveDate};
use rollcall_domain::shared::DomainError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::application::utils::Page;

pub const ENV_DATABASE_PATH: &str = "ROLLCALL_DATABASE_PATH";
pub const ENV_DB_MAX_CONNECTIONS: &str = "ROLLCALL_DB_MAX_CONNECTIONS";
pub const ENV_LOG_DIR: &str = "ROLLCALL_LOG_DIR";
pub const ENV_FREEZE_VALIDITY_DAYS: &str = "ROLLCALL_FREEZE_VALIDITY_DAYS";
pub const ENV_MILESTONE_FREEZE_EVERY: &str = "ROLLCALL_MILESTONE_FREEZE_EVERY";
pub const ENV_LEADERBOARD_DEFAULT_LIMIT: &str = "ROLLCALL_LEADERBOARD_DEFAULT_LIMIT";
pub const ENV_LEADERBOARD_MAX_LIMIT: &str = "ROLLCALL_LEADERBOARD_MAX_LIMIT";

/// Application configuration: defaults, then `ROLLCALL_*` overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub streak: StreakConfig,
    pub leaderboard: LeaderboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: data_dir().join(if cfg!(debug_assertions) {
                "rollcall-dev.db"
            } else {
                "rollcall.db"
            }),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    /// Days a granted freeze stays usable when no explicit expiry is given.
    /// `None` means granted freezes never expire.
    pub freeze_validity_days: Option<u32>,
    /// Grant a freeze whenever a stored streak hits a multiple of this.
    /// `None` or 0 disables the reward.
    pub milestone_freeze_every: Option<u32>,
}

impl StreakConfig {
    /// Expiry for a freeze granted on `today` without an explicit one.
    pub fn default_expiry(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.freeze_validity_days
            .and_then(|days| today.checked_add_days(Days::new(u64::from(days))))
    }

    pub fn milestone_reached(&self, streak: u32) -> bool {
        match self.milestone_freeze_every {
            Some(every) if every > 0 => streak > 0 && streak % every == 0,
            _ => false,
        }
    }
}

/// Page-size bounds for leaderboards and history listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl LeaderboardConfig {
    pub fn page(&self, skip: Option<u32>, limit: Option<u32>) -> Page {
        Page::clamp(skip, limit, self.default_limit, self.max_limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: data_dir().join("logs"),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rollcall")
}

impl AppConfig {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source on top of the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            config.database.path = PathBuf::from(path);
        }
        if let Some(value) = parse_var(&lookup, ENV_DB_MAX_CONNECTIONS)? {
            config.database.max_connections = value;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            config.logging.dir = PathBuf::from(dir);
        }
        if let Some(value) = parse_var(&lookup, ENV_FREEZE_VALIDITY_DAYS)? {
            config.streak.freeze_validity_days = Some(value);
        }
        if let Some(value) = parse_var(&lookup, ENV_MILESTONE_FREEZE_EVERY)? {
            config.streak.milestone_freeze_every = Some(value);
        }
        if let Some(value) = parse_var(&lookup, ENV_LEADERBOARD_DEFAULT_LIMIT)? {
            config.leaderboard.default_limit = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_LEADERBOARD_MAX_LIMIT)? {
            config.leaderboard.max_limit = value;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.database.max_connections == 0 {
            return Err(DomainError::Validation(
                "Database max_connections must be at least 1".to_string(),
            ));
        }
        if self.streak.freeze_validity_days == Some(0) {
            return Err(DomainError::Validation(
                "Freeze validity must be at least 1 day".to_string(),
            ));
        }
        if self.leaderboard.max_limit == 0 {
            return Err(DomainError::Validation(
                "Leaderboard max_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, DomainError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            DomainError::Validation(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
    }
}
