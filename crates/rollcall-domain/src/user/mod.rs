use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::check_in::CheckIn;
use crate::shared::{DomainError, Entity, UserId};

mod repository;

pub use repository::UserRankingRepository;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
    total_checkins: u32,
    longest_streak: u32,
}

impl User {
    pub fn new(
        username: String,
        display_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let username = username.trim().to_string();
        let len = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            return Err(DomainError::Validation(format!(
                "Username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
            )));
        }

        Ok(Self {
            id: UserId::new(),
            username,
            display_name: clean_display_name(display_name),
            created_at: now,
            total_checkins: 0,
            longest_streak: 0,
        })
    }

    pub fn restore(
        id: UserId,
        username: String,
        display_name: Option<String>,
        created_at: DateTime<Utc>,
        total_checkins: u32,
        longest_streak: u32,
    ) -> Self {
        Self {
            id,
            username,
            display_name,
            created_at,
            total_checkins,
            longest_streak,
        }
    }

    /// Replace the display name; a blank name clears it.
    pub fn rename(&mut self, display_name: Option<String>) {
        self.display_name = clean_display_name(display_name);
    }

    /// Fold one stored check-in into the cached counters.
    pub fn apply_check_in(&mut self, check_in: &CheckIn) {
        self.total_checkins = self.total_checkins.saturating_add(1);
        self.longest_streak = self.longest_streak.max(check_in.streak_count_at_time());
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn total_checkins(&self) -> u32 {
        self.total_checkins
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }
}

fn clean_display_name(display_name: Option<String>) -> Option<String> {
    display_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

impl Entity for User {
    type Id = UserId;
    const KIND: &'static str = "user";

    fn id(&self) -> &UserId {
        &self.id
    }
}
