use rollcall_domain::event::Event;
use rollcall_domain::shared::Entity;
use rollcall_domain::user::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: String,
    pub total_checkins: u32,
    pub longest_streak: u32,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            display_name: user.display_name().map(str::to_string),
            created_at: user.created_at().to_rfc3339(),
            total_checkins: user.total_checkins(),
            longest_streak: user.longest_streak(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub category: Option<String>,
    pub is_public: bool,
    pub created_at: String,
}

impl From<&Event> for EventDto {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            title: event.title().to_string(),
            description: event.description().map(str::to_string),
            creator_id: event.creator_id().to_string(),
            category: event.category().map(str::to_string),
            is_public: event.is_public(),
            created_at: event.created_at().to_rfc3339(),
        }
    }
}
