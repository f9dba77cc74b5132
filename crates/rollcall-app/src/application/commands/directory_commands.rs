use rollcall_domain::event::EventChanges;
use serde::{Deserialize, Serialize};

use super::Command;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserCommand {
    pub username: String,
    pub display_name: Option<String>,
}

impl Command for CreateUserCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventCommand {
    pub title: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub category: Option<String>,
    pub is_public: bool,
}

impl Command for CreateEventCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameUserCommand {
    pub user_id: String,
    /// `None` or blank clears the display name.
    pub display_name: Option<String>,
}

impl Command for RenameUserCommand {}

/// Removes the user with every event they created and all their check-ins
/// and freezes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserCommand {
    pub user_id: String,
}

impl Command for DeleteUserCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventCommand {
    pub event_id: String,
    pub acting_user_id: String,
    pub changes: EventChanges,
}

impl Command for UpdateEventCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEventCommand {
    pub event_id: String,
    pub acting_user_id: String,
}

impl Command for DeleteEventCommand {}
