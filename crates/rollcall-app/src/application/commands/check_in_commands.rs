use serde::{Deserialize, Serialize};

use super::Command;
use crate::application::dtos::{CheckInDto, FreezeDto};

/// Record today's check-in for a user in an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCheckInCommand {
    pub user_id: String,
    pub event_id: String,
    pub note: Option<String>,
    pub mood: Option<String>,
}

impl Command for RecordCheckInCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCheckInResult {
    pub check_in: CheckInDto,
    /// Id of the freeze that bridged a missed day, if one was used.
    pub freeze_used: Option<String>,
    /// Freeze granted because the new streak hit a milestone.
    pub milestone_freeze: Option<FreezeDto>,
}
