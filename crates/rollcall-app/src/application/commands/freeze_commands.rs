use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Command;

/// Hand a user one streak freeze for an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantFreezeCommand {
    pub user_id: String,
    pub event_id: String,
    /// First day the freeze is no longer usable. Falls back to the
    /// configured validity window.
    pub expiry_day: Option<NaiveDate>,
}

impl Command for GrantFreezeCommand {}
