use chrono::NaiveDate;
use rollcall_domain::freeze::{FreezeStatus, FreezeToken};
use serde::{Deserialize, Serialize};

use super::date_string;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreezeDto {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub status: FreezeStatus,
    pub used_on_day: Option<String>,
    pub expiry_day: Option<String>,
    pub created_at: String,
}

impl FreezeDto {
    /// Status depends on the day it is looked at.
    pub fn from_token(token: &FreezeToken, today: NaiveDate) -> Self {
        Self {
            id: token.id().to_string(),
            user_id: token.user_id().to_string(),
            event_id: token.event_id().to_string(),
            status: token.status(today),
            used_on_day: token.used_on_day().map(date_string),
            expiry_day: token.expiry_day().map(date_string),
            created_at: token.created_at().to_rfc3339(),
        }
    }
}
