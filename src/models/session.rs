use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Logged-in user. Lives in memory only and is dropped on logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub started_at: DateTime<Local>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            started_at: Local::now(),
        }
    }
}
