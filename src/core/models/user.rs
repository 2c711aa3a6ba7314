//! User model served by the sample `api/User` endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User as posted by clients and echoed back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login name
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Creation time, assigned by the server
    #[serde(default = "Utc::now")]
    pub date_created: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            first_name: None,
            last_name: None,
            date_created: Utc::now(),
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    /// Same user stamped with the current time
    pub fn created_now(mut self) -> Self {
        self.date_created = Utc::now();
        self
    }
}
