use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::time::deserialize_utc;

/// Long-lived Data API key bound to an account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiKey {
    #[serde(deserialize_with = "deserialize_utc")]
    pub created_on: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_utc")]
    pub updated_on: DateTime<Utc>,
    pub alias: String,
    pub user_id: String,
    pub api_key: String,
    pub organization: String,
    pub email: String,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(deserialize_with = "deserialize_utc")]
    pub expires_on: DateTime<Utc>,
}

impl ApiKey {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_on > now
    }
}

/// Body of the key creation call.
#[derive(Debug, Clone, Serialize)]
pub struct CreateApiKeyRequest {
    pub alias: String,
    pub email: String,
    pub organization: String,
    pub domains: Vec<String>,
}
