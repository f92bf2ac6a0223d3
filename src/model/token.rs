use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::util::time::deserialize_optional_utc;

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 86_400;

fn default_expires_in() -> i64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}

/// Token payload as returned by the credential exchange endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default, deserialize_with = "deserialize_optional_utc")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Short-lived bearer credential.
///
/// Only [`crate::service::auth::TokenManager`] creates these. `expires_at` is always set,
/// derived from `expires_in` at issue time when the upstream does not supply it.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    pub(crate) fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let expires_at = response
            .expires_at
            .unwrap_or_else(|| issued_at + Duration::seconds(response.expires_in));

        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            expires_at,
        }
    }

    /// Whether the token can still be used at `now`, keeping `margin` in reserve.
    pub fn is_usable_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now < self.expires_at - margin
    }

    /// Value for the `authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
