//! Factory functions for credential exchange and API key payloads.
//!
//! Provides pure functions building the `data` members returned by the Data API
//! authentication endpoints, populated with the standard test account.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::constant::{
    TEST_ACCESS_TOKEN, TEST_API_KEY_USER_ID, TEST_ORGANIZATION, TEST_USERNAME,
};

/// Create a token exchange payload for [`TEST_ACCESS_TOKEN`].
///
/// # Arguments
/// - `expires_in` - Token lifetime in seconds
///
/// # Returns
/// - `Value` - Token payload with a `bearer` token type
pub fn token(expires_in: i64) -> Value {
    json!({
        "access_token": TEST_ACCESS_TOKEN,
        "token_type": "bearer",
        "expires_in": expires_in
    })
}

/// Create an API key record owned by the test account.
///
/// # Arguments
/// - `api_key` - The key value sent in the `x-api-key` header
/// - `expires_on` - Expiry instant of the key
///
/// # Returns
/// - `Value` - API key record as listed or created by the Data API
pub fn api_key(api_key: &str, expires_on: DateTime<Utc>) -> Value {
    json!({
        "created_on": "2024-01-01T00:00:00",
        "updated_on": "2024-01-01T00:00:00",
        "alias": format!("{}-test", TEST_USERNAME),
        "user_id": TEST_API_KEY_USER_ID,
        "api_key": api_key,
        "organization": TEST_ORGANIZATION,
        "email": TEST_USERNAME,
        "domains": [],
        "expires_on": expires_on.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    })
}

/// `authorization` header value sent with [`TEST_ACCESS_TOKEN`].
pub fn bearer() -> String {
    format!("bearer {}", TEST_ACCESS_TOKEN)
}
