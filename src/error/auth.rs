use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The username/password exchange for a bearer token failed after retries.
    #[error("Failed to get an access token for username {username}: {reason}")]
    TokenExchange { username: String, reason: String },
    /// No API key could be listed or created for the account.
    #[error("Failed to obtain a valid API key: {0}")]
    ApiKeyUnavailable(String),
}
