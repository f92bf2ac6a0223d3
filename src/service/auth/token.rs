use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;

use crate::{
    error::{auth::AuthError, Error},
    model::{
        token::{Token, TokenResponse},
        Envelope,
    },
    service::{
        read_json,
        retry::{BackoffPolicy, RetryContext},
    },
    util::time::Clock,
};

/// Acquires and caches the bearer token for one account.
///
/// The cache lock is held for the whole refresh, so concurrent callers that find the token
/// expired wait for the one in-flight exchange instead of starting their own.
pub struct TokenManager {
    http: reqwest::Client,
    token_url: String,
    username: String,
    password: String,
    retry: BackoffPolicy,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<Token>>,
}

impl TokenManager {
    /// Tokens are not reused within this margin of their expiry.
    pub const SAFETY_MARGIN_SECS: i64 = 5;

    pub fn new(
        http: reqwest::Client,
        data_api_url: &str,
        username: &str,
        password: &str,
        retry: BackoffPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            token_url: format!("{data_api_url}/auth/token"),
            username: username.to_string(),
            password: password.to_string(),
            retry,
            clock,
            cached: Mutex::new(None),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the cached token, exchanging credentials first when there is none, it is
    /// within [`Self::SAFETY_MARGIN_SECS`] of expiry, or `force_refresh` is set.
    ///
    /// # Errors
    /// - [`AuthError::TokenExchange`]: the exchange failed permanently or exhausted retries
    pub async fn get_token(&self, force_refresh: bool) -> Result<Token, Error> {
        let mut cached = self.cached.lock().await;
        let margin = Duration::seconds(Self::SAFETY_MARGIN_SECS);

        if !force_refresh {
            if let Some(token) = cached.as_ref() {
                let now = self.clock.now();
                if token.is_usable_at(now, margin) {
                    tracing::debug!(
                        "Using cached auth, expires in {} seconds.",
                        (token.expires_at - now).num_seconds()
                    );
                    return Ok(token.clone());
                }
            }
        }

        let token = self.exchange().await.map_err(|e| {
            tracing::error!(
                "Failed to authenticate with GFW Data API for username {}: {}",
                self.username,
                e
            );
            AuthError::TokenExchange {
                username: self.username.clone(),
                reason: e.to_string(),
            }
        })?;

        *cached = Some(token.clone());
        Ok(token)
    }

    /// `authorization` header value for the current token.
    pub async fn authorization(&self) -> Result<String, Error> {
        Ok(self.get_token(false).await?.authorization())
    }

    async fn exchange(&self) -> Result<Token, Error> {
        let retry = RetryContext::new(self.retry);
        let description = format!("token exchange for {}", self.username);

        let response: TokenResponse = retry
            .execute_with_retry(&description, || async {
                let response = self
                    .http
                    .post(&self.token_url)
                    .form(&[
                        ("username", self.username.as_str()),
                        ("password", self.password.as_str()),
                    ])
                    .send()
                    .await?;

                let envelope: Envelope<TokenResponse> = read_json(response).await?;
                Ok(envelope.data)
            })
            .await?;

        Ok(Token::from_response(response, self.clock.now()))
    }
}
