use std::sync::Arc;

use rand::seq::IndexedRandom;
use reqwest::StatusCode;
use tokio::sync::Mutex;

use crate::{
    error::{auth::AuthError, Error},
    model::{
        api_key::{ApiKey, CreateApiKeyRequest},
        Envelope,
    },
    service::{
        auth::token::TokenManager,
        read_json,
        retry::{BackoffPolicy, RetryContext},
    },
    util::time::Clock,
};

const ALIAS_SUFFIX_LEN: usize = 4;

/// `{email}-{4 random lowercase letters}`, distinct across repeated registrations.
fn random_alias(email: &str) -> String {
    let letters: Vec<char> = ('a'..='z').collect();
    let suffix: String = letters
        .choose_multiple(&mut rand::rng(), ALIAS_SUFFIX_LEN)
        .collect();

    format!("{email}-{suffix}")
}

/// Acquires and caches the account's Data API key.
///
/// A cached key is reused while it is unexpired. Otherwise the account's existing keys are
/// listed and the first valid one is adopted; only when none is valid is a new key created.
pub struct ApiKeyManager {
    http: reqwest::Client,
    data_api_url: String,
    organization: String,
    tokens: Arc<TokenManager>,
    retry: BackoffPolicy,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<ApiKey>>,
}

impl ApiKeyManager {
    pub fn new(
        http: reqwest::Client,
        data_api_url: &str,
        organization: &str,
        tokens: Arc<TokenManager>,
        retry: BackoffPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            data_api_url: data_api_url.to_string(),
            organization: organization.to_string(),
            tokens,
            retry,
            clock,
            cached: Mutex::new(None),
        }
    }

    /// # Errors
    /// - [`AuthError::TokenExchange`]: no bearer token could be obtained
    /// - [`AuthError::ApiKeyUnavailable`]: listing and creation both failed
    pub async fn get_valid_api_key(&self) -> Result<ApiKey, Error> {
        let mut cached = self.cached.lock().await;

        if let Some(key) = cached.as_ref() {
            if key.is_valid_at(self.clock.now()) {
                return Ok(key.clone());
            }
        }

        let key = self.acquire().await.map_err(|e| match e {
            Error::Auth(auth) => Error::Auth(auth),
            other => AuthError::ApiKeyUnavailable(other.to_string()).into(),
        })?;

        *cached = Some(key.clone());
        Ok(key)
    }

    async fn acquire(&self) -> Result<ApiKey, Error> {
        let now = self.clock.now();

        if let Some(key) = self
            .list_api_keys()
            .await?
            .into_iter()
            .find(|key| key.is_valid_at(now))
        {
            tracing::debug!("Reusing existing API key {}", key.alias);
            return Ok(key);
        }

        let key = self.create_api_key().await?;
        tracing::info!("Created API key {} for {}", key.alias, key.email);
        Ok(key)
    }

    /// Keys registered to the account. A 404 means the account has none.
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, Error> {
        let url = format!("{}/auth/apikeys", self.data_api_url);
        let authorization = self.tokens.authorization().await?;
        let retry = RetryContext::new(self.retry);

        retry
            .execute_with_retry("API key listing", || async {
                let response = self
                    .http
                    .get(&url)
                    .header(reqwest::header::AUTHORIZATION, &authorization)
                    .send()
                    .await?;

                if response.status() == StatusCode::NOT_FOUND {
                    return Ok(Vec::new());
                }

                let envelope: Envelope<Vec<ApiKey>> = read_json(response).await?;
                Ok(envelope.data)
            })
            .await
    }

    pub async fn create_api_key(&self) -> Result<ApiKey, Error> {
        let url = format!("{}/auth/apikey", self.data_api_url);
        let authorization = self.tokens.authorization().await?;
        let email = self.tokens.username().to_string();
        let retry = RetryContext::new(self.retry);

        retry
            .execute_with_retry("API key creation", || async {
                let request = CreateApiKeyRequest {
                    alias: random_alias(&email),
                    email: email.clone(),
                    organization: self.organization.clone(),
                    domains: Vec::new(),
                };

                let response = self
                    .http
                    .post(&url)
                    .header(reqwest::header::AUTHORIZATION, &authorization)
                    .json(&request)
                    .send()
                    .await?;

                let envelope: Envelope<ApiKey> = read_json(response).await?;
                Ok(envelope.data)
            })
            .await
    }
}
