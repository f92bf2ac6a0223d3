use std::{str::FromStr, time::Duration};

use crate::{error::config::ConfigError, service::retry::BackoffPolicy};

pub const DEFAULT_DATA_API_URL: &str = "https://data-api.globalforestwatch.org";
pub const DEFAULT_RESOURCE_WATCH_URL: &str = "https://api.resourcewatch.org";
pub const DEFAULT_ORGANIZATION: &str = "EarthRanger";

#[derive(Debug, Clone)]
pub struct Config {
    /// Account email, also used as the API key owner.
    pub username: String,
    pub password: String,
    pub data_api_url: String,
    pub resource_watch_url: String,
    /// Organization recorded on created API keys.
    pub organization: String,
    /// Ceiling on concurrent alert-query calls, shared by every query path.
    pub query_concurrency: usize,
    pub metadata_cache_ttl: Duration,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Credential exchange and API key calls.
    pub auth_backoff: BackoffPolicy,
    /// Alert queries.
    pub query_backoff: BackoffPolicy,
    /// AOI, geostore, dataset metadata and field lookups.
    pub lookup_backoff: BackoffPolicy,
}

impl Config {
    const DEFAULT_QUERY_CONCURRENCY: usize = 5;
    const DEFAULT_METADATA_CACHE_TTL_SECS: u64 = 3600;
    const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 60.0;
    const DEFAULT_CONNECT_TIMEOUT_SECS: f64 = 3.1;
    const DEFAULT_LOOKUP_INTERVAL: u64 = 10;

    /// Production defaults for the given account.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            data_api_url: DEFAULT_DATA_API_URL.to_string(),
            resource_watch_url: DEFAULT_RESOURCE_WATCH_URL.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            query_concurrency: Self::DEFAULT_QUERY_CONCURRENCY,
            metadata_cache_ttl: Duration::from_secs(Self::DEFAULT_METADATA_CACHE_TTL_SECS),
            request_timeout: Duration::from_secs_f64(Self::DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs_f64(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
            auth_backoff: BackoffPolicy::bounded_exponential(),
            query_backoff: BackoffPolicy::linear_ramp(),
            lookup_backoff: BackoffPolicy::constant(Self::DEFAULT_LOOKUP_INTERVAL),
        }
    }

    /// Points both upstream hosts at `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        self.data_api_url = base_url.to_string();
        self.resource_watch_url = base_url.to_string();
        self
    }

    /// Runs every backoff policy on `unit` instead of seconds.
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.auth_backoff = self.auth_backoff.with_unit(unit);
        self.query_backoff = self.query_backoff.with_unit(unit);
        self.lookup_backoff = self.lookup_backoff.with_unit(unit);
        self
    }

    /// Reads `GFW_*` variables, loading a `.env` file first when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::new(required("GFW_USERNAME")?, required("GFW_PASSWORD")?);

        if let Some(url) = optional("GFW_DATA_API_URL") {
            config.data_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = optional("GFW_RESOURCE_WATCH_URL") {
            config.resource_watch_url = url.trim_end_matches('/').to_string();
        }
        if let Some(organization) = optional("GFW_ORGANIZATION") {
            config.organization = organization;
        }
        if let Some(concurrency) = parsed::<usize>("GFW_DATASET_QUERY_CONCURRENCY")? {
            config.query_concurrency = concurrency;
        }
        if let Some(ttl) = parsed::<u64>("GFW_METADATA_CACHE_TTL")? {
            config.metadata_cache_ttl = Duration::from_secs(ttl);
        }
        if let Some(timeout) = seconds("GFW_REQUEST_TIMEOUT")? {
            config.request_timeout = timeout;
        }
        if let Some(timeout) = seconds("GFW_CONNECT_TIMEOUT")? {
            config.connect_timeout = timeout;
        }

        Ok(config)
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn optional(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T>(var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(var)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvValue {
                    var: var.to_string(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

fn seconds(var: &str) -> Result<Option<Duration>, ConfigError> {
    parsed::<f64>(var)?
        .map(|secs| {
            Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
