//! Service layer for credential management, querying and orchestration.
//!
//! Each service owns one concern of the retrieval engine: credentials, retry policy, the
//! alert query path and its normalizer, dataset metadata and date chunking, upstream lookups,
//! fragment registration, and freshness markers. Every outbound call is wrapped in
//! [`retry::RetryContext`] with the policy configured for its endpoint class.

pub mod auth;
pub mod date_range;
pub mod fragments;
pub mod freshness;
pub mod limiter;
pub mod lookup;
pub mod metadata;
pub mod normalizer;
pub mod query;
pub mod retry;

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Parse a JSON body from a successful response, or turn the status into an error.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, Error> {
    let status = response.status();
    let url = response.url().to_string();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::upstream_status(status, &url, &body));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Unexpected response shape from {}: {}", url, e);
        Error::UnexpectedShape(format!("{url}: {e}"))
    })
}
