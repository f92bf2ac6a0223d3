//! Error types for the retrieval engine.
//!
//! Domain-specific failures (authentication, alert queries, geometry partitioning,
//! configuration) live in their own enums and are aggregated into [`Error`] through
//! `#[from]` so `?` works across layers. [`retry`] maps every variant onto a retry strategy.
//!
//! Propagation follows one rule: authentication and partitioning failures reach the caller,
//! query and per-record failures are absorbed by the batch paths and degrade to partial
//! results.

pub mod auth;
pub mod config;
pub mod partition;
pub mod query;
pub mod retry;

use thiserror::Error;

use crate::error::{
    auth::AuthError, config::ConfigError, partition::PartitionError, query::QueryError,
};

/// Main error type for the retrieval engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Credential exchange or API key acquisition failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// An alert query exhausted its retry budget.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// An AOI geometry could not be partitioned.
    #[error(transparent)]
    Partition(#[from] PartitionError),
    /// Missing or invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Upstream answered with a non-success status.
    #[error("Upstream returned HTTP {status} for {url}: {body}")]
    UpstreamStatus {
        status: u16,
        url: String,
        body: String,
    },
    /// A response did not have the shape we expected.
    #[error("Unexpected upstream response shape: {0}")]
    UnexpectedShape(String),
    /// The requested upstream resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// GeoJSON could not be converted into a usable geometry.
    #[error("Invalid geometry: {0}")]
    Geometry(String),
    /// Transport-level failure (connect, timeout, body read).
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The key-value store or event sink failed.
    #[error("Store error: {0}")]
    Store(String),
    /// The query limiter was closed.
    #[error(transparent)]
    Limiter(#[from] tokio::sync::AcquireError),
}

impl Error {
    /// Builds an [`Error::UpstreamStatus`], keeping only the head of the body for logs.
    pub fn upstream_status(status: reqwest::StatusCode, url: &str, body: &str) -> Self {
        Self::UpstreamStatus {
            status: status.as_u16(),
            url: url.to_string(),
            body: body.chars().take(250).collect(),
        }
    }
}
