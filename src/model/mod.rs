//! Upstream and domain models.
//!
//! Upstream payloads are wrapped in a `{"data": ..., "status": ...}` envelope; [`Envelope`]
//! unwraps it. Timestamps go through [`crate::util::time`] helpers because the upstream
//! mixes timezone-aware and naive values.

pub mod alert;
pub mod aoi;
pub mod api_key;
pub mod confidence;
pub mod dataset;
pub mod event;
pub mod geostore;
pub mod token;
pub mod window;

use serde::Deserialize;

/// Standard upstream response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub status: Option<String>,
}
