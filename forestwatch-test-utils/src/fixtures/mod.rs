//! Test fixture modules for upstream JSON bodies and HTTP mock creation.
//!
//! Each submodule pairs a `factory` of pure functions building response bodies with a
//! `mockito` module registering endpoints on the [`TestSetup`](crate::TestSetup) server:
//!
//! - `auth` - token exchange and API key endpoints
//! - `dataset` - dataset metadata, fields, listing and alert query endpoints
//! - `geostore` - AOI, geostore lookup and geostore creation endpoints

pub mod auth;
pub mod dataset;
pub mod geostore;

use serde_json::{json, Value};

/// Wrap `data` in the upstream response envelope.
pub fn envelope(data: Value) -> Value {
    json!({ "data": data })
}

/// Wrap `data` in the envelope with a `"success"` status.
pub fn success_envelope(data: Value) -> Value {
    json!({ "data": data, "status": "success" })
}
