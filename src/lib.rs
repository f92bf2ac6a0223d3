//! Resilient retrieval of deforestation and fire alerts for areas of interest registered
//! with the Global Forest Watch platform.
//!
//! The crate layers credential management, per-endpoint retry policies, a concurrency-limited
//! alert query engine, a dataset metadata cache with date-range chunking, and an adaptive
//! geometry partitioner on top of the upstream Data API and Resource Watch API. The
//! [`client::DataApi`] facade composes all of it; the individual services are usable on
//! their own.

pub mod client;
pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod service;
pub mod startup;
pub mod store;
pub mod util;

pub use client::DataApi;
pub use config::Config;
pub use error::Error;
