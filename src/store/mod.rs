//! Collaborator interfaces for durable state and event publishing.
//!
//! Hosts plug in their own backends. [`memory`] provides in-process implementations used by
//! the tests and by hosts that do not need persistence across restarts.

pub mod memory;

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::Error,
    model::{alert::AlertRecord, event::AlertEvent},
};

pub use memory::{MemorySink, MemoryStore};

/// Durable key-value store for per-AOI fragment lists and per-dataset freshness markers.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Stores `value` under `key`, expiring after `ttl` when given.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error>;
}

/// Downstream consumer of transformed alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn publish(&self, integration_id: &str, events: Vec<AlertEvent>) -> Result<(), Error>;
}

/// Converts `records` to events and hands them to `sink`. Returns the number published;
/// nothing is sent for an empty list.
pub async fn publish_alerts(
    sink: &dyn AlertSink,
    integration_id: &str,
    records: &[AlertRecord],
) -> Result<usize, Error> {
    if records.is_empty() {
        return Ok(0);
    }

    let events: Vec<AlertEvent> = records.iter().map(AlertEvent::from_record).collect();
    let count = events.len();

    sink.publish(integration_id, events).await.map_err(|e| {
        tracing::error!(
            "Event sink returned error for integration_id: {}: {}",
            integration_id,
            e
        );
        e
    })?;

    Ok(count)
}
