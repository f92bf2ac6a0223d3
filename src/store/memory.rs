use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::Error,
    model::event::AlertEvent,
    store::{AlertSink, KeyValueStore},
    util::time::{Clock, SystemClock},
};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// In-process [`KeyValueStore`] honoring TTLs against its clock.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let expired = match entries.get(key) {
            Some(entry) => entry.expires_at.is_some_and(|at| at <= now),
            None => return Ok(None),
        };
        if expired {
            entries.remove(key);
            return Ok(None);
        }

        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error> {
        let expires_at = ttl
            .map(|ttl| {
                chrono::Duration::from_std(ttl)
                    .map(|ttl| self.clock.now() + ttl)
                    .map_err(|e| Error::Store(format!("invalid ttl for {key}: {e}")))
            })
            .transpose()?;

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    expires_at,
                },
            );

        Ok(())
    }
}

/// [`AlertSink`] that keeps every published batch.
#[derive(Default)]
pub struct MemorySink {
    published: Mutex<Vec<(String, Vec<AlertEvent>)>>,
}

impl MemorySink {
    /// Batches published so far, with their integration ids.
    pub fn published(&self) -> Vec<(String, Vec<AlertEvent>)> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AlertSink for MemorySink {
    async fn publish(&self, integration_id: &str, events: Vec<AlertEvent>) -> Result<(), Error> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((integration_id.to_string(), events));
        Ok(())
    }
}
