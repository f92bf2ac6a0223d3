use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use chrono::{DateTime, Utc};

use crate::{
    error::Error,
    model::{dataset::DatasetMetadata, Envelope},
    service::{
        auth::ApiKeyManager,
        read_json,
        retry::{BackoffPolicy, RetryContext},
    },
    util::time::Clock,
};

#[derive(Debug, Clone)]
struct CachedMetadata {
    metadata: DatasetMetadata,
    fetched_at: DateTime<Utc>,
}

/// In-process dataset metadata cache keyed by `{dataset}_{version}`.
///
/// Concurrent misses may each fetch; the last write wins, which the TTL makes harmless.
pub struct MetadataCache {
    http: reqwest::Client,
    data_api_url: String,
    api_keys: Arc<ApiKeyManager>,
    retry: BackoffPolicy,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<String, CachedMetadata>>,
}

impl MetadataCache {
    pub fn new(
        http: reqwest::Client,
        data_api_url: &str,
        api_keys: Arc<ApiKeyManager>,
        retry: BackoffPolicy,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            data_api_url: data_api_url.to_string(),
            api_keys,
            retry,
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn cache_key(dataset: &str, version: &str) -> String {
        format!("{dataset}_{version}")
    }

    /// Serves from cache while the entry is younger than the TTL, otherwise fetches and
    /// refreshes the entry.
    pub async fn get_dataset_metadata(
        &self,
        dataset: &str,
        version: &str,
    ) -> Result<DatasetMetadata, Error> {
        let key = Self::cache_key(dataset, version);

        if let Some(metadata) = self.fresh_entry(&key) {
            tracing::debug!("Using cached metadata for dataset {}", dataset);
            return Ok(metadata);
        }

        let metadata = self.fetch(dataset, version).await?;

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key,
                CachedMetadata {
                    metadata: metadata.clone(),
                    fetched_at: self.clock.now(),
                },
            );
        tracing::debug!("Cached metadata for dataset {}", dataset);

        Ok(metadata)
    }

    fn fresh_entry(&self, key: &str) -> Option<DatasetMetadata> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;

        let age = (self.clock.now() - entry.fetched_at).to_std().unwrap_or_default();
        (age < self.ttl).then(|| entry.metadata.clone())
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    async fn fetch(&self, dataset: &str, version: &str) -> Result<DatasetMetadata, Error> {
        let api_key = self.api_keys.get_valid_api_key().await?;
        let url = format!("{}/dataset/{}/{}", self.data_api_url, dataset, version);
        let description = format!("metadata for dataset {dataset} ({version})");
        let retry = RetryContext::new(self.retry);

        retry
            .execute_with_retry(&description, || async {
                let response = self
                    .http
                    .get(&url)
                    .header("x-api-key", &api_key.api_key)
                    .send()
                    .await?;

                let envelope: Envelope<Option<DatasetMetadata>> = read_json(response).await?;
                envelope.data.ok_or_else(|| {
                    Error::UnexpectedShape(format!("no metadata in response for {dataset}"))
                })
            })
            .await
    }
}
