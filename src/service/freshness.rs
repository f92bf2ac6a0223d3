use std::sync::Arc;

use crate::{
    error::Error,
    model::dataset::{DatasetMetadata, DatasetStatus},
    store::KeyValueStore,
};

/// Per-integration dataset freshness markers over the key-value store.
///
/// Lets a caller skip a full query pass when upstream has not changed since the last one.
pub struct FreshnessTracker {
    store: Arc<dyn KeyValueStore>,
}

impl FreshnessTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(integration_id: &str, dataset: &str) -> String {
        format!("{integration_id}.pull_events.{dataset}")
    }

    /// Saved marker for `dataset`, or one that has never seen it.
    pub async fn load(&self, integration_id: &str, dataset: &str) -> Result<DatasetStatus, Error> {
        match self.store.get(&Self::key(integration_id, dataset)).await? {
            Some(saved) => {
                let status: DatasetStatus = serde_json::from_str(&saved)?;
                tracing::info!("Saved dataset status for {}: {:?}", dataset, status);
                Ok(status)
            }
            None => Ok(DatasetStatus::unseen(dataset, "")),
        }
    }

    /// Whether `metadata` reports a change after `status` was recorded.
    pub fn has_updates(status: &DatasetStatus, metadata: &DatasetMetadata) -> bool {
        let updated = status.has_updates(metadata);
        if !updated {
            tracing::info!(
                "No updates reported for dataset '{}' since {}",
                metadata.dataset,
                status.latest_updated_on.to_rfc3339()
            );
        }
        updated
    }

    pub async fn save(&self, integration_id: &str, status: &DatasetStatus) -> Result<(), Error> {
        let value = serde_json::to_string(status)?;
        self.store
            .set(&Self::key(integration_id, &status.dataset), &value, None)
            .await
    }
}
