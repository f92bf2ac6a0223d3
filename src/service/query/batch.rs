use std::collections::HashMap;

use futures::stream::{self, StreamExt};

use crate::{
    error::Error,
    model::{alert::AlertRecord, dataset::Dataset, window::DateWindow},
    service::{date_range::DateRangeOptimizer, query::QueryEngine},
};

/// Tuning for [`QueryEngine::get_alerts_optimized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeOptions {
    /// Geostores queried at once by this call. The process-wide limiter still applies.
    pub max_concurrent: usize,
    /// Chunk the range by the dataset's update frequency; otherwise query it as one window.
    pub smart_dates: bool,
    pub max_days_per_query: u32,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 5,
            smart_dates: true,
            max_days_per_query: 7,
        }
    }
}

impl QueryEngine {
    /// Queries every geostore for one window, at most `max_concurrent` at a time.
    ///
    /// The result has one entry per geostore. A geostore whose query gave up maps to an
    /// empty list; only credential failures fail the batch.
    pub async fn get_alerts_for_many_geostores(
        &self,
        dataset: Dataset,
        geostore_ids: &[String],
        window: DateWindow,
        lowest_confidence: &str,
        max_concurrent: usize,
    ) -> Result<HashMap<String, Vec<AlertRecord>>, Error> {
        if geostore_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Without a key nothing below can succeed
        self.api_keys.get_valid_api_key().await?;

        let results: Vec<_> = stream::iter(geostore_ids)
            .map(|geostore_id| async move {
                let alerts = self
                    .get_dataset_alerts(dataset, geostore_id, window, lowest_confidence)
                    .await;
                (geostore_id.clone(), alerts)
            })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;

        let mut all_alerts = HashMap::with_capacity(results.len());
        for (geostore_id, alerts) in results {
            match alerts {
                Ok(alerts) => {
                    all_alerts.insert(geostore_id, alerts);
                }
                Err(e) if e.is_partial_failure() => {
                    tracing::error!("Failed to fetch alerts for geostore {}: {}", geostore_id, e);
                    all_alerts.insert(geostore_id, Vec::new());
                }
                Err(e) => return Err(e.into()),
            }
        }

        let total_alerts: usize = all_alerts.values().map(Vec::len).sum();
        tracing::info!(
            "Batch query completed: {} geostores, {} total alerts",
            geostore_ids.len(),
            total_alerts
        );

        Ok(all_alerts)
    }

    /// Batch query over every window the optimizer produces for `window`.
    ///
    /// Windows run one after another; each geostore's list is the concatenation of its
    /// per-window results in window order.
    pub async fn get_alerts_optimized(
        &self,
        optimizer: &DateRangeOptimizer,
        dataset: Dataset,
        geostore_ids: &[String],
        window: DateWindow,
        lowest_confidence: &str,
        options: OptimizeOptions,
    ) -> Result<HashMap<String, Vec<AlertRecord>>, Error> {
        let windows = if options.smart_dates {
            optimizer
                .optimize_date_range(
                    dataset.name(),
                    window.start,
                    window.end,
                    options.max_days_per_query,
                )
                .await
        } else {
            vec![window]
        };

        let mut all_alerts: HashMap<String, Vec<AlertRecord>> = geostore_ids
            .iter()
            .map(|geostore_id| (geostore_id.clone(), Vec::new()))
            .collect();

        for chunk in &windows {
            tracing::info!("Processing date range: {}", chunk);

            let chunk_alerts = self
                .get_alerts_for_many_geostores(
                    dataset,
                    geostore_ids,
                    *chunk,
                    lowest_confidence,
                    options.max_concurrent,
                )
                .await?;

            for (geostore_id, alerts) in chunk_alerts {
                all_alerts.entry(geostore_id).or_default().extend(alerts);
            }
        }

        let total_alerts: usize = all_alerts.values().map(Vec::len).sum();
        tracing::info!(
            "Optimized query completed: {} geostores, {} date ranges, {} total alerts",
            geostore_ids.len(),
            windows.len(),
            total_alerts
        );

        Ok(all_alerts)
    }
}
