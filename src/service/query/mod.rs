//! Alert queries against the Data API.
//!
//! [`QueryEngine::get_alerts`] issues one filtered query under the shared [`QueryLimiter`]
//! and the linear-ramp retry policy. Its failure is a [`QueryError`]; the batch and optimized
//! paths in [`batch`] decide per error whether an empty result may stand in for it.

pub mod batch;
pub mod filter;

use std::sync::Arc;

use crate::{
    error::{query::QueryError, Error},
    model::{
        alert::{AlertRecord, RawRecord},
        api_key::ApiKey,
        dataset::Dataset,
        geostore::normalize_geostore_id,
        window::DateWindow,
        Envelope,
    },
    service::{
        auth::ApiKeyManager,
        limiter::QueryLimiter,
        normalizer::normalize_records,
        read_json,
        retry::{BackoffPolicy, RetryContext},
    },
};

pub use batch::OptimizeOptions;

/// One filtered alert query.
#[derive(Debug, Clone)]
pub struct AlertQuery<'a> {
    pub dataset: &'a str,
    /// Columns to return besides latitude and longitude.
    pub fields: &'a [&'a str],
    pub date_field: &'a str,
    pub window: DateWindow,
    pub geostore_id: &'a str,
    /// Additional predicate ANDed onto the date bound, typically a confidence filter.
    pub extra_filter: Option<String>,
}

pub struct QueryEngine {
    http: reqwest::Client,
    data_api_url: String,
    api_keys: Arc<ApiKeyManager>,
    limiter: QueryLimiter,
    retry: BackoffPolicy,
}

impl QueryEngine {
    pub fn new(
        http: reqwest::Client,
        data_api_url: &str,
        api_keys: Arc<ApiKeyManager>,
        limiter: QueryLimiter,
        retry: BackoffPolicy,
    ) -> Self {
        Self {
            http,
            data_api_url: data_api_url.to_string(),
            api_keys,
            limiter,
            retry,
        }
    }

    pub fn limiter(&self) -> &QueryLimiter {
        &self.limiter
    }

    /// Runs one query and returns the raw records in upstream order.
    ///
    /// # Errors
    /// - [`QueryError::Failed`]: no API key, a permanent upstream error, or the retry budget
    ///   ran out. The error names the dataset, geostore and window.
    pub async fn get_alerts(&self, query: &AlertQuery<'_>) -> Result<Vec<RawRecord>, QueryError> {
        let fail = |e: Error| QueryError::failed(query.dataset, query.geostore_id, query.window, e);

        let api_key = self.api_keys.get_valid_api_key().await.map_err(fail)?;
        self.run_query(&api_key, query).await.map_err(fail)
    }

    async fn run_query(
        &self,
        api_key: &ApiKey,
        query: &AlertQuery<'_>,
    ) -> Result<Vec<RawRecord>, Error> {
        let url = format!(
            "{}/dataset/{}/latest/query/json",
            self.data_api_url, query.dataset
        );
        let geostore_id = normalize_geostore_id(query.geostore_id);
        let sql = filter::build_sql(
            query.fields,
            query.date_field,
            &query.window,
            query.extra_filter.as_deref(),
        );
        tracing::debug!("Querying dataset with sql: {}", sql);

        let description = format!(
            "alerts for dataset: {}, geostore_id: {}, daterange: {}",
            query.dataset, geostore_id, query.window
        );
        let retry = RetryContext::new(self.retry);

        let records = retry
            .execute_with_retry(&description, || async {
                // One permit per HTTP call, released before any backoff sleep
                let _permit = self.limiter.acquire().await?;

                let response = self
                    .http
                    .get(&url)
                    .header("x-api-key", &api_key.api_key)
                    .query(&[("geostore_id", geostore_id.as_str()), ("sql", sql.as_str())])
                    .send()
                    .await?;

                let envelope: Envelope<Option<Vec<RawRecord>>> = read_json(response).await?;
                Ok(envelope.data.unwrap_or_default())
            })
            .await?;

        tracing::info!(
            "Extracted {} alerts from dataset {}, geostore_id: {} for period {}.",
            records.len(),
            query.dataset,
            geostore_id,
            query.window
        );

        Ok(records)
    }

    /// Queries one dataset for one geostore, admitting `lowest_confidence` and above, and
    /// normalizes the result.
    ///
    /// A `lowest_confidence` outside the dataset's levels admits every level.
    pub async fn get_dataset_alerts(
        &self,
        dataset: Dataset,
        geostore_id: &str,
        window: DateWindow,
        lowest_confidence: &str,
    ) -> Result<Vec<AlertRecord>, QueryError> {
        let query = AlertQuery {
            dataset: dataset.name(),
            fields: dataset.query_fields(),
            date_field: dataset.date_field(),
            window,
            geostore_id,
            extra_filter: filter::confidence_filter(dataset, lowest_confidence),
        };

        let records = self.get_alerts(&query).await?;
        Ok(normalize_records(dataset, &records))
    }
}
