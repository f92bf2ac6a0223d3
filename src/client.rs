//! The Data API facade.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    error::{query::QueryError, Error},
    model::{
        alert::{AlertRecord, RawRecord},
        aoi::Aoi,
        api_key::ApiKey,
        dataset::{Dataset, DatasetField, DatasetMetadata, DatasetSummary},
        geostore::{CreatedGeostore, Geostore},
        token::Token,
        window::DateWindow,
    },
    service::{
        auth::{ApiKeyManager, TokenManager},
        date_range::DateRangeOptimizer,
        fragments::GeostoreRegistry,
        freshness::FreshnessTracker,
        limiter::QueryLimiter,
        lookup::LookupService,
        metadata::MetadataCache,
        query::{AlertQuery, OptimizeOptions, QueryEngine},
    },
    startup::build_http_client,
    store::KeyValueStore,
    util::time::{Clock, SystemClock},
};

/// Client for one Global Forest Watch account.
///
/// Composes credential management, the alert query engine, the metadata cache and date
/// optimizer, and the upstream lookups. Instances serving different accounts should share one
/// [`QueryLimiter`] so the process as a whole stays under the upstream concurrency ceiling.
pub struct DataApi {
    tokens: Arc<TokenManager>,
    api_keys: Arc<ApiKeyManager>,
    metadata: Arc<MetadataCache>,
    optimizer: DateRangeOptimizer,
    queries: QueryEngine,
    lookup: Arc<LookupService>,
}

impl DataApi {
    /// Client with its own limiter sized by `config.query_concurrency` and the wall clock.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Self::with_components(
            config,
            QueryLimiter::new(config.query_concurrency),
            Arc::new(SystemClock),
        )
    }

    pub fn with_components(
        config: &Config,
        limiter: QueryLimiter,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        let http = build_http_client(config)?;

        let tokens = Arc::new(TokenManager::new(
            http.clone(),
            &config.data_api_url,
            &config.username,
            &config.password,
            config.auth_backoff,
            clock.clone(),
        ));
        let api_keys = Arc::new(ApiKeyManager::new(
            http.clone(),
            &config.data_api_url,
            &config.organization,
            tokens.clone(),
            config.auth_backoff,
            clock.clone(),
        ));
        let metadata = Arc::new(MetadataCache::new(
            http.clone(),
            &config.data_api_url,
            api_keys.clone(),
            config.auth_backoff,
            config.metadata_cache_ttl,
            clock,
        ));
        let queries = QueryEngine::new(
            http.clone(),
            &config.data_api_url,
            api_keys.clone(),
            limiter,
            config.query_backoff,
        );
        let lookup = Arc::new(LookupService::new(
            http,
            &config.data_api_url,
            &config.resource_watch_url,
            tokens.clone(),
            config.lookup_backoff,
            config.auth_backoff,
        ));

        Ok(Self {
            tokens,
            api_keys,
            optimizer: DateRangeOptimizer::new(metadata.clone()),
            metadata,
            queries,
            lookup,
        })
    }

    pub async fn get_token(&self, force_refresh: bool) -> Result<Token, Error> {
        self.tokens.get_token(force_refresh).await
    }

    pub async fn get_valid_api_key(&self) -> Result<ApiKey, Error> {
        self.api_keys.get_valid_api_key().await
    }

    pub async fn get_alerts(&self, query: &AlertQuery<'_>) -> Result<Vec<RawRecord>, QueryError> {
        self.queries.get_alerts(query).await
    }

    pub async fn get_integrated_alerts(
        &self,
        geostore_id: &str,
        window: DateWindow,
        lowest_confidence: &str,
    ) -> Result<Vec<AlertRecord>, QueryError> {
        self.queries
            .get_dataset_alerts(Dataset::IntegratedAlerts, geostore_id, window, lowest_confidence)
            .await
    }

    pub async fn get_fire_alerts(
        &self,
        geostore_id: &str,
        window: DateWindow,
        lowest_confidence: &str,
    ) -> Result<Vec<AlertRecord>, QueryError> {
        self.queries
            .get_dataset_alerts(
                Dataset::NasaViirsFireAlerts,
                geostore_id,
                window,
                lowest_confidence,
            )
            .await
    }

    pub async fn get_alerts_for_many_geostores(
        &self,
        dataset: Dataset,
        geostore_ids: &[String],
        window: DateWindow,
        lowest_confidence: &str,
        max_concurrent: usize,
    ) -> Result<HashMap<String, Vec<AlertRecord>>, Error> {
        self.queries
            .get_alerts_for_many_geostores(
                dataset,
                geostore_ids,
                window,
                lowest_confidence,
                max_concurrent,
            )
            .await
    }

    pub async fn get_alerts_optimized(
        &self,
        dataset: Dataset,
        geostore_ids: &[String],
        window: DateWindow,
        lowest_confidence: &str,
        options: OptimizeOptions,
    ) -> Result<HashMap<String, Vec<AlertRecord>>, Error> {
        self.queries
            .get_alerts_optimized(
                &self.optimizer,
                dataset,
                geostore_ids,
                window,
                lowest_confidence,
                options,
            )
            .await
    }

    pub async fn get_dataset_metadata(
        &self,
        dataset: &str,
        version: &str,
    ) -> Result<DatasetMetadata, Error> {
        self.metadata.get_dataset_metadata(dataset, version).await
    }

    pub async fn optimize_date_range(
        &self,
        dataset: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_days_per_query: u32,
    ) -> Vec<DateWindow> {
        self.optimizer
            .optimize_date_range(dataset, start, end, max_days_per_query)
            .await
    }

    pub async fn get_aoi(&self, aoi_id: &str) -> Result<Aoi, Error> {
        self.lookup.get_aoi(aoi_id).await
    }

    pub async fn aoi_from_url(&self, link: &str) -> Result<String, Error> {
        self.lookup.aoi_from_url(link).await
    }

    pub async fn get_geostore(&self, geostore_id: &str) -> Result<Geostore, Error> {
        self.lookup.get_geostore(geostore_id).await
    }

    pub async fn create_geostore(
        &self,
        geometry: &geojson::Geometry,
    ) -> Result<CreatedGeostore, Error> {
        self.lookup.create_geostore(geometry).await
    }

    pub async fn get_dataset_fields(
        &self,
        dataset: &str,
        version: &str,
    ) -> Result<Vec<DatasetField>, Error> {
        self.lookup.get_dataset_fields(dataset, version).await
    }

    pub async fn get_datasets(&self) -> Result<Vec<DatasetSummary>, Error> {
        self.lookup.get_datasets().await
    }

    /// Fragment registry persisting into `store`.
    pub fn geostore_registry(&self, store: Arc<dyn KeyValueStore>) -> GeostoreRegistry {
        GeostoreRegistry::new(self.lookup.clone(), store)
    }

    /// Freshness markers persisting into `store`.
    pub fn freshness_tracker(&self, store: Arc<dyn KeyValueStore>) -> FreshnessTracker {
        FreshnessTracker::new(store)
    }

    pub fn limiter(&self) -> &QueryLimiter {
        self.queries.limiter()
    }

    /// Drops cached dataset metadata.
    pub fn clear_metadata_cache(&self) {
        self.metadata.clear();
    }
}
