use std::{sync::Arc, time::Duration};

use crate::{
    error::Error,
    geometry::{multipolygon_from_geojson, partition, polygon_to_geojson, CellSizing},
    model::geostore::Geostore,
    service::lookup::LookupService,
    store::KeyValueStore,
};

/// Outcome of one registration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// Compact ids of the geostores created, in fragment order.
    pub registered: Vec<String>,
    /// Fragments whose registration failed and were skipped.
    pub failed: usize,
}

/// Partitions AOI geometries and keeps the per-AOI list of fragment geostores.
pub struct GeostoreRegistry {
    lookup: Arc<LookupService>,
    store: Arc<dyn KeyValueStore>,
}

impl GeostoreRegistry {
    /// Fragment lists are dropped after a week so AOI edits are eventually picked up.
    pub const FRAGMENT_LIST_TTL: Duration = Duration::from_secs(86_400 * 7);

    pub fn new(lookup: Arc<LookupService>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { lookup, store }
    }

    fn key(aoi_id: &str) -> String {
        format!("geostores:{aoi_id}")
    }

    /// Persisted fragment geostore ids for the AOI, empty when none are stored.
    pub async fn fragment_ids(&self, aoi_id: &str) -> Result<Vec<String>, Error> {
        match self.store.get(&Self::key(aoi_id)).await? {
            Some(saved) => Ok(serde_json::from_str(&saved)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, aoi_id: &str, ids: &[String]) -> Result<(), Error> {
        let value = serde_json::to_string(ids)?;
        self.store
            .set(&Self::key(aoi_id), &value, Some(Self::FRAGMENT_LIST_TTL))
            .await
    }

    /// Partitions the geostore's geometry and registers each fragment as its own geostore.
    ///
    /// Each created id is persisted as soon as it exists. A fragment that fails to register
    /// is logged and skipped.
    ///
    /// # Errors
    /// - [`Error::Partition`]: the AOI geometry has no usable bounds
    /// - [`Error::Geometry`]: the geostore's GeoJSON could not be read
    pub async fn register_fragments(
        &self,
        aoi_id: &str,
        geostore: &Geostore,
        sizing: CellSizing,
    ) -> Result<RegistrationSummary, Error> {
        let geometry = multipolygon_from_geojson(&geostore.attributes.geojson)?;
        let fragments = partition(&geometry, sizing)?;

        let mut ids = self.fragment_ids(aoi_id).await?;
        let mut summary = RegistrationSummary::default();

        for fragment in fragments {
            match self.lookup.create_geostore(&polygon_to_geojson(&fragment)).await {
                Ok(created) => {
                    ids.push(created.gfw_geostore_id.clone());
                    self.save(aoi_id, &ids).await?;
                    summary.registered.push(created.gfw_geostore_id);
                }
                Err(e) => {
                    tracing::warn!(
                        "Error while creating Geostore for AOI {} (invalid partition): {}",
                        aoi_id,
                        e
                    );
                    summary.failed += 1;
                }
            }
        }

        // Refresh the TTL even when nothing new was registered
        self.save(aoi_id, &ids).await?;

        tracing::info!(
            "Registered {} geostore fragments for AOI {} ({} failed)",
            summary.registered.len(),
            aoi_id,
            summary.failed
        );

        Ok(summary)
    }
}
