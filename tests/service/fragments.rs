//! Tests for GeostoreRegistry::register_fragments.
//!
//! Verifies an AOI geometry is partitioned into grid fragments, each registered as its own
//! geostore and persisted under the AOI, and that bad fragments and bad geometries are
//! handled without registering anything spurious.

use std::sync::Arc;

use forestwatch::{
    error::partition::PartitionError,
    geometry::CellSizing,
    store::{KeyValueStore, MemoryStore},
    Error,
};
use forestwatch_test_utils::prelude::*;
use serde_json::json;

use crate::setup::test_client;

fn square_geostore(size: f64) -> forestwatch::model::geostore::Geostore {
    serde_json::from_value(geostore_factory::geostore(
        TEST_AOI_GEOSTORE_ID,
        geostore_factory::square(0.0, 0.0, size),
    ))
    .unwrap()
}

/// Tests a two degree square partitioned on a one degree grid.
///
/// Expected: four geostores created and their ids persisted for the AOI
#[tokio::test]
async fn registers_one_geostore_per_fragment() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let mock = setup.geostore().create_geostore_creation_endpoint(
        geostore_factory::created_geostore(
            TEST_GEOSTORE_UUID,
            geostore_factory::square(0.0, 0.0, 1.0),
        ),
        4,
    );
    let client = test_client(&setup);
    let store = Arc::new(MemoryStore::new(client.clock.clone()));
    let registry = client.api.geostore_registry(store.clone());

    let summary = registry
        .register_fragments(TEST_AOI_ID, &square_geostore(2.0), CellSizing::Fixed(1.0))
        .await?;

    assert_eq!(summary.registered.len(), 4);
    assert_eq!(summary.failed, 0);
    assert!(summary.registered.iter().all(|id| id == TEST_GEOSTORE_ID));
    assert_eq!(registry.fragment_ids(TEST_AOI_ID).await?.len(), 4);
    assert!(store
        .get(&format!("geostores:{}", TEST_AOI_ID))
        .await?
        .is_some());
    mock.assert();

    Ok(())
}

/// Tests fragments whose registration is rejected upstream.
///
/// Expected: Ok with every fragment counted as failed and nothing persisted but an empty list
#[tokio::test]
async fn rejected_fragments_are_skipped() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let mock = setup
        .geostore()
        .create_rejected_geostore_creation_endpoint("failed", 4);
    let client = test_client(&setup);
    let registry = client
        .api
        .geostore_registry(Arc::new(MemoryStore::new(client.clock.clone())));

    let summary = registry
        .register_fragments(TEST_AOI_ID, &square_geostore(2.0), CellSizing::Fixed(1.0))
        .await?;

    assert!(summary.registered.is_empty());
    assert_eq!(summary.failed, 4);
    assert!(registry.fragment_ids(TEST_AOI_ID).await?.is_empty());
    mock.assert();

    Ok(())
}

/// Tests an AOI whose geometry has no area.
///
/// Expected: Err(Partition(NoBounds)) and no geostore creation
#[tokio::test]
async fn geometry_without_area_has_no_bounds() {
    let mut setup = TestSetup::new().await;
    let mock = setup.geostore().create_geostore_creation_endpoint(
        geostore_factory::created_geostore(
            TEST_GEOSTORE_UUID,
            geostore_factory::square(0.0, 0.0, 1.0),
        ),
        0,
    );
    let client = test_client(&setup);
    let registry = client
        .api
        .geostore_registry(Arc::new(MemoryStore::new(client.clock.clone())));
    let point: forestwatch::model::geostore::Geostore = serde_json::from_value(
        geostore_factory::geostore(
            TEST_AOI_GEOSTORE_ID,
            json!({ "type": "Point", "coordinates": [10.0, 10.0] }),
        ),
    )
    .unwrap();

    let result = registry
        .register_fragments(TEST_AOI_ID, &point, CellSizing::Fixed(1.0))
        .await;

    assert!(matches!(
        result,
        Err(Error::Partition(PartitionError::NoBounds))
    ));
    mock.assert();
}

/// Tests the fragment-count cap on a sixteen square degree AOI.
///
/// Expected: a two degree grid, giving exactly the four fragments the cap allows
#[tokio::test]
async fn capped_sizing_bounds_fragment_count() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let creation = setup.geostore().create_geostore_creation_endpoint(
        geostore_factory::created_geostore(
            TEST_GEOSTORE_UUID,
            geostore_factory::square(0.0, 0.0, 2.0),
        ),
        4,
    );
    let client = test_client(&setup);
    let registry = client
        .api
        .geostore_registry(Arc::new(MemoryStore::new(client.clock.clone())));

    let summary = registry
        .register_fragments(
            TEST_AOI_ID,
            &square_geostore(4.0),
            CellSizing::Capped { max_partitions: 4 },
        )
        .await?;

    assert_eq!(summary.registered.len(), 4);
    creation.assert();

    Ok(())
}
