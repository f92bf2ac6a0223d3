//! Tests for AOI, geostore and dataset lookups.

use forestwatch::{
    geometry::{multipolygon_from_geojson, polygon_to_geojson},
    Error,
};
use forestwatch_test_utils::prelude::*;
use geo::{coord, Rect};

use crate::setup::test_client;

/// Tests fetching an AOI linked to a geostore.
///
/// Expected: Ok with the linked geostore id
#[tokio::test]
async fn fetches_aoi_with_geostore() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let token = setup.auth().create_token_endpoint(86_400, 1);
    let mock = setup.geostore().create_aoi_endpoint(
        TEST_AOI_ID,
        geostore_factory::aoi(TEST_AOI_ID, Some(TEST_AOI_GEOSTORE_ID)),
        1,
    );
    let client = test_client(&setup);

    let aoi = client.api.get_aoi(TEST_AOI_ID).await?;

    assert_eq!(aoi.id, TEST_AOI_ID);
    assert_eq!(aoi.geostore_id(), Some(TEST_AOI_GEOSTORE_ID));
    assert!(aoi.attributes.fire_alerts);
    token.assert();
    mock.assert();

    Ok(())
}

/// Tests an AOI that has no geometry yet.
///
/// Expected: Ok with no geostore id
#[tokio::test]
async fn aoi_without_geostore_is_not_an_error() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let mock = setup
        .geostore()
        .create_aoi_endpoint(TEST_AOI_ID, geostore_factory::aoi(TEST_AOI_ID, None), 1);
    let client = test_client(&setup);

    let aoi = client.api.get_aoi(TEST_AOI_ID).await?;

    assert!(aoi.geostore_id().is_none());
    mock.assert();

    Ok(())
}

/// Tests an AOI id unknown upstream.
///
/// Expected: Err(NotFound) after a single attempt
#[tokio::test]
async fn missing_aoi_is_not_found() {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let mock = setup.geostore().create_missing_aoi_endpoint(TEST_AOI_ID, 1);
    let client = test_client(&setup);

    let result = client.api.get_aoi(TEST_AOI_ID).await;

    assert!(matches!(result, Err(Error::NotFound(_))));
    mock.assert();
}

/// Tests a share link that already carries the AOI id.
///
/// Expected: the id is extracted without any request
#[tokio::test]
async fn share_link_with_aoi_needs_no_request() -> Result<(), Error> {
    let setup = TestSetup::new().await;
    let client = test_client(&setup);
    let link = format!(
        "https://www.globalforestwatch.org/dashboards/aoi/{}/?lang=en",
        TEST_AOI_ID
    );

    let aoi_id = client.api.aoi_from_url(&link).await?;

    assert_eq!(aoi_id, TEST_AOI_ID);

    Ok(())
}

/// Tests a short link that redirects to the dashboard URL.
///
/// Expected: the redirect is followed and the id taken from the final URL
#[tokio::test]
async fn short_link_is_resolved_by_following_redirects() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let target = format!("/globalforestwatch.org/dashboards/aoi/{}", TEST_AOI_ID);
    let location = format!("{}{}", setup.url(), target);
    let short = setup
        .server
        .mock("HEAD", "/gfw-short")
        .with_status(302)
        .with_header("location", &location)
        .expect(1)
        .create();
    let dashboard = setup
        .server
        .mock("HEAD", target.as_str())
        .with_status(200)
        .expect(1)
        .create();
    let client = test_client(&setup);

    let aoi_id = client
        .api
        .aoi_from_url(&format!("{}/gfw-short", setup.url()))
        .await?;

    assert_eq!(aoi_id, TEST_AOI_ID);
    short.assert();
    dashboard.assert();

    Ok(())
}

/// Tests fetching a geostore and reading its geometry.
///
/// Expected: Ok with a feature collection that flattens to the registered square
#[tokio::test]
async fn fetches_geostore_geometry() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let mock = setup.geostore().create_geostore_endpoint(
        TEST_AOI_GEOSTORE_ID,
        geostore_factory::geostore(TEST_AOI_GEOSTORE_ID, geostore_factory::square(0.0, 0.0, 2.0)),
        1,
    );
    let client = test_client(&setup);

    let geostore = client.api.get_geostore(TEST_AOI_GEOSTORE_ID).await?;
    let geometry = multipolygon_from_geojson(&geostore.attributes.geojson)?;

    assert_eq!(geostore.id, TEST_AOI_GEOSTORE_ID);
    assert_eq!(geometry.0.len(), 1);
    mock.assert();

    Ok(())
}

/// Tests registering a geometry as a new geostore.
///
/// Expected: Ok with the id normalized to its compact form
#[tokio::test]
async fn created_geostore_id_is_compact() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let mock = setup.geostore().create_geostore_creation_endpoint(
        geostore_factory::created_geostore(
            TEST_GEOSTORE_UUID,
            geostore_factory::square(0.0, 0.0, 1.0),
        ),
        1,
    );
    let client = test_client(&setup);
    let cell = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 }).to_polygon();

    let created = client.api.create_geostore(&polygon_to_geojson(&cell)).await?;

    assert_eq!(created.gfw_geostore_id, TEST_GEOSTORE_ID);
    mock.assert();

    Ok(())
}

/// Tests a creation response whose envelope does not report success.
///
/// Expected: Err after a single attempt
#[tokio::test]
async fn rejected_geostore_creation_fails() {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let mock = setup
        .geostore()
        .create_rejected_geostore_creation_endpoint("failed", 1);
    let client = test_client(&setup);
    let cell = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 }).to_polygon();

    let result = client.api.create_geostore(&polygon_to_geojson(&cell)).await;

    assert!(result.is_err());
    mock.assert();
}

/// Tests the field and dataset listings, which need no credentials.
///
/// Expected: Ok with the listed fields and datasets, and no credential exchange
#[tokio::test]
async fn lists_fields_and_datasets() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let token = setup.auth().create_token_endpoint(86_400, 0);
    let fields = setup.dataset().create_fields_endpoint(
        FIRE_ALERTS_DATASET,
        "latest",
        vec![
            dataset_factory::dataset_field("alert__date", "date"),
            dataset_factory::dataset_field("confidence__cat", "keyword"),
        ],
        1,
    );
    let datasets = setup.dataset().create_datasets_endpoint(
        vec![dataset_factory::dataset_summary(
            FIRE_ALERTS_DATASET,
            &["v20240730", "latest"],
        )],
        1,
    );
    let client = test_client(&setup);

    let listed_fields = client
        .api
        .get_dataset_fields(FIRE_ALERTS_DATASET, "latest")
        .await?;
    let listed_datasets = client.api.get_datasets().await?;

    assert_eq!(listed_fields.len(), 2);
    assert_eq!(listed_fields[1].name, "confidence__cat");
    assert_eq!(listed_datasets[0].dataset, FIRE_ALERTS_DATASET);
    assert_eq!(listed_datasets[0].versions.len(), 2);
    token.assert();
    fields.assert();
    datasets.assert();

    Ok(())
}
