//! Tests for the dataset metadata cache, the date range optimizer and freshness markers.

use std::sync::Arc;

use chrono::Duration;
use forestwatch::{
    model::dataset::DatasetStatus, service::freshness::FreshnessTracker, store::MemoryStore,
    Error,
};
use forestwatch_test_utils::prelude::*;

use crate::setup::{test_client, test_now, with_credentials};

fn integrated_metadata(update_frequency: Option<&str>) -> serde_json::Value {
    dataset_factory::dataset_metadata(
        INTEGRATED_ALERTS_DATASET,
        "latest",
        "2024-07-29T06:00:00.000Z",
        update_frequency,
    )
}

/// Tests repeated metadata lookups within the cache TTL.
///
/// Expected: a single upstream call
#[tokio::test]
async fn serves_metadata_from_cache_within_ttl() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let mock = setup.dataset().create_metadata_endpoint(
        INTEGRATED_ALERTS_DATASET,
        "latest",
        integrated_metadata(Some("daily")),
        1,
    );
    let client = test_client(&setup);

    let first = client
        .api
        .get_dataset_metadata(INTEGRATED_ALERTS_DATASET, "latest")
        .await?;
    client.clock.advance(Duration::minutes(59));
    let second = client
        .api
        .get_dataset_metadata(INTEGRATED_ALERTS_DATASET, "latest")
        .await?;

    assert_eq!(first, second);
    assert_eq!(first.update_frequency(), Some("daily"));
    mock.assert();

    Ok(())
}

/// Tests a lookup once the cached entry is older than the TTL.
///
/// Expected: a second upstream call
#[tokio::test]
async fn refetches_metadata_after_ttl() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let mock = setup.dataset().create_metadata_endpoint(
        INTEGRATED_ALERTS_DATASET,
        "latest",
        integrated_metadata(Some("daily")),
        2,
    );
    let client = test_client(&setup);

    client
        .api
        .get_dataset_metadata(INTEGRATED_ALERTS_DATASET, "latest")
        .await?;
    client.clock.advance(Duration::minutes(61));
    client
        .api
        .get_dataset_metadata(INTEGRATED_ALERTS_DATASET, "latest")
        .await?;

    mock.assert();

    Ok(())
}

/// Tests that clearing the cache forces a refetch.
///
/// Expected: a second upstream call
#[tokio::test]
async fn clearing_cache_forces_refetch() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let mock = setup.dataset().create_metadata_endpoint(
        INTEGRATED_ALERTS_DATASET,
        "latest",
        integrated_metadata(None),
        2,
    );
    let client = test_client(&setup);

    client
        .api
        .get_dataset_metadata(INTEGRATED_ALERTS_DATASET, "latest")
        .await?;
    client.api.clear_metadata_cache();
    client
        .api
        .get_dataset_metadata(INTEGRATED_ALERTS_DATASET, "latest")
        .await?;

    mock.assert();

    Ok(())
}

/// Tests the optimizer for a monthly dataset over a thirty day span.
///
/// Expected: one thirty day window when the cap allows it
#[tokio::test]
async fn optimizer_widens_windows_for_monthly_dataset() {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let mock = setup.dataset().create_metadata_endpoint(
        INTEGRATED_ALERTS_DATASET,
        "latest",
        integrated_metadata(Some("Monthly")),
        1,
    );
    let client = test_client(&setup);
    let start = test_now() - Duration::days(30);

    let windows = client
        .api
        .optimize_date_range(INTEGRATED_ALERTS_DATASET, start, test_now(), 60)
        .await;

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start, start);
    assert_eq!(windows[0].end, test_now());
    mock.assert();
}

/// Tests the optimizer when metadata is unavailable.
///
/// Expected: the span is chunked uniformly at the requested maximum after the metadata
/// call exhausts its retries
#[tokio::test]
async fn optimizer_falls_back_when_metadata_fails() {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let mock = setup.dataset().create_failing_metadata_endpoint(
        INTEGRATED_ALERTS_DATASET,
        "latest",
        500,
        3,
    );
    let client = test_client(&setup);
    let start = test_now() - Duration::days(30);

    let windows = client
        .api
        .optimize_date_range(INTEGRATED_ALERTS_DATASET, start, test_now(), 7)
        .await;

    assert_eq!(windows.len(), 5);
    assert_eq!(windows[0].start, start);
    assert_eq!(windows[4].end, test_now());
    assert!(windows
        .windows(2)
        .all(|pair| pair[0].end == pair[1].start));
    assert!(windows.iter().all(|window| window.days() <= 7));
    mock.assert();
}

/// Tests freshness markers against upstream metadata.
///
/// Verifies an unseen dataset reports updates, and that after saving the marker the same
/// metadata no longer does.
///
/// Expected: has_updates true before saving, false after
#[tokio::test]
async fn freshness_marker_tracks_last_seen_update() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let mock = setup.dataset().create_metadata_endpoint(
        INTEGRATED_ALERTS_DATASET,
        "latest",
        integrated_metadata(Some("daily")),
        1,
    );
    let client = test_client(&setup);
    let tracker = client
        .api
        .freshness_tracker(Arc::new(MemoryStore::new(client.clock.clone())));

    let metadata = client
        .api
        .get_dataset_metadata(INTEGRATED_ALERTS_DATASET, "latest")
        .await?;
    let unseen = tracker.load("integration-1", INTEGRATED_ALERTS_DATASET).await?;
    assert!(FreshnessTracker::has_updates(&unseen, &metadata));

    tracker
        .save("integration-1", &DatasetStatus::from_metadata(&metadata))
        .await?;
    let saved = tracker.load("integration-1", INTEGRATED_ALERTS_DATASET).await?;

    assert_eq!(saved.latest_updated_on, metadata.updated_on);
    assert!(!FreshnessTracker::has_updates(&saved, &metadata));
    mock.assert();

    Ok(())
}
