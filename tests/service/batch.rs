//! Tests for the multi-geostore query paths.
//!
//! Verifies that a batch has one entry per geostore even when some geostores fail, that
//! credential failures abort the batch, and that the optimized path concatenates per-window
//! results.

use std::sync::Arc;

use chrono::Duration;
use forestwatch::{
    error::auth::AuthError,
    model::{dataset::Dataset, window::DateWindow},
    service::{limiter::QueryLimiter, query::OptimizeOptions},
    util::time::ManualClock,
    DataApi, Error,
};
use forestwatch_test_utils::prelude::*;

use crate::setup::{test_client, test_config, test_now, test_window, with_credentials};

fn geostore_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{:032x}", i + 1)).collect()
}

/// Tests a batch of five geostores where one keeps failing.
///
/// Expected: Ok with five entries; the failing geostore maps to an empty list
#[tokio::test]
async fn failing_geostore_maps_to_empty_list() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let ids = geostore_ids(5);
    for id in &ids[..4] {
        let mock = setup.dataset().create_query_endpoint(
            INTEGRATED_ALERTS_DATASET,
            id,
            vec![dataset_factory::integrated_alert(
                1.0,
                2.0,
                "2024-07-25",
                "highest",
            )],
            1,
        );
        setup.track(mock);
    }
    let failing = setup.dataset().create_failing_query_endpoint(
        INTEGRATED_ALERTS_DATASET,
        &ids[4],
        503,
        3,
    );
    setup.track(failing);
    let client = test_client(&setup);

    let results = client
        .api
        .get_alerts_for_many_geostores(
            Dataset::IntegratedAlerts,
            &ids,
            test_window(),
            "highest",
            5,
        )
        .await?;

    assert_eq!(results.len(), 5);
    for id in &ids[..4] {
        assert_eq!(results[id].len(), 1);
    }
    assert!(results[&ids[4]].is_empty());
    setup.assert_mocks();

    Ok(())
}

/// Tests a batch whose credentials are rejected.
///
/// Expected: Err(Auth) and no alert query is sent
#[tokio::test]
async fn credential_failure_fails_the_batch() {
    let mut setup = TestSetup::new().await;
    let token = setup.auth().create_failing_token_endpoint(401, 1);
    let ids = geostore_ids(3);
    let query = setup.dataset().create_query_endpoint(
        INTEGRATED_ALERTS_DATASET,
        &ids[0],
        Vec::new(),
        0,
    );
    let client = test_client(&setup);

    let result = client
        .api
        .get_alerts_for_many_geostores(
            Dataset::IntegratedAlerts,
            &ids,
            test_window(),
            "highest",
            2,
        )
        .await;

    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::TokenExchange { .. }))
    ));
    token.assert();
    query.assert();
}

/// Tests a batch with no geostores.
///
/// Expected: Ok with an empty map and no credential or query request
#[tokio::test]
async fn empty_batch_makes_no_requests() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let token = setup.auth().create_failing_token_endpoint(401, 0);
    setup.track(token);
    let client = test_client(&setup);

    let results = client
        .api
        .get_alerts_for_many_geostores(
            Dataset::IntegratedAlerts,
            &[],
            test_window(),
            "highest",
            5,
        )
        .await?;

    assert!(results.is_empty());
    setup.assert_mocks();

    Ok(())
}

/// Tests that a query backing off between retries does not hold its limiter permit.
///
/// Verifies with a single-permit limiter that the permit is free during the failing
/// query's first backoff sleep and that a healthy query completes within that sleep.
///
/// Expected: the healthy query succeeds while the failing one is still retrying
#[tokio::test]
async fn backoff_releases_limiter_permit() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let ids = geostore_ids(2);
    let failing = setup.dataset().create_failing_query_endpoint(
        INTEGRATED_ALERTS_DATASET,
        &ids[0],
        503,
        3,
    );
    let healthy = setup.dataset().create_query_endpoint(
        INTEGRATED_ALERTS_DATASET,
        &ids[1],
        vec![dataset_factory::integrated_alert(
            1.0,
            2.0,
            "2024-07-25",
            "highest",
        )],
        1,
    );
    setup.track(failing);
    setup.track(healthy);

    // First backoff sleep lasts 100ms at this unit
    let config = test_config(&setup).with_backoff_unit(std::time::Duration::from_millis(20));
    let api = DataApi::with_components(
        &config,
        QueryLimiter::new(1),
        Arc::new(ManualClock::new(test_now())),
    )?;

    let (failed, healthy) = tokio::join!(
        api.get_integrated_alerts(&ids[0], test_window(), "highest"),
        async {
            tokio::time::sleep(std::time::Duration::from_millis(40)).await;
            let available = api.limiter().available();
            let started = tokio::time::Instant::now();
            let alerts = api
                .get_integrated_alerts(&ids[1], test_window(), "highest")
                .await;
            (available, started.elapsed(), alerts)
        }
    );

    let (available, elapsed, alerts) = healthy;
    assert_eq!(available, 1);
    assert!(elapsed < std::time::Duration::from_millis(60));
    assert_eq!(alerts?.len(), 1);
    assert!(failed.is_err());
    setup.assert_mocks();

    Ok(())
}

/// Tests the optimized path over a fourteen day span of a weekly dataset.
///
/// Verifies the span is split into two seven day windows and each geostore's list is the
/// concatenation of both windows' results.
///
/// Expected: Ok with two records per geostore from two queries each
#[tokio::test]
async fn optimized_query_concatenates_windows() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let metadata = setup.dataset().create_metadata_endpoint(
        INTEGRATED_ALERTS_DATASET,
        "latest",
        dataset_factory::dataset_metadata(
            INTEGRATED_ALERTS_DATASET,
            "latest",
            "2024-07-29T06:00:00.000Z",
            Some("weekly"),
        ),
        1,
    );
    setup.track(metadata);
    let ids = geostore_ids(2);
    for id in &ids {
        let mock = setup.dataset().create_query_endpoint(
            INTEGRATED_ALERTS_DATASET,
            id,
            vec![dataset_factory::integrated_alert(
                1.0,
                2.0,
                "2024-07-25",
                "high",
            )],
            2,
        );
        setup.track(mock);
    }
    let client = test_client(&setup);
    let window = DateWindow::new(test_now() - Duration::days(14), test_now());

    let results = client
        .api
        .get_alerts_optimized(
            Dataset::IntegratedAlerts,
            &ids,
            window,
            "high",
            OptimizeOptions::default(),
        )
        .await?;

    assert_eq!(results.len(), 2);
    assert!(results.values().all(|alerts| alerts.len() == 2));
    setup.assert_mocks();

    Ok(())
}

/// Tests the optimized path with date chunking disabled.
///
/// Expected: the whole span is queried once per geostore without consulting metadata
#[tokio::test]
async fn optimized_query_without_smart_dates_uses_one_window() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    with_credentials(&mut setup, 1);
    let metadata = setup.dataset().create_metadata_endpoint(
        FIRE_ALERTS_DATASET,
        "latest",
        dataset_factory::dataset_metadata(FIRE_ALERTS_DATASET, "latest", "2024-07-29", None),
        0,
    );
    setup.track(metadata);
    let ids = geostore_ids(1);
    let query = setup.dataset().create_query_endpoint(
        FIRE_ALERTS_DATASET,
        &ids[0],
        vec![dataset_factory::fire_alert(1.0, 2.0, "2024-07-20", "h", 4.2)],
        1,
    );
    setup.track(query);
    let client = test_client(&setup);
    let options = OptimizeOptions {
        smart_dates: false,
        ..OptimizeOptions::default()
    };

    let results = client
        .api
        .get_alerts_optimized(
            Dataset::NasaViirsFireAlerts,
            &ids,
            DateWindow::new(test_now() - Duration::days(30), test_now()),
            "high",
            options,
        )
        .await?;

    assert_eq!(results[&ids[0]].len(), 1);
    setup.assert_mocks();

    Ok(())
}
