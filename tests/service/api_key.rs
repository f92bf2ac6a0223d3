//! Tests for ApiKeyManager::get_valid_api_key.
//!
//! Verifies key reuse, creation when the account has no usable key, and renewal once the
//! cached key expires.

use chrono::Duration;
use forestwatch::Error;
use forestwatch_test_utils::prelude::*;

use crate::setup::{test_client, test_now};

/// Tests an account that already has a valid key next to an expired one.
///
/// Expected: the valid key is returned and later calls are served from cache
#[tokio::test]
async fn reuses_first_valid_listed_key() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let token = setup.auth().create_token_endpoint(86_400, 1);
    let keys = setup.auth().create_api_keys_endpoint(
        vec![
            auth_factory::api_key("expired_key", test_now() - Duration::days(1)),
            auth_factory::api_key(TEST_API_KEY, test_now() + Duration::days(30)),
        ],
        1,
    );
    let create = setup
        .auth()
        .create_api_key_endpoint(auth_factory::api_key("unused", test_now()), 0);
    let client = test_client(&setup);

    let first = client.api.get_valid_api_key().await?;
    let second = client.api.get_valid_api_key().await?;

    assert_eq!(first.api_key, TEST_API_KEY);
    assert_eq!(first, second);
    token.assert();
    keys.assert();
    create.assert();

    Ok(())
}

/// Tests an account with no keys, which the listing reports as 404.
///
/// Expected: a key is created for the account
#[tokio::test]
async fn creates_key_when_listing_is_missing() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let token = setup.auth().create_token_endpoint(86_400, 1);
    let keys = setup.auth().create_missing_api_keys_endpoint(1);
    let create = setup.auth().create_api_key_endpoint(
        auth_factory::api_key(TEST_API_KEY, test_now() + Duration::days(365)),
        1,
    );
    let client = test_client(&setup);

    let key = client.api.get_valid_api_key().await?;

    assert_eq!(key.api_key, TEST_API_KEY);
    assert_eq!(key.email, TEST_USERNAME);
    token.assert();
    keys.assert();
    create.assert();

    Ok(())
}

/// Tests an account whose only key has expired.
///
/// Expected: a new key is created
#[tokio::test]
async fn creates_key_when_all_keys_expired() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let keys = setup.auth().create_api_keys_endpoint(
        vec![auth_factory::api_key("expired_key", test_now())],
        1,
    );
    let create = setup.auth().create_api_key_endpoint(
        auth_factory::api_key(TEST_API_KEY, test_now() + Duration::days(365)),
        1,
    );
    let client = test_client(&setup);

    let key = client.api.get_valid_api_key().await?;

    assert_eq!(key.api_key, TEST_API_KEY);
    keys.assert();
    create.assert();

    Ok(())
}

/// Tests a cached key that expires between calls.
///
/// Expected: the listing is consulted again and, finding only the expired key, a new key
/// is created
#[tokio::test]
async fn renews_key_after_cached_key_expires() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let _token = setup.auth().create_token_endpoint(86_400, 1);
    let keys = setup.auth().create_api_keys_endpoint(
        vec![auth_factory::api_key(
            "short_lived_key",
            test_now() + Duration::hours(1),
        )],
        2,
    );
    let create = setup.auth().create_api_key_endpoint(
        auth_factory::api_key(TEST_API_KEY, test_now() + Duration::days(365)),
        1,
    );
    let client = test_client(&setup);

    let first = client.api.get_valid_api_key().await?;
    client.clock.advance(Duration::hours(2));
    let renewed = client.api.get_valid_api_key().await?;

    assert_eq!(first.api_key, "short_lived_key");
    assert_eq!(renewed.api_key, TEST_API_KEY);
    keys.assert();
    create.assert();

    Ok(())
}
