//! Tests for TokenManager::get_token.
//!
//! Verifies the bearer token is exchanged once and served from cache while valid, refreshed
//! once it enters the expiry safety margin, and that exchange failures surface as
//! authentication errors after the retry budget is spent.

use chrono::Duration;
use forestwatch::{error::auth::AuthError, Error};
use forestwatch_test_utils::prelude::*;

use crate::setup::{test_client, test_now};

/// Tests repeated calls within the token lifetime.
///
/// Expected: exactly one credential exchange
#[tokio::test]
async fn reuses_token_while_valid() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let mock = setup.auth().create_token_endpoint(3600, 1);
    let client = test_client(&setup);

    let first = client.api.get_token(false).await?;
    client.clock.advance(Duration::minutes(30));
    let second = client.api.get_token(false).await?;

    assert_eq!(first, second);
    assert_eq!(first.access_token, TEST_ACCESS_TOKEN);
    assert_eq!(first.expires_at, test_now() + Duration::seconds(3600));
    mock.assert();

    Ok(())
}

/// Tests a call made inside the five second safety margin before expiry.
///
/// Expected: exactly one additional exchange, after which the new token is cached
#[tokio::test]
async fn refreshes_token_near_expiry() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let mock = setup.auth().create_token_endpoint(3600, 2);
    let client = test_client(&setup);

    let first = client.api.get_token(false).await?;
    client.clock.advance(Duration::seconds(3596));
    let refreshed = client.api.get_token(false).await?;
    let cached = client.api.get_token(false).await?;

    assert!(refreshed.expires_at > first.expires_at);
    assert_eq!(refreshed, cached);
    mock.assert();

    Ok(())
}

/// Tests that a forced refresh bypasses a valid cached token.
///
/// Expected: two exchanges
#[tokio::test]
async fn force_refresh_exchanges_again() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let mock = setup.auth().create_token_endpoint(3600, 2);
    let client = test_client(&setup);

    client.api.get_token(false).await?;
    client.api.get_token(true).await?;

    mock.assert();

    Ok(())
}

/// Tests concurrent callers with an empty cache.
///
/// Expected: a single exchange shared by every caller
#[tokio::test]
async fn concurrent_callers_share_one_exchange() -> Result<(), Error> {
    let mut setup = TestSetup::new().await;
    let mock = setup.auth().create_token_endpoint(3600, 1);
    let client = test_client(&setup);

    let (a, b, c) = tokio::join!(
        client.api.get_token(false),
        client.api.get_token(false),
        client.api.get_token(false)
    );

    assert_eq!(a?, b?);
    assert!(c.is_ok());
    mock.assert();

    Ok(())
}

/// Tests rejected credentials.
///
/// Expected: Err(TokenExchange) after a single attempt, since a 401 is not retried
#[tokio::test]
async fn rejected_credentials_fail_without_retry() {
    let mut setup = TestSetup::new().await;
    let mock = setup.auth().create_failing_token_endpoint(401, 1);
    let client = test_client(&setup);

    let result = client.api.get_token(false).await;

    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::TokenExchange { ref username, .. })) if username == TEST_USERNAME
    ));
    mock.assert();
}

/// Tests an exchange endpoint that keeps answering 503.
///
/// Expected: Err(TokenExchange) after three attempts
#[tokio::test]
async fn unavailable_exchange_gives_up_after_retries() {
    let mut setup = TestSetup::new().await;
    let mock = setup.auth().create_failing_token_endpoint(503, 3);
    let client = test_client(&setup);

    let result = client.api.get_token(false).await;

    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::TokenExchange { .. }))
    ));
    mock.assert();
}
