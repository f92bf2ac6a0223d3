//! Credential HTTP mock endpoint creation utilities.
//!
//! Registers the token exchange and API key endpoints of the Data API on the mock server.
//! Every endpoint verifies it was called the expected number of times.

use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::{
    constant::{TEST_ORGANIZATION, TEST_PASSWORD, TEST_USERNAME},
    fixtures::{
        auth::{factory, AuthFixtures},
        envelope,
    },
};

impl<'a> AuthFixtures<'a> {
    /// Create a mock endpoint for the credential exchange.
    ///
    /// Sets up a mock POST endpoint at `/auth/token` that only matches the test account's
    /// form-encoded credentials and returns a token valid for `expires_in` seconds.
    ///
    /// # Arguments
    /// - `expires_in` - Lifetime of the returned token in seconds
    /// - `expected_requests` - Number of times this endpoint should be called
    ///
    /// # Returns
    /// - `Mock` - The created mock endpoint
    pub fn create_token_endpoint(&mut self, expires_in: i64, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".into(), TEST_USERNAME.into()),
                Matcher::UrlEncoded("password".into(), TEST_PASSWORD.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(factory::token(expires_in)).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock credential exchange that always answers with `status`.
    pub fn create_failing_token_endpoint(
        &mut self,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/token")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "status": "failed", "message": "Unauthorized" }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint listing the account's API keys.
    ///
    /// Sets up a mock GET endpoint at `/auth/apikeys` requiring the test bearer token.
    ///
    /// # Arguments
    /// - `keys` - API key records, see [`factory::api_key`]
    /// - `expected_requests` - Number of times this endpoint should be called
    ///
    /// # Returns
    /// - `Mock` - The created mock endpoint
    pub fn create_api_keys_endpoint(&mut self, keys: Vec<Value>, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("GET", "/auth/apikeys")
            .match_header("authorization", factory::bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(Value::Array(keys)).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock key listing answering 404, which the Data API uses for "no keys".
    pub fn create_missing_api_keys_endpoint(&mut self, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("GET", "/auth/apikeys")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(json!({ "status": "failed", "message": "No API keys" }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint for API key creation.
    ///
    /// Sets up a mock POST endpoint at `/auth/apikey` that matches a request for the test
    /// account and organization with no domain restrictions.
    ///
    /// # Arguments
    /// - `key` - API key record to return, see [`factory::api_key`]
    /// - `expected_requests` - Number of times this endpoint should be called
    ///
    /// # Returns
    /// - `Mock` - The created mock endpoint
    pub fn create_api_key_endpoint(&mut self, key: Value, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("POST", "/auth/apikey")
            .match_header("authorization", factory::bearer().as_str())
            .match_body(Matcher::PartialJson(json!({
                "email": TEST_USERNAME,
                "organization": TEST_ORGANIZATION,
                "domains": []
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(key).to_string())
            .expect(expected_requests)
            .create()
    }
}
