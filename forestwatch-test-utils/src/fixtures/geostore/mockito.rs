//! AOI and geostore HTTP mock endpoint creation utilities.
//!
//! Registers the Resource Watch AOI and geostore lookups and the Data API geostore creation
//! endpoint on the mock server.

use mockito::Mock;
use serde_json::{json, Value};

use crate::fixtures::{
    auth::factory::bearer, envelope, geostore::GeostoreFixtures, success_envelope,
};

impl<'a> GeostoreFixtures<'a> {
    /// Create a mock endpoint for an AOI.
    ///
    /// Sets up a mock GET endpoint at `/v2/area/{aoi_id}` requiring the test bearer token.
    ///
    /// # Arguments
    /// - `aoi_id` - The AOI id for the endpoint path
    /// - `aoi` - AOI to return, see [`super::factory::aoi`]
    /// - `expected_requests` - Number of times this endpoint should be called
    ///
    /// # Returns
    /// - `Mock` - The created mock endpoint
    pub fn create_aoi_endpoint(
        &mut self,
        aoi_id: &str,
        aoi: Value,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/v2/area/{}", aoi_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .match_header("authorization", bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(aoi).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock AOI endpoint answering 404.
    pub fn create_missing_aoi_endpoint(&mut self, aoi_id: &str, expected_requests: usize) -> Mock {
        let url = format!("/v2/area/{}", aoi_id);
        let body = json!({ "errors": [{ "status": 404, "detail": "Area not found" }] });

        self.setup
            .server
            .mock("GET", url.as_str())
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint for a Resource Watch geostore.
    pub fn create_geostore_endpoint(
        &mut self,
        geostore_id: &str,
        geostore: Value,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/v2/geostore/{}", geostore_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .match_header("authorization", bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(geostore).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint for geostore creation.
    ///
    /// Sets up a mock POST endpoint at `/geostore/` returning `created` with a `"success"`
    /// status for every request.
    ///
    /// # Arguments
    /// - `created` - Creation result, see [`super::factory::created_geostore`]
    /// - `expected_requests` - Number of times this endpoint should be called
    ///
    /// # Returns
    /// - `Mock` - The created mock endpoint
    pub fn create_geostore_creation_endpoint(
        &mut self,
        created: Value,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", "/geostore/")
            .match_header("authorization", bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(success_envelope(created).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock geostore creation endpoint whose envelope reports `status`.
    pub fn create_rejected_geostore_creation_endpoint(
        &mut self,
        status: &str,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", "/geostore/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": null, "status": status }).to_string())
            .expect(expected_requests)
            .create()
    }
}
