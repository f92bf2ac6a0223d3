//! Dataset HTTP mock endpoint creation utilities.
//!
//! Registers dataset metadata, field, listing and alert query endpoints of the Data API on
//! the mock server.

use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::{
    constant::TEST_API_KEY,
    fixtures::{dataset::DatasetFixtures, envelope, success_envelope},
};

impl<'a> DatasetFixtures<'a> {
    /// Create a mock endpoint for a dataset version's metadata.
    ///
    /// Sets up a mock GET endpoint at `/dataset/{dataset}/{version}` that requires the test
    /// API key.
    ///
    /// # Arguments
    /// - `dataset` - Dataset name for the endpoint path
    /// - `version` - Version name for the endpoint path
    /// - `metadata` - Metadata to return, see [`super::factory::dataset_metadata`]
    /// - `expected_requests` - Number of times this endpoint should be called
    ///
    /// # Returns
    /// - `Mock` - The created mock endpoint
    pub fn create_metadata_endpoint(
        &mut self,
        dataset: &str,
        version: &str,
        metadata: Value,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/dataset/{}/{}", dataset, version);

        self.setup
            .server
            .mock("GET", url.as_str())
            .match_header("x-api-key", TEST_API_KEY)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(metadata).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock metadata endpoint that always answers with `status`.
    pub fn create_failing_metadata_endpoint(
        &mut self,
        dataset: &str,
        version: &str,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/dataset/{}/{}", dataset, version);

        self.setup
            .server
            .mock("GET", url.as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "status": "error", "message": "Internal Server Error" }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint for the alert query of one geostore.
    ///
    /// Sets up a mock GET endpoint at `/dataset/{dataset}/latest/query/json` that requires
    /// the test API key and matches only requests for `geostore_id`.
    ///
    /// # Arguments
    /// - `dataset` - Dataset name for the endpoint path
    /// - `geostore_id` - Compact geostore id expected in the query string
    /// - `records` - Raw alert rows to return
    /// - `expected_requests` - Number of times this endpoint should be called
    ///
    /// # Returns
    /// - `Mock` - The created mock endpoint
    pub fn create_query_endpoint(
        &mut self,
        dataset: &str,
        geostore_id: &str,
        records: Vec<Value>,
        expected_requests: usize,
    ) -> Mock {
        self.query_mock(dataset, Matcher::UrlEncoded("geostore_id".into(), geostore_id.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(success_envelope(Value::Array(records)).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Like [`create_query_endpoint`](Self::create_query_endpoint), additionally requiring
    /// the `sql` parameter to equal `sql`.
    pub fn create_query_endpoint_with_sql(
        &mut self,
        dataset: &str,
        geostore_id: &str,
        sql: &str,
        records: Vec<Value>,
        expected_requests: usize,
    ) -> Mock {
        let matcher = Matcher::AllOf(vec![
            Matcher::UrlEncoded("geostore_id".into(), geostore_id.into()),
            Matcher::UrlEncoded("sql".into(), sql.into()),
        ]);

        self.query_mock(dataset, matcher)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(success_envelope(Value::Array(records)).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock alert query for `geostore_id` that always answers with `status`.
    pub fn create_failing_query_endpoint(
        &mut self,
        dataset: &str,
        geostore_id: &str,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.query_mock(dataset, Matcher::UrlEncoded("geostore_id".into(), geostore_id.into()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "status": "error", "message": "Service Unavailable" }).to_string())
            .expect(expected_requests)
            .create()
    }

    fn query_mock(&mut self, dataset: &str, query: Matcher) -> Mock {
        let url = format!("/dataset/{}/latest/query/json", dataset);

        self.setup
            .server
            .mock("GET", url.as_str())
            .match_header("x-api-key", TEST_API_KEY)
            .match_query(query)
    }

    /// Create a mock endpoint for a dataset version's fields.
    pub fn create_fields_endpoint(
        &mut self,
        dataset: &str,
        version: &str,
        fields: Vec<Value>,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/dataset/{}/{}/fields", dataset, version);

        self.setup
            .server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(Value::Array(fields)).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint for the dataset listing.
    pub fn create_datasets_endpoint(
        &mut self,
        datasets: Vec<Value>,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", "/datasets")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(Value::Array(datasets)).to_string())
            .expect(expected_requests)
            .create()
    }
}
