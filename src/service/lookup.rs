//! AOI, geostore and dataset lookups.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::Error,
    model::{
        aoi::Aoi,
        dataset::{DatasetField, DatasetSummary},
        geostore::{CreatedGeostore, Geostore},
        Envelope,
    },
    service::{
        auth::TokenManager,
        read_json,
        retry::{BackoffPolicy, RetryContext},
    },
};

static SHARE_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r".*globalforestwatch.org.*aoi/([^/]+).*").expect("valid share link pattern")
});

/// AOI id embedded in a Global Forest Watch share link, if any.
pub fn aoi_id_from_link(link: &str) -> Option<String> {
    SHARE_LINK_PATTERN
        .captures(link)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

#[derive(Serialize)]
struct CreateGeostoreRequest<'a> {
    geometry: &'a geojson::Geometry,
}

pub struct LookupService {
    http: reqwest::Client,
    data_api_url: String,
    resource_watch_url: String,
    tokens: Arc<TokenManager>,
    /// AOI, geostore, field and dataset lookups.
    retry: BackoffPolicy,
    /// Geostore creation.
    create_retry: BackoffPolicy,
}

impl LookupService {
    pub fn new(
        http: reqwest::Client,
        data_api_url: &str,
        resource_watch_url: &str,
        tokens: Arc<TokenManager>,
        retry: BackoffPolicy,
        create_retry: BackoffPolicy,
    ) -> Self {
        Self {
            http,
            data_api_url: data_api_url.to_string(),
            resource_watch_url: resource_watch_url.to_string(),
            tokens,
            retry,
            create_retry,
        }
    }

    /// GET `url` and unwrap the envelope. A 404 is [`Error::NotFound`] naming `what`.
    async fn get_data<T: DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
        authorized: bool,
    ) -> Result<T, Error> {
        let authorization = if authorized {
            Some(self.tokens.authorization().await?)
        } else {
            None
        };
        let retry = RetryContext::new(self.retry);

        retry
            .execute_with_retry(what, || async {
                let mut request = self.http.get(url);
                if let Some(authorization) = &authorization {
                    request = request.header(reqwest::header::AUTHORIZATION, authorization);
                }

                let response = request.send().await?;
                if response.status() == StatusCode::NOT_FOUND {
                    return Err(Error::NotFound(what.to_string()));
                }

                let envelope: Envelope<Option<T>> = read_json(response).await?;
                envelope
                    .data
                    .ok_or_else(|| Error::UnexpectedShape(format!("empty data for {what}")))
            })
            .await
    }

    /// Area of interest by id. An AOI with no geostore is returned as-is.
    pub async fn get_aoi(&self, aoi_id: &str) -> Result<Aoi, Error> {
        let url = format!("{}/v2/area/{}", self.resource_watch_url, aoi_id);
        self.get_data(&url, &format!("AOI {aoi_id}"), true).await
    }

    /// Resolves a share link to an AOI id, following redirects when the link itself does
    /// not carry one.
    pub async fn aoi_from_url(&self, link: &str) -> Result<String, Error> {
        if let Some(aoi_id) = aoi_id_from_link(link) {
            return Ok(aoi_id);
        }

        let retry = RetryContext::new(self.retry);
        let resolved = retry
            .execute_with_retry("share link resolution", || async {
                let response = self.http.head(link).send().await?;
                Ok(response.url().to_string())
            })
            .await?;

        aoi_id_from_link(&resolved).ok_or_else(|| {
            tracing::error!("Unable to parse AOI from globalforestwatch URL: {}", link);
            Error::NotFound(format!("AOI in share link {link}"))
        })
    }

    pub async fn get_geostore(&self, geostore_id: &str) -> Result<Geostore, Error> {
        let url = format!("{}/v2/geostore/{}", self.resource_watch_url, geostore_id);
        self.get_data(&url, &format!("Geostore {geostore_id}"), true).await
    }

    /// Registers `geometry` as a Data API geostore. The returned id is in compact form.
    pub async fn create_geostore(
        &self,
        geometry: &geojson::Geometry,
    ) -> Result<CreatedGeostore, Error> {
        let url = format!("{}/geostore/", self.data_api_url);
        let authorization = self.tokens.authorization().await?;
        let retry = RetryContext::new(self.create_retry);

        retry
            .execute_with_retry("geostore creation", || async {
                let response = self
                    .http
                    .post(&url)
                    .header(reqwest::header::AUTHORIZATION, &authorization)
                    .json(&CreateGeostoreRequest { geometry })
                    .send()
                    .await?;

                let envelope: Envelope<CreatedGeostore> = read_json(response).await?;
                match envelope.status.as_deref() {
                    Some("success") => Ok(envelope.data),
                    other => Err(Error::UnexpectedShape(format!(
                        "geostore creation returned status {other:?}"
                    ))),
                }
            })
            .await
    }

    pub async fn get_dataset_fields(
        &self,
        dataset: &str,
        version: &str,
    ) -> Result<Vec<DatasetField>, Error> {
        let url = format!("{}/dataset/{}/{}/fields", self.data_api_url, dataset, version);
        self.get_data(&url, &format!("fields of {dataset} ({version})"), false)
            .await
    }

    /// Every dataset published on the Data API.
    pub async fn get_datasets(&self) -> Result<Vec<DatasetSummary>, Error> {
        let url = format!("{}/datasets", self.data_api_url);
        self.get_data(&url, "dataset listing", false).await
    }
}
