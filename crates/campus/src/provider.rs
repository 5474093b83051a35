//! HTTP data provider for list requests
//!
//! Issues `GET <base-url>/<resource>?<query>` and hands the buffered response
//! to the pure mappers in `campus_core::response`. No retries and no timeout
//! of its own.

use crate::config::BackendConfig;
use crate::prelude::*;
use campus_core::response::{map_list_response, BufferedResponse};
use campus_core::{ListRequest, ListResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

pub struct DataProvider {
    client: reqwest::Client,
    config: BackendConfig,
}

impl DataProvider {
    pub fn new(config: BackendConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Full request URL of a list request
    pub fn list_url(&self, request: &ListRequest) -> String {
        let url = self.config.endpoint_url(request.endpoint());
        let query = request.query_params().to_query_string();
        if query.is_empty() {
            url
        } else {
            format!("{url}?{query}")
        }
    }

    /// Send the request and read the whole body
    pub async fn fetch(&self, request: &ListRequest) -> Result<BufferedResponse, Error> {
        let url = self.list_url(request);
        log::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to send request to {url}: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response from {url}: {e}")))?;

        log::debug!("{url} answered {status} ({} bytes)", body.len());

        Ok(BufferedResponse::new(status, body.to_vec()))
    }

    /// List a resource: records and total count
    pub async fn get_list(&self, request: &ListRequest) -> Result<ListResult, Error> {
        let response = self.fetch(request).await?;

        let result = map_list_response(&response).map_err(|err| {
            log::warn!(
                "Listing {} failed with status {}: {}",
                request.resource,
                err.status_code,
                err.message
            );
            Error::from(err)
        })?;

        log::info!(
            "Listed {} {} of {} total",
            result.data.len(),
            request.resource,
            result.total
        );

        Ok(result)
    }
}
