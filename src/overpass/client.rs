//! Blocking HTTP transport for the Overpass API.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

use super::query::TIMEOUT_SECS;

const USER_AGENT: &str = "katapult/0.1 (places-of-worship downloader)";

/// Failures of the outbound call or of decoding its response body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid overpass endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("overpass request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The body was not the expected Overpass JSON. Carries the raw
    /// response text so callers can decide how to surface it.
    #[error("response body is not valid Overpass JSON: {source}")]
    Decode {
        source: serde_json::Error,
        raw_body: String,
    },
}

/// Port for posting a query and getting the raw response body back.
pub trait QueryTransport {
    fn post_query(&self, query: &str) -> Result<String, TransportError>;
}

/// Overpass API client: one POST per query, no retries.
pub struct OverpassClient {
    endpoint: Url,
    client: Client,
}

impl OverpassClient {
    pub fn new(endpoint: &str) -> Result<Self, TransportError> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            client: Client::builder()
                .user_agent(USER_AGENT)
                // Headroom over the server-side timeout in the query text.
                .timeout(Duration::from_secs(u64::from(TIMEOUT_SECS) + 30))
                .build()?,
        })
    }
}

impl QueryTransport for OverpassClient {
    fn post_query(&self, query: &str) -> Result<String, TransportError> {
        // The interpreter takes the query as a form field named `data`.
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("data", query)])
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }
}

/// Decode a raw response body into JSON, keeping the body on failure.
pub fn decode_body(body: &str) -> Result<serde_json::Value, TransportError> {
    serde_json::from_str(body).map_err(|source| TransportError::Decode {
        source,
        raw_body: body.to_string(),
    })
}
