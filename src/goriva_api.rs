use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Default endpoint for the public goriva.si API
const DEFAULT_ENDPOINT: &str = "https://goriva.si";

/// The search endpoint pins the position; only the name filter varies
const SEARCH_POSITION: &str = "Ljubljana";

pub struct GorivaApi {
    endpoint_url: String,
    client: reqwest::Client,
}

impl Default for GorivaApi {
    fn default() -> Self {
        Self::new()
    }
}

impl GorivaApi {
    pub fn new() -> Self {
        Self::with_endpoint(
            env::var("GORIVA_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
        )
    }

    /// Creates a client against a specific endpoint, used by tests to point
    /// at a mock server
    pub fn with_endpoint(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Runs a station search for the given name filter and decodes the
    /// response body. One unauthenticated GET, no retries.
    pub async fn search(&self, name_filter: &str) -> Result<SearchResponse, reqwest::Error> {
        let url = build_search_url(&self.endpoint_url, name_filter);
        let result = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(result)
    }
}

/// Builds the search URL for a name filter. Spaces become `+`; every other
/// character is passed through untouched, matching what the upstream API
/// expects for this parameter.
pub fn build_search_url(endpoint_url: &str, name_filter: &str) -> String {
    format!(
        "{}/api/v1/search/?position={}&name={}",
        endpoint_url,
        SEARCH_POSITION,
        name_filter.replace(' ', "+")
    )
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<StationRecord>,
}

/// One station as returned by the search endpoint. A price may be null for
/// a fuel type the station lists but has no current quote for.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub prices: HashMap<String, Option<f64>>,
}
