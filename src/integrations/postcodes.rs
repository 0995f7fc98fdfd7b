//! Postcode geocoding client for the postcodes.io API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{LookupError, PostcodeLookup};
use crate::geo::Coordinate;

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.postcodes.io";

/// Request timeout; failures beyond this are ordinary lookup failures.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Geocoded postcode data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostcodeData {
    pub postcode: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region: String,
    pub district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
}

impl PostcodeData {
    /// The geocoded point.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// postcodes.io response envelope.
#[derive(Debug, Deserialize)]
struct IoResponse {
    result: Option<IoResult>,
}

/// postcodes.io lookup result (subset of fields we consume).
#[derive(Debug, Deserialize)]
struct IoResult {
    postcode: String,
    latitude: f64,
    longitude: f64,
    region: Option<String>,
    admin_district: Option<String>,
    admin_ward: Option<String>,
}

impl From<IoResult> for PostcodeData {
    fn from(r: IoResult) -> Self {
        Self {
            postcode: r.postcode,
            latitude: r.latitude,
            longitude: r.longitude,
            region: r.region.unwrap_or_default(),
            district: r.admin_district.unwrap_or_default(),
            ward: r.admin_ward,
        }
    }
}

/// HTTP client for postcodes.io.
pub struct PostcodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for PostcodeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PostcodeClient {
    /// Create a client against the public API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { http, base_url }
    }

    /// Strip whitespace so "LS19 7XB" and "LS197XB" hit the same resource.
    fn clean_postcode(postcode: &str) -> String {
        postcode.chars().filter(|c| !c.is_whitespace()).collect()
    }

    async fn lookup_inner(&self, postcode: &str) -> Result<PostcodeData, LookupError> {
        let clean = Self::clean_postcode(postcode);
        let url = format!("{}/postcodes/{}", self.base_url, clean);

        tracing::debug!(postcode = %clean, "looking up postcode");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Upstream(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        if !response.status().is_success() {
            return Err(LookupError::Upstream(response.status().to_string()));
        }

        let body: IoResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Upstream(e.to_string()))?;

        body.result.map(PostcodeData::from).ok_or(LookupError::NotFound)
    }
}

impl PostcodeLookup for PostcodeClient {
    async fn lookup(&self, postcode: &str) -> Result<PostcodeData, LookupError> {
        self.lookup_inner(postcode).await
    }
}
