//! Map data client for the OpenStreetMap Overpass API.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use super::{BuildingSource, FetchError};
use crate::geo::Coordinate;
use crate::world::import::{RawMapData, RawNode, RawWay};

/// Default Overpass interpreter endpoint.
const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Client-side timeout; the query itself also carries a server timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw Overpass element; nodes carry coordinates, ways carry node refs.
#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    nodes: Vec<i64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

impl From<OverpassResponse> for RawMapData {
    fn from(response: OverpassResponse) -> Self {
        let mut data = RawMapData::default();

        for element in response.elements {
            match element.kind.as_str() {
                "node" => {
                    if let (Some(lat), Some(lon)) = (element.lat, element.lon) {
                        data.nodes.push(RawNode {
                            id: element.id,
                            coordinate: Coordinate::new(lat, lon),
                        });
                    }
                }
                "way" => data.ways.push(RawWay {
                    id: element.id,
                    node_refs: element.nodes,
                    tags: element.tags,
                }),
                // Relations are fetched for completeness but not consumed
                _ => {}
            }
        }

        data
    }
}

/// HTTP client for the Overpass interpreter.
pub struct OverpassClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for OverpassClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OverpassClient {
    /// Create a client against the public interpreter.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a client with a custom interpreter URL.
    pub fn with_base_url(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { http, base_url }
    }

    /// Overpass QL query for building ways within a radius of a point.
    fn build_query(center: Coordinate, radius_m: u32) -> String {
        format!(
            "[out:json][timeout:25];\n\
             (\n\
               way[\"building\"](around:{radius},{lat},{lon});\n\
               relation[\"building\"](around:{radius},{lat},{lon});\n\
             );\n\
             out body;\n\
             >;\n\
             out skel qt;",
            radius = radius_m,
            lat = center.latitude,
            lon = center.longitude,
        )
    }

    async fn fetch_inner(&self, center: Coordinate, radius_m: u32) -> Result<RawMapData, FetchError> {
        let query = Self::build_query(center, radius_m);

        tracing::debug!(
            lat = center.latitude,
            lon = center.longitude,
            radius_m,
            "fetching buildings from Overpass"
        );

        let response = self
            .http
            .post(&self.base_url)
            .body(query)
            .send()
            .await
            .map_err(|e| FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError(format!("Overpass API error: {}", response.status())));
        }

        let body: OverpassResponse = response
            .json()
            .await
            .map_err(|e| FetchError(e.to_string()))?;

        Ok(body.into())
    }
}

impl BuildingSource for OverpassClient {
    async fn fetch_buildings(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<RawMapData, FetchError> {
        self.fetch_inner(center, radius_m).await
    }
}
