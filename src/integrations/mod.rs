//! External API collaborators.
//!
//! The world assembler talks to two upstream services through the traits in
//! this module: a postcode geocoder (postcodes.io) and a map data source
//! (OpenStreetMap Overpass). Both are best-effort, single-attempt clients;
//! retry and backoff are deliberately out of scope.

pub mod overpass;
pub mod postcodes;

use std::future::Future;

use thiserror::Error;

use crate::geo::Coordinate;
use crate::world::import::RawMapData;

pub use overpass::OverpassClient;
pub use postcodes::{PostcodeClient, PostcodeData};

/// Geocoding failure. Surfaced verbatim to the caller.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Postcode not found")]
    NotFound,
    #[error("Failed to fetch postcode data: {0}")]
    Upstream(String),
}

/// Map data fetch failure. Never fatal: the assembler falls back to the
/// procedural generator and only reflects this in the response message.
#[derive(Debug, Error)]
#[error("Map data fetch failed: {0}")]
pub struct FetchError(pub String);

/// Postcode geocoding collaborator.
pub trait PostcodeLookup: Send + Sync {
    /// Resolve a postcode to coordinates and admin metadata.
    fn lookup(
        &self,
        postcode: &str,
    ) -> impl Future<Output = Result<PostcodeData, LookupError>> + Send;
}

/// Raw building/map data collaborator.
pub trait BuildingSource: Send + Sync {
    /// Fetch raw ways and nodes within `radius_m` of `center`.
    fn fetch_buildings(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> impl Future<Output = Result<RawMapData, FetchError>> + Send;
}
