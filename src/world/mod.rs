//! School World Module
//!
//! Entities and pipeline for turning a UK postcode into a renderable school
//! world: the deterministic procedural generator, the OpenStreetMap building
//! importer, and the assembler that orchestrates them into a `WorldData`
//! aggregate consumed by presentation layers.

pub mod assembler;
pub mod import;
pub mod procedural;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::game::creatures::Creature;

/// A 3D vector in local scene units, serialized as `{x, y, z}`.
///
/// Kept separate from `glam::Vec3` so the wire shape stays a JSON object
/// rather than an array; internal math converts through [`Vec3`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Create a vector from components.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Category assigned to every building in a generated world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    MainBuilding,
    Classroom,
    Library,
    Gym,
    Cafeteria,
    Office,
}

impl BuildingType {
    /// Default render color for buildings classified from real map data.
    pub fn default_color(&self) -> &'static str {
        match self {
            Self::MainBuilding => "#C8B4A0",
            Self::Classroom => "#A0B4C8",
            Self::Library => "#B48CC8",
            Self::Gym => "#8CC8A0",
            Self::Cafeteria => "#C8A08C",
            Self::Office => "#A0A0B4",
        }
    }
}

/// A single building placed in the local scene.
///
/// Immutable once assembly finishes; a fresh set is produced per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    /// Stable identifier within the generated world
    pub id: String,
    /// Assigned category
    #[serde(rename = "type")]
    pub building_type: BuildingType,
    /// Center position in local scene units (meters)
    pub position: Vector3,
    /// Width / height / depth in meters
    pub size: Vector3,
    /// Render color (hex or hsl string)
    pub color: String,
    /// Building name from map data, when tagged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Map-data amenity tag, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenity: Option<String>,
    /// At most one building per world carries this flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_main_school: bool,
}

/// Ground plane dimensions for the generated world.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainData {
    /// Terrain extent in local units (y is unused and kept at 0)
    pub size: Vector3,
}

/// Aggregate root produced once per generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldData {
    /// Fresh identifier, never reused across requests
    pub id: String,
    /// Identifier derived from the postcode
    pub school_id: String,
    /// Canonical postcode as returned by the geocoder
    pub postcode: String,
    /// Never empty; a placeholder layout is synthesized when no data exists
    pub buildings: Vec<Building>,
    pub terrain: TerrainData,
    pub creatures: Vec<Creature>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
