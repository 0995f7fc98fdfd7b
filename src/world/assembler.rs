//! World assembly pipeline.
//!
//! Single-pass state machine per generation request: validate the postcode,
//! geocode it, attempt one best-effort real-building fetch, and fall back to
//! the seeded procedural generator whenever real data is unavailable. A
//! geocoded postcode therefore always yields a world; "no real data" is a
//! degraded-but-successful outcome reflected only in the response message.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::game::creatures::{Creature, CreatureSystem, CreatureType};
use crate::geo;
use crate::integrations::{BuildingSource, PostcodeData, PostcodeLookup};
use crate::world::import::{self, ImportOptions, MainSchoolMatch};
use crate::world::procedural::{self, SchoolLayout};
use crate::world::{Building, BuildingType, TerrainData, Vector3, WorldData};

/// Policy knobs for a generation request.
#[derive(Debug, Clone)]
pub struct WorldPolicy {
    /// Search radius for the real-building fetch, in meters
    pub search_radius_m: u32,
    /// Cap on creatures spawned into a real-data world
    pub max_creatures: usize,
    /// Planar jitter applied around a creature's parent building, in meters
    pub creature_jitter_m: f32,
    /// Importer options (building cap, size clamps)
    pub import: ImportOptions,
}

impl Default for WorldPolicy {
    fn default() -> Self {
        Self {
            search_radius_m: 300,
            max_creatures: 25,
            creature_jitter_m: 3.0,
            import: ImportOptions::default(),
        }
    }
}

/// Terminal generation failures.
///
/// Map-data problems never appear here; they degrade to the procedural
/// fallback instead.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Missing or malformed postcode; user-correctable
    #[error("{0}")]
    InvalidInput(String),
    /// Postcode did not resolve
    #[error("{0}")]
    NotFound(String),
    /// Anything else; surfaced with a generic message, never dropped
    #[error("{0}")]
    Unexpected(String),
}

impl GenerateError {
    /// HTTP-style status for transport layers.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Unexpected(_) => 500,
        }
    }
}

/// Transport-agnostic response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response with a payload and informational message.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
        }
    }

    /// Failed response carrying only an error string.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// Generation payload returned to transport layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWorld {
    pub world_data: WorldData,
    pub postcode_data: PostcodeData,
    pub layout: SchoolLayout,
    /// How the main school was identified, when real data was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_school_match: Option<MainSchoolMatch>,
}

/// A completed generation with its human-readable summary.
#[derive(Debug, Clone)]
pub struct Generated {
    pub data: GeneratedWorld,
    pub message: String,
}

/// Map a generation result onto the wire contract.
pub fn into_response(result: Result<Generated, GenerateError>) -> (u16, ApiResponse<GeneratedWorld>) {
    match result {
        Ok(generated) => (200, ApiResponse::ok(generated.data, generated.message)),
        Err(e) => (e.http_status(), ApiResponse::err(e.to_string())),
    }
}

/// Orchestrates postcode lookup, building import, and creature placement.
pub struct WorldAssembler<P, B> {
    postcodes: P,
    buildings: B,
    policy: WorldPolicy,
}

impl<P: PostcodeLookup, B: BuildingSource> WorldAssembler<P, B> {
    /// Create an assembler with default policy.
    pub fn new(postcodes: P, buildings: B) -> Self {
        Self::with_policy(postcodes, buildings, WorldPolicy::default())
    }

    /// Create an assembler with an explicit policy.
    pub fn with_policy(postcodes: P, buildings: B, policy: WorldPolicy) -> Self {
        Self {
            postcodes,
            buildings,
            policy,
        }
    }

    /// Generate a world for a postcode.
    pub async fn generate(&self, postcode: &str) -> Result<Generated, GenerateError> {
        let postcode = postcode.trim();
        if postcode.is_empty() {
            return Err(GenerateError::InvalidInput("Postcode is required".to_string()));
        }

        let postcode_data = self
            .postcodes
            .lookup(postcode)
            .await
            .map_err(|e| GenerateError::NotFound(e.to_string()))?;

        let center = postcode_data.coordinate();
        if !geo::is_within_uk(center) {
            tracing::warn!(
                postcode = %postcode_data.postcode,
                lat = center.latitude,
                lon = center.longitude,
                "geocoded point falls outside the UK bounding box"
            );
        }

        // Layout parameters are always derived; the synthetic path uses all
        // of them, the real path still takes its terrain size from here.
        let layout = procedural::generate_layout(postcode);

        let imported = match self
            .buildings
            .fetch_buildings(center, self.policy.search_radius_m)
            .await
        {
            Ok(raw) if !raw.is_empty() => {
                let imported = import::import_buildings(&raw, center, &self.policy.import);
                if imported.is_empty() {
                    None
                } else {
                    Some(imported)
                }
            }
            Ok(_) => {
                tracing::info!(postcode = %postcode_data.postcode, "map data returned no buildings");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "map data fetch failed, using procedural layout");
                None
            }
        };

        let (buildings, creatures, main_school_match, source_note) = match imported {
            Some(imported) => {
                let main_school = import::find_main_school(&imported);
                let buildings: Vec<Building> = imported
                    .into_iter()
                    .enumerate()
                    .map(|(i, b)| {
                        let is_main = main_school.is_some_and(|(index, _)| index == i);
                        b.into_building(format!("building-{i}"), is_main)
                    })
                    .collect();
                let creatures = self.spawn_world_creatures(&buildings);
                let note = format!("{} real buildings", buildings.len());
                (buildings, creatures, main_school.map(|(_, m)| m), note)
            }
            None => (
                procedural::generate_buildings(postcode, &layout),
                procedural::generate_creatures(postcode, &layout),
                None,
                "procedural layout (map data unavailable)".to_string(),
            ),
        };

        let world_data = WorldData {
            id: format!("world-{}", Uuid::new_v4()),
            school_id: format!("school-{}", postcode_data.postcode),
            postcode: postcode_data.postcode.clone(),
            buildings,
            terrain: TerrainData {
                size: Vector3::new(layout.terrain_size as f32, 0.0, layout.terrain_size as f32),
            },
            creatures,
            generated_at: Utc::now(),
        };

        let mut message = format!(
            "Generated world for {} ({}) using {}",
            postcode_data.postcode, postcode_data.region, source_note
        );
        if main_school_match == Some(MainSchoolMatch::LargestFootprint) {
            message.push_str("; main school inferred from largest footprint");
        }

        tracing::info!(
            postcode = %postcode_data.postcode,
            buildings = world_data.buildings.len(),
            creatures = world_data.creatures.len(),
            "world generated"
        );

        Ok(Generated {
            data: GeneratedWorld {
                world_data,
                postcode_data,
                layout,
                main_school_match,
            },
            message,
        })
    }

    /// Spawn one creature per every other building, up to the policy cap.
    ///
    /// Creature type follows the parent building's category; position gets a
    /// small planar jitter so creatures do not sit exactly on the building
    /// center.
    fn spawn_world_creatures(&self, buildings: &[Building]) -> Vec<Creature> {
        let mut rng = rand::thread_rng();
        let mut creatures = Vec::new();

        for building in buildings.iter().step_by(2) {
            if creatures.len() >= self.policy.max_creatures {
                break;
            }

            let creature_type = creature_type_for(building.building_type);
            let mut creature = CreatureSystem::generate(
                creature_type,
                1,
                Some(format!("creature-{}", creatures.len())),
            );

            let jitter = self.policy.creature_jitter_m;
            let (dx, dz) = if jitter > 0.0 {
                (rng.gen_range(-jitter..jitter), rng.gen_range(-jitter..jitter))
            } else {
                (0.0, 0.0)
            };
            creature.position = Some(Vector3::new(
                building.position.x + dx,
                0.0,
                building.position.z + dz,
            ));

            creatures.push(creature);
        }

        creatures
    }
}

/// Fixed building-category to creature-type table for world population.
fn creature_type_for(building_type: BuildingType) -> CreatureType {
    match building_type {
        BuildingType::MainBuilding => CreatureType::Hr,
        BuildingType::Classroom => CreatureType::Teaching,
        BuildingType::Library => CreatureType::Gdpr,
        BuildingType::Gym => CreatureType::Estates,
        BuildingType::Cafeteria => CreatureType::Finance,
        BuildingType::Office => CreatureType::Compliance,
    }
}
