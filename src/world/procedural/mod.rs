//! Seeded procedural layout generation.
//!
//! Deterministic fallback used when no real map data is available: every
//! output is keyed solely off the postcode string, so repeat visits to the
//! same postcode always produce the identical demo world. The hash and the
//! sine-based pseudo-random draw intentionally reproduce the reference
//! construction bit-for-bit, including the fixed per-draw seed offsets
//! (`+i`, `+i+100`, `+i+200`, `+i+500`) that keep the draws independent.

use serde::{Deserialize, Serialize};

use crate::game::creatures::{Creature, CreatureSystem, CreatureType};
use crate::world::{Building, BuildingType, Vector3};

/// Building categories drawn for the synthetic satellite buildings.
const BUILDING_ROSTER: [BuildingType; 5] = [
    BuildingType::Classroom,
    BuildingType::Library,
    BuildingType::Gym,
    BuildingType::Cafeteria,
    BuildingType::Office,
];

/// Creature roster for synthetic worlds.
const CREATURE_ROSTER: [CreatureType; 4] = [
    CreatureType::Hr,
    CreatureType::Finance,
    CreatureType::Estates,
    CreatureType::Gdpr,
];

/// Top-level layout parameters derived from a postcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolLayout {
    /// Number of buildings, in [3, 10)
    pub building_count: u32,
    /// Square terrain edge length in local units, in [50, 100)
    pub terrain_size: u32,
    /// Number of creatures, in [2, 8)
    pub creature_count: u32,
}

/// Fold a postcode string into a 32-bit seed.
///
/// Polynomial rolling hash over UTF-16 code units with left-shift-5
/// accumulation: `seed = (seed << 5) - seed + code` in wrapping signed
/// 32-bit arithmetic, absolute value of the final state.
pub fn generate_seed(postcode: &str) -> u32 {
    let mut seed: i32 = 0;
    for code in postcode.encode_utf16() {
        seed = seed
            .wrapping_shl(5)
            .wrapping_sub(seed)
            .wrapping_add(code as i32);
    }
    seed.unsigned_abs()
}

/// Pseudo-random value in [0, 1) for a given draw index.
///
/// `frac(sin(seed) * 10000)` — cheap, deterministic, and visually spread.
/// Not suitable for anything security-relevant.
pub fn seeded_random(seed: u32) -> f64 {
    let x = (seed as f64).sin() * 10000.0;
    x - x.floor()
}

/// Derive the layout parameters for a postcode.
///
/// Three independent draws at `seed`, `seed + 1`, `seed + 2`, linearly
/// scaled into each range.
pub fn generate_layout(postcode: &str) -> SchoolLayout {
    let seed = generate_seed(postcode);
    let r1 = seeded_random(seed);
    let r2 = seeded_random(seed + 1);
    let r3 = seeded_random(seed + 2);

    SchoolLayout {
        building_count: (3.0 + r1 * 7.0).floor() as u32,
        terrain_size: (50.0 + r2 * 50.0).floor() as u32,
        creature_count: (2.0 + r3 * 6.0).floor() as u32,
    }
}

/// Generate the synthetic building set for a postcode.
///
/// The main building always sits at the origin; satellites are spread
/// across a 30-unit square with sizes and categories drawn from the
/// per-index offsets.
pub fn generate_buildings(postcode: &str, layout: &SchoolLayout) -> Vec<Building> {
    let seed = generate_seed(postcode);
    let mut buildings = Vec::with_capacity(layout.building_count as usize);

    buildings.push(Building {
        id: "building-main".to_string(),
        building_type: BuildingType::MainBuilding,
        position: Vector3::new(0.0, 3.0, 0.0),
        size: Vector3::new(8.0, 6.0, 10.0),
        color: "#C8B4A0".to_string(),
        name: None,
        amenity: None,
        is_main_school: true,
    });

    for i in 1..layout.building_count {
        let r1 = seeded_random(seed + i);
        let r2 = seeded_random(seed + i + 100);
        let r3 = seeded_random(seed + i + 200);

        let x = (r1 - 0.5) * 30.0;
        let z = (r2 - 0.5) * 30.0;
        let building_type = BUILDING_ROSTER[(r3 * BUILDING_ROSTER.len() as f64) as usize];

        buildings.push(Building {
            id: format!("building-{i}"),
            building_type,
            position: Vector3::new(x as f32, 2.0, z as f32),
            size: Vector3::new(
                (4.0 + r1 * 2.0) as f32,
                (3.0 + r2 * 2.0) as f32,
                (4.0 + r3 * 2.0) as f32,
            ),
            color: format!("hsl({}, 40%, 60%)", r1 * 360.0),
            name: None,
            amenity: None,
            is_main_school: false,
        });
    }

    buildings
}

/// Generate the synthetic creature set for a postcode.
///
/// One draw per creature at `seed + i + 500` picks the type from the fixed
/// roster; synthetic creatures carry no scene position.
pub fn generate_creatures(postcode: &str, layout: &SchoolLayout) -> Vec<Creature> {
    let seed = generate_seed(postcode);
    let mut creatures = Vec::with_capacity(layout.creature_count as usize);

    for i in 0..layout.creature_count {
        let r = seeded_random(seed + i + 500);
        let creature_type = CREATURE_ROSTER[(r * CREATURE_ROSTER.len() as f64) as usize];
        creatures.push(CreatureSystem::generate(
            creature_type,
            1,
            Some(format!("creature-{i}")),
        ));
    }

    creatures
}
