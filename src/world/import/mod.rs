//! Real-world building import from raw map data.
//!
//! Converts a collection of tagged map "ways" (building polygons) into a
//! normalized building list positioned relative to the world center.
//! Footprints are estimated from each way's bounding box, heights from
//! explicit tags or level counts, and everything is clamped to sane render
//! bounds before the transient [`ImportedBuilding`] values are converted to
//! public [`Building`] entities at the end of the pipeline.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geo::{distance_km, Coordinate};
use crate::world::{Building, BuildingType, Vector3};

/// A resolved map node.
#[derive(Debug, Clone, Copy)]
pub struct RawNode {
    pub id: i64,
    pub coordinate: Coordinate,
}

/// A tagged map polygon referencing its member nodes by id.
#[derive(Debug, Clone)]
pub struct RawWay {
    pub id: i64,
    pub node_refs: Vec<i64>,
    pub tags: HashMap<String, String>,
}

/// Raw node/way collection as fetched from the map data source.
#[derive(Debug, Clone, Default)]
pub struct RawMapData {
    pub nodes: Vec<RawNode>,
    pub ways: Vec<RawWay>,
}

impl RawMapData {
    /// True when the fetch produced nothing usable.
    pub fn is_empty(&self) -> bool {
        self.ways.is_empty()
    }
}

/// Importer policy knobs.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Import stops after this many qualifying buildings (renderer bound)
    pub max_buildings: usize,
    /// Width/depth clamp in meters
    pub footprint_range_m: (f32, f32),
    /// Height clamp in meters
    pub height_range_m: (f32, f32),
    /// Meters per tagged building level
    pub meters_per_level: f32,
    /// Assumed level count when untagged
    pub default_levels: u32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_buildings: 50,
            footprint_range_m: (3.0, 30.0),
            height_range_m: (3.0, 50.0),
            meters_per_level: 3.0,
            default_levels: 2,
        }
    }
}

/// Transient import intermediate.
///
/// Carries the map metadata needed for classification and main-school
/// selection; converted to the public [`Building`] shape only once the
/// pipeline is done with it.
#[derive(Debug, Clone)]
pub struct ImportedBuilding {
    /// Source way id
    pub source_id: i64,
    /// Geocoded centroid
    pub centroid: Coordinate,
    /// Raw `building` tag value
    pub building_tag: String,
    /// Raw `amenity` tag value, when present
    pub amenity: Option<String>,
    /// Tagged name, when present
    pub name: Option<String>,
    /// Local planar position (y unused here)
    pub position: Vec3,
    pub width_m: f32,
    pub depth_m: f32,
    pub height_m: f32,
}

/// How the main school building was identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainSchoolMatch {
    /// A school-like tag or name matched
    Tagged,
    /// Best-effort fallback: largest footprint, no tag evidence
    LargestFootprint,
}

/// One entry in the ordered classification rule list.
struct ClassificationRule {
    keywords: &'static [&'static str],
    category: BuildingType,
}

/// Priority-ordered tag/amenity keyword rules, evaluated top to bottom.
/// School-like keywords outrank everything; generic office and residential
/// fallbacks come last. Anything unmatched defaults to the main-building
/// category.
const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        keywords: &["school", "college", "kindergarten", "university"],
        category: BuildingType::MainBuilding,
    },
    ClassificationRule {
        keywords: &["library"],
        category: BuildingType::Library,
    },
    ClassificationRule {
        keywords: &["gym", "sports_centre", "sports_hall", "sports", "leisure"],
        category: BuildingType::Gym,
    },
    ClassificationRule {
        keywords: &["cafeteria", "canteen", "cafe", "restaurant", "fast_food", "food_court"],
        category: BuildingType::Cafeteria,
    },
    ClassificationRule {
        keywords: &["office", "commercial", "government", "civic"],
        category: BuildingType::Office,
    },
    ClassificationRule {
        keywords: &["residential", "house", "apartments", "terrace", "detached"],
        category: BuildingType::Classroom,
    },
];

impl ImportedBuilding {
    /// Horizontal extent in square meters.
    pub fn footprint_area(&self) -> f32 {
        self.width_m * self.depth_m
    }

    /// Whether the tags or name suggest a school.
    pub fn is_school_like(&self) -> bool {
        let school_keywords = CLASSIFICATION_RULES[0].keywords;
        let matches = |value: &str| {
            let value = value.to_lowercase();
            school_keywords.iter().any(|k| value.contains(k))
        };

        matches(&self.building_tag)
            || self.amenity.as_deref().is_some_and(matches)
            || self.name.as_deref().is_some_and(matches)
    }

    /// Classify against the ordered rule list; amenity is checked before the
    /// building tag within each rule.
    pub fn classify(&self) -> BuildingType {
        let building_tag = self.building_tag.to_lowercase();
        let amenity = self.amenity.as_deref().map(str::to_lowercase);

        for rule in CLASSIFICATION_RULES {
            let hit = rule.keywords.iter().any(|k| {
                amenity.as_deref().is_some_and(|a| a.contains(k)) || building_tag.contains(k)
            });
            if hit {
                return rule.category;
            }
        }

        BuildingType::MainBuilding
    }

    /// Convert to the public entity shape, centered vertically so the box
    /// sits on the ground plane.
    pub fn into_building(self, id: String, is_main_school: bool) -> Building {
        let building_type = self.classify();
        Building {
            id,
            building_type,
            position: Vector3::new(self.position.x, self.height_m / 2.0, self.position.z),
            size: Vector3::new(self.width_m, self.height_m, self.depth_m),
            color: building_type.default_color().to_string(),
            name: self.name,
            amenity: self.amenity,
            is_main_school,
        }
    }
}

/// Import buildings from raw map data, positioned relative to `center`.
///
/// Ways without a `building` tag or with zero resolvable nodes are dropped
/// silently; output is truncated at `options.max_buildings`.
pub fn import_buildings(
    raw: &RawMapData,
    center: Coordinate,
    options: &ImportOptions,
) -> Vec<ImportedBuilding> {
    let node_index: HashMap<i64, Coordinate> =
        raw.nodes.iter().map(|n| (n.id, n.coordinate)).collect();

    let mut buildings = Vec::new();

    for way in &raw.ways {
        if buildings.len() >= options.max_buildings {
            break;
        }

        let Some(building_tag) = way.tags.get("building") else {
            continue;
        };

        let coords: Vec<Coordinate> = way
            .node_refs
            .iter()
            .filter_map(|id| node_index.get(id).copied())
            .collect();
        if coords.is_empty() {
            continue;
        }

        let centroid = Coordinate::new(
            coords.iter().map(|c| c.latitude).sum::<f64>() / coords.len() as f64,
            coords.iter().map(|c| c.longitude).sum::<f64>() / coords.len() as f64,
        );

        let (width_m, depth_m) = estimate_footprint(&coords, centroid);
        let height_m = estimate_height(&way.tags, options);

        let (min_f, max_f) = options.footprint_range_m;
        let (min_h, max_h) = options.height_range_m;

        buildings.push(ImportedBuilding {
            source_id: way.id,
            centroid,
            building_tag: building_tag.clone(),
            amenity: way.tags.get("amenity").cloned(),
            name: way.tags.get("name").cloned(),
            position: localize(centroid, center),
            width_m: width_m.clamp(min_f, max_f),
            depth_m: depth_m.clamp(min_f, max_f),
            height_m: height_m.clamp(min_h, max_h),
        });
    }

    tracing::debug!(
        imported = buildings.len(),
        ways = raw.ways.len(),
        "imported buildings from map data"
    );

    buildings
}

/// Pick the main school among imported buildings.
///
/// Tagged school-like candidates win, ties broken by planar distance from
/// the world origin; with no tag evidence the largest footprint is used as
/// a best-effort substitute, reported distinctly so callers can explain the
/// heuristic.
pub fn find_main_school(buildings: &[ImportedBuilding]) -> Option<(usize, MainSchoolMatch)> {
    let tagged = buildings
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_school_like())
        .min_by(|(_, a), (_, b)| {
            planar_distance_sq(a)
                .partial_cmp(&planar_distance_sq(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some((index, _)) = tagged {
        return Some((index, MainSchoolMatch::Tagged));
    }

    buildings
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            a.footprint_area()
                .partial_cmp(&b.footprint_area())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(index, _)| (index, MainSchoolMatch::LargestFootprint))
}

/// Estimate footprint width/depth in meters from the node bounding box.
///
/// Width is the Haversine span across the longitude extremes at the
/// centroid latitude; depth the span across the latitude extremes at the
/// centroid longitude.
fn estimate_footprint(coords: &[Coordinate], centroid: Coordinate) -> (f32, f32) {
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;

    for c in coords {
        min_lat = min_lat.min(c.latitude);
        max_lat = max_lat.max(c.latitude);
        min_lon = min_lon.min(c.longitude);
        max_lon = max_lon.max(c.longitude);
    }

    let width_km = distance_km(
        Coordinate::new(centroid.latitude, min_lon),
        Coordinate::new(centroid.latitude, max_lon),
    );
    let depth_km = distance_km(
        Coordinate::new(min_lat, centroid.longitude),
        Coordinate::new(max_lat, centroid.longitude),
    );

    ((width_km * 1000.0) as f32, (depth_km * 1000.0) as f32)
}

/// Height from an explicit tag, else tagged level count x meters-per-level.
///
/// Height tags frequently carry a unit suffix ("12 m"); the leading numeric
/// prefix wins, and only an entirely non-numeric tag falls through to the
/// level estimate.
fn estimate_height(tags: &HashMap<String, String>, options: &ImportOptions) -> f32 {
    if let Some(height) = tags.get("height").and_then(|h| parse_leading_f32(h)) {
        return height;
    }

    let levels = tags
        .get("building:levels")
        .and_then(|l| l.trim().parse::<u32>().ok())
        .unwrap_or(options.default_levels);

    levels as f32 * options.meters_per_level
}

/// Convert a geocoded centroid to local planar coordinates.
///
/// x grows eastward (longitude greater than center), z grows southward
/// (latitude greater than center maps to negative z, so north is
/// "forward"). This sign convention matches the scene's asset orientation.
fn localize(centroid: Coordinate, center: Coordinate) -> Vec3 {
    let x_m = distance_km(center, Coordinate::new(center.latitude, centroid.longitude)) * 1000.0;
    let z_m = distance_km(center, Coordinate::new(centroid.latitude, center.longitude)) * 1000.0;

    let x = if centroid.longitude >= center.longitude {
        x_m
    } else {
        -x_m
    };
    let z = if centroid.latitude >= center.latitude {
        -z_m
    } else {
        z_m
    };

    Vec3::new(x as f32, 0.0, z as f32)
}

/// Parse the leading float prefix of a string, ignoring any trailing unit.
fn parse_leading_f32(value: &str) -> Option<f32> {
    let trimmed = value.trim();
    let end = trimmed
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+')))
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    trimmed[..end].parse().ok()
}

fn planar_distance_sq(building: &ImportedBuilding) -> f32 {
    building.position.x * building.position.x + building.position.z * building.position.z
}
