//! End-to-end world generation tests with stubbed upstream collaborators.

use std::collections::HashMap;

use schoolquest::game::creatures::CreatureType;
use schoolquest::geo::Coordinate;
use schoolquest::integrations::{
    BuildingSource, FetchError, LookupError, PostcodeData, PostcodeLookup,
};
use schoolquest::world::assembler::{into_response, GenerateError, WorldAssembler, WorldPolicy};
use schoolquest::world::import::{ImportOptions, MainSchoolMatch, RawMapData, RawNode, RawWay};
use schoolquest::world::procedural;

const CENTER: Coordinate = Coordinate {
    latitude: 53.8564,
    longitude: -1.6907,
};

fn leeds() -> PostcodeData {
    PostcodeData {
        postcode: "LS19 7XB".to_string(),
        latitude: CENTER.latitude,
        longitude: CENTER.longitude,
        region: "Yorkshire and The Humber".to_string(),
        district: "Leeds".to_string(),
        ward: None,
    }
}

struct StubPostcodes(Option<PostcodeData>);

impl PostcodeLookup for StubPostcodes {
    async fn lookup(&self, _postcode: &str) -> Result<PostcodeData, LookupError> {
        self.0.clone().ok_or(LookupError::NotFound)
    }
}

enum MapFixture {
    Fail,
    Empty,
    Data(RawMapData),
}

struct StubBuildings(MapFixture);

impl BuildingSource for StubBuildings {
    async fn fetch_buildings(
        &self,
        _center: Coordinate,
        _radius_m: u32,
    ) -> Result<RawMapData, FetchError> {
        match &self.0 {
            MapFixture::Fail => Err(FetchError("connection refused".to_string())),
            MapFixture::Empty => Ok(RawMapData::default()),
            MapFixture::Data(data) => Ok(data.clone()),
        }
    }
}

/// Append a small square building footprint offset from the fixture center.
fn push_square(
    data: &mut RawMapData,
    base_id: i64,
    lat_offset: f64,
    lon_offset: f64,
    tags: &[(&str, &str)],
) {
    let lat = CENTER.latitude + lat_offset;
    let lon = CENTER.longitude + lon_offset;
    let d_lat = 0.0001;
    let d_lon = 0.00015;

    let corners = [
        (lat - d_lat, lon - d_lon),
        (lat - d_lat, lon + d_lon),
        (lat + d_lat, lon + d_lon),
        (lat + d_lat, lon - d_lon),
    ];
    let mut refs = Vec::new();
    for (i, (c_lat, c_lon)) in corners.iter().enumerate() {
        let id = base_id + i as i64;
        data.nodes.push(RawNode {
            id,
            coordinate: Coordinate::new(*c_lat, *c_lon),
        });
        refs.push(id);
    }

    data.ways.push(RawWay {
        id: base_id + 100,
        node_refs: refs,
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    });
}

#[tokio::test]
async fn empty_postcode_is_invalid_input() {
    let assembler = WorldAssembler::new(StubPostcodes(Some(leeds())), StubBuildings(MapFixture::Empty));

    let err = assembler.generate("   ").await.unwrap_err();
    assert!(matches!(err, GenerateError::InvalidInput(_)));

    let (status, response) = into_response(Err(err));
    assert_eq!(status, 400);
    assert!(!response.success);
}

#[tokio::test]
async fn unknown_postcode_is_not_found() {
    let assembler = WorldAssembler::new(StubPostcodes(None), StubBuildings(MapFixture::Empty));

    let err = assembler.generate("ZZ99 9ZZ").await.unwrap_err();
    assert!(matches!(err, GenerateError::NotFound(_)));
    assert_eq!(err.to_string(), "Postcode not found");
    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn map_fetch_failure_falls_back_to_procedural_world() {
    let assembler = WorldAssembler::new(StubPostcodes(Some(leeds())), StubBuildings(MapFixture::Fail));

    let generated = assembler.generate("LS19 7XB").await.unwrap();
    let world = &generated.data.world_data;
    let layout = generated.data.layout;

    assert_eq!(world.buildings.len(), layout.building_count as usize);
    assert_eq!(world.creatures.len(), layout.creature_count as usize);
    assert!(generated.data.main_school_match.is_none());
    assert!(generated.message.contains("procedural layout"));

    // Synthetic worlds anchor the main building at the origin
    let main = world.buildings.iter().find(|b| b.is_main_school).unwrap();
    assert_eq!(main.position.x, 0.0);
    assert_eq!(main.position.z, 0.0);
    assert_eq!(main.color, "#C8B4A0");
}

#[tokio::test]
async fn empty_map_data_falls_back_to_procedural_world() {
    let assembler = WorldAssembler::new(StubPostcodes(Some(leeds())), StubBuildings(MapFixture::Empty));

    let generated = assembler.generate("LS19 7XB").await.unwrap();
    assert!(generated.data.main_school_match.is_none());
    assert!(!generated.data.world_data.buildings.is_empty());
    assert!(generated.message.contains("procedural layout"));
}

#[tokio::test]
async fn real_buildings_produce_tagged_main_school() {
    let mut data = RawMapData::default();
    push_square(
        &mut data,
        1000,
        0.0,
        0.0,
        &[("building", "school"), ("name", "Oak Lane Primary")],
    );
    push_square(&mut data, 2000, 0.001, 0.001, &[("building", "residential")]);

    let assembler = WorldAssembler::new(
        StubPostcodes(Some(leeds())),
        StubBuildings(MapFixture::Data(data)),
    );

    let generated = assembler.generate("LS19 7XB").await.unwrap();
    let world = &generated.data.world_data;

    assert_eq!(generated.data.main_school_match, Some(MainSchoolMatch::Tagged));
    assert_eq!(world.buildings.len(), 2);
    assert_eq!(world.buildings[0].id, "building-0");
    assert_eq!(world.buildings[1].id, "building-1");

    let mains: Vec<_> = world.buildings.iter().filter(|b| b.is_main_school).collect();
    assert_eq!(mains.len(), 1);
    assert_eq!(mains[0].name.as_deref(), Some("Oak Lane Primary"));

    // One creature per every other building, typed after its parent
    assert_eq!(world.creatures.len(), 1);
    assert_eq!(world.creatures[0].creature_type, CreatureType::Hr);
    assert!(world.creatures[0].position.is_some());
    assert!(generated.message.contains("2 real buildings"));
}

#[tokio::test]
async fn untagged_buildings_use_largest_footprint_heuristic() {
    let mut data = RawMapData::default();
    push_square(&mut data, 1000, 0.0, 0.0, &[("building", "residential")]);
    push_square(&mut data, 2000, 0.002, 0.002, &[("building", "yes")]);

    let assembler = WorldAssembler::new(
        StubPostcodes(Some(leeds())),
        StubBuildings(MapFixture::Data(data)),
    );

    let generated = assembler.generate("LS19 7XB").await.unwrap();
    assert_eq!(
        generated.data.main_school_match,
        Some(MainSchoolMatch::LargestFootprint)
    );
    assert!(generated.message.contains("largest footprint"));

    let mains = generated
        .data
        .world_data
        .buildings
        .iter()
        .filter(|b| b.is_main_school)
        .count();
    assert_eq!(mains, 1);
}

#[tokio::test]
async fn creature_count_tracks_building_count() {
    let mut data = RawMapData::default();
    for i in 0..8 {
        let tags: &[(&str, &str)] = if i == 0 {
            &[("building", "school")]
        } else {
            &[("building", "yes")]
        };
        push_square(&mut data, 1000 * (i + 1), 0.0005 * i as f64, 0.0005 * i as f64, tags);
    }

    let assembler = WorldAssembler::new(
        StubPostcodes(Some(leeds())),
        StubBuildings(MapFixture::Data(data)),
    );

    let generated = assembler.generate("LS19 7XB").await.unwrap();
    let world = &generated.data.world_data;

    assert_eq!(world.buildings.len(), 8);
    assert_eq!(world.creatures.len(), 4);
    for (i, creature) in world.creatures.iter().enumerate() {
        assert_eq!(creature.id, format!("creature-{i}"));
        assert_eq!(creature.level, 1);
    }
}

#[tokio::test]
async fn creature_count_stops_at_policy_cap() {
    // 60 imported buildings would spawn 30 creatures without the cap
    let mut data = RawMapData::default();
    for i in 0..60i64 {
        push_square(&mut data, 1000 * (i + 1), 0.0004 * i as f64, 0.0004 * i as f64, &[("building", "yes")]);
    }

    let policy = WorldPolicy {
        import: ImportOptions {
            max_buildings: 100,
            ..Default::default()
        },
        ..Default::default()
    };
    let assembler = WorldAssembler::with_policy(
        StubPostcodes(Some(leeds())),
        StubBuildings(MapFixture::Data(data)),
        policy,
    );

    let generated = assembler.generate("LS19 7XB").await.unwrap();
    let world = &generated.data.world_data;

    assert_eq!(world.buildings.len(), 60);
    assert_eq!(world.creatures.len(), 25);
    assert_eq!(world.creatures.last().unwrap().id, "creature-24");
}

#[tokio::test]
async fn procedural_fallback_is_deterministic() {
    let assembler = WorldAssembler::new(StubPostcodes(Some(leeds())), StubBuildings(MapFixture::Fail));

    let first = assembler.generate("LS19 7XB").await.unwrap();
    let second = assembler.generate("LS19 7XB").await.unwrap();

    assert_eq!(first.data.layout, second.data.layout);
    assert_eq!(
        serde_json::to_value(&first.data.world_data.buildings).unwrap(),
        serde_json::to_value(&second.data.world_data.buildings).unwrap(),
    );
    assert_eq!(
        serde_json::to_value(&first.data.world_data.creatures).unwrap(),
        serde_json::to_value(&second.data.world_data.creatures).unwrap(),
    );

    // World ids are fresh per request even when content repeats
    assert_ne!(first.data.world_data.id, second.data.world_data.id);
}

#[tokio::test]
async fn fallback_layout_matches_direct_procedural_output() {
    let assembler = WorldAssembler::new(StubPostcodes(Some(leeds())), StubBuildings(MapFixture::Fail));

    let generated = assembler.generate("LS19 7XB").await.unwrap();
    let layout = procedural::generate_layout("LS19 7XB");

    assert_eq!(generated.data.layout, layout);
    assert_eq!(
        serde_json::to_value(&generated.data.world_data.buildings).unwrap(),
        serde_json::to_value(procedural::generate_buildings("LS19 7XB", &layout)).unwrap(),
    );
}

#[tokio::test]
async fn response_envelope_matches_wire_contract() {
    let assembler = WorldAssembler::new(StubPostcodes(Some(leeds())), StubBuildings(MapFixture::Empty));

    let result = assembler.generate("LS19 7XB").await;
    let (status, response) = into_response(result);

    assert_eq!(status, 200);
    assert!(response.success);
    let message = response.message.clone().unwrap();
    assert!(message.starts_with("Generated world for LS19 7XB (Yorkshire and The Humber)"));

    let value = serde_json::to_value(&response).unwrap();
    let data = &value["data"];
    assert_eq!(data["worldData"]["schoolId"], "school-LS19 7XB");
    assert_eq!(data["worldData"]["postcode"], "LS19 7XB");
    assert_eq!(data["postcodeData"]["district"], "Leeds");
    assert!(data["layout"]["buildingCount"].is_u64());
    assert!(data["worldData"]["terrain"]["size"]["x"].is_number());
    assert!(data.get("mainSchoolMatch").is_none());
    assert!(value.get("error").is_none());
}
