//! SchoolQuest - Postcode-Seeded School World Generator
//!
//! Turns any UK postcode into a deterministic 3D school world: real building
//! footprints from OpenStreetMap when available, a seeded procedural campus
//! otherwise. Ships the RPG progression systems (XP, quests, creature combat)
//! that worlds are populated with.

pub mod config;
pub mod game;
pub mod geo;
pub mod integrations;
pub mod world;

// Re-export commonly used types
pub use game::creatures::CreatureSystem;
pub use game::quests::QuestSystem;
pub use game::xp::XpSystem;
pub use integrations::{OverpassClient, PostcodeClient};
pub use world::assembler::WorldAssembler;
