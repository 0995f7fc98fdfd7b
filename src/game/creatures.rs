//! Creature stat generation and battle damage resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::world::Vector3;

/// Department a creature belongs to; drives base stats and abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureType {
    Hr,
    Finance,
    Estates,
    Gdpr,
    Compliance,
    Teaching,
    Send,
}

/// Level-1 stats for a creature type.
#[derive(Debug, Clone, Copy)]
pub struct BaseStats {
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub abilities: &'static [&'static str],
}

impl CreatureType {
    /// Base stats scaled linearly by level during generation.
    pub fn base_stats(&self) -> BaseStats {
        match self {
            Self::Hr => BaseStats {
                health: 100,
                attack: 15,
                defense: 10,
                abilities: &["interview", "policy-check"],
            },
            Self::Finance => BaseStats {
                health: 80,
                attack: 20,
                defense: 8,
                abilities: &["audit", "budget-cut"],
            },
            Self::Estates => BaseStats {
                health: 120,
                attack: 18,
                defense: 15,
                abilities: &["maintenance", "security"],
            },
            Self::Gdpr => BaseStats {
                health: 90,
                attack: 25,
                defense: 12,
                abilities: &["data-breach", "compliance"],
            },
            Self::Compliance => BaseStats {
                health: 95,
                attack: 16,
                defense: 14,
                abilities: &["inspection", "regulation"],
            },
            Self::Teaching => BaseStats {
                health: 85,
                attack: 22,
                defense: 10,
                abilities: &["lesson-plan", "detention"],
            },
            Self::Send => BaseStats {
                health: 110,
                attack: 14,
                defense: 16,
                abilities: &["support", "adaptation"],
            },
        }
    }

    /// Display name used when spawning creatures.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hr => "HR Guardian",
            Self::Finance => "Budget Beast",
            Self::Estates => "Facilities Phantom",
            Self::Gdpr => "Data Demon",
            Self::Compliance => "Compliance Creature",
            Self::Teaching => "Teaching Terror",
            Self::Send => "SEND Sentinel",
        }
    }
}

/// A game creature, spawned either into a world or for a battle.
///
/// Invariant: `health <= max_health`. Health only ever moves through
/// [`apply_damage`], which saturates at 0; a creature at 0 health is
/// defeated and terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub creature_type: CreatureType,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    /// Ability identifiers usable in battle
    pub abilities: Vec<String>,
    /// Scene position when spawned into a world
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3>,
}

/// Stateless creature operations.
pub struct CreatureSystem;

impl CreatureSystem {
    /// Generate a creature of the given type, stats scaled by level.
    pub fn generate(creature_type: CreatureType, level: u32, id: Option<String>) -> Creature {
        let base = creature_type.base_stats();

        Creature {
            id: id.unwrap_or_else(|| format!("creature-{}", Uuid::new_v4())),
            name: creature_type.display_name().to_string(),
            creature_type,
            level,
            health: base.health * level,
            max_health: base.health * level,
            attack: base.attack * level,
            defense: base.defense * level,
            abilities: base.abilities.iter().map(|a| a.to_string()).collect(),
            position: None,
        }
    }

    /// Resolve battle damage from attacker to defender.
    ///
    /// `max(1, floor((attack - defense / 2) * abilityMultiplier * randomFactor))`
    /// with the random factor uniform in [0.8, 1.2). Always at least 1 so
    /// battles cannot stalemate.
    pub fn calculate_damage(attacker: &Creature, defender: &Creature, use_ability: bool) -> u32 {
        let random_factor = rand::thread_rng().gen_range(0.8..1.2);
        Self::damage_roll(attacker.attack, defender.defense, use_ability, random_factor)
    }

    /// Damage formula with an explicit random factor (exposed for testing).
    pub fn damage_roll(attack: u32, defense: u32, use_ability: bool, random_factor: f64) -> u32 {
        let base = attack as f64 - defense as f64 / 2.0;
        let ability_multiplier = if use_ability { 1.5 } else { 1.0 };
        let damage = (base * ability_multiplier * random_factor).floor();
        damage.max(1.0) as u32
    }

    /// Apply damage, saturating health at 0.
    pub fn apply_damage(creature: &Creature, damage: u32) -> Creature {
        Creature {
            health: creature.health.saturating_sub(damage),
            ..creature.clone()
        }
    }

    /// A creature at 0 health is defeated.
    pub fn is_defeated(creature: &Creature) -> bool {
        creature.health == 0
    }
}
