//! Game Progression Module
//!
//! Domain logic independent of world generation: the experience curve and
//! leveling, quest objective tracking and completion, and creature stat
//! generation with battle damage resolution. All operations are
//! value-in/value-out; nothing here touches shared mutable state.

pub mod creatures;
pub mod quests;
pub mod xp;

pub use creatures::{Creature, CreatureType};
pub use quests::{Quest, QuestError, QuestObjective, QuestStatus};
pub use xp::PlayerProgress;
