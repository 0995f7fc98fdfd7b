//! Quest objectives, status tracking, and completion rewards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::xp::{PlayerProgress, XpSystem};

/// Subject area a quest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Maths,
    Spelling,
    Reading,
    LocalKnowledge,
    Exploration,
    Collection,
}

/// Quest difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestDifficulty {
    Easy,
    Medium,
    Hard,
}

/// Derived quest state.
///
/// `Completed` iff every objective is complete; never set independently of
/// objective state apart from the initial `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Kind of action an objective tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    VisitLocation,
    AnswerQuestion,
    CollectItem,
    DefeatCreature,
}

/// A single quest objective.
///
/// With a numeric `target`, completion is `current >= target`; without one,
/// any progress update completes it outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestObjective {
    pub id: String,
    pub description: String,
    pub completed: bool,
    #[serde(rename = "type")]
    pub objective_type: ObjectiveType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<u32>,
}

/// A quest offered to players at or above its required level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub difficulty: QuestDifficulty,
    pub xp_reward: u64,
    pub required_level: u32,
    pub objectives: Vec<QuestObjective>,
    pub status: QuestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quest precondition violations. These indicate caller bugs and are never
/// swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestError {
    #[error("Quest objectives not completed")]
    ObjectivesIncomplete,
}

/// Result of completing a quest.
#[derive(Debug, Clone)]
pub struct QuestCompletion {
    /// Progress with the reward applied and the quest recorded
    pub progress: PlayerProgress,
    /// XP awarded
    pub xp_gained: u64,
    /// Whether the reward triggered a level-up
    pub leveled_up: bool,
    /// The new level, when one was reached
    pub new_level: Option<u32>,
}

/// Stateless quest operations.
pub struct QuestSystem;

impl QuestSystem {
    /// A quest is offered only at or above its required level.
    pub fn is_available(quest: &Quest, player_level: u32) -> bool {
        player_level >= quest.required_level
    }

    /// All objectives complete?
    pub fn is_complete(quest: &Quest) -> bool {
        quest.objectives.iter().all(|obj| obj.completed)
    }

    /// Add progress to one objective and recompute quest status.
    ///
    /// Returns a new quest value; objectives other than `objective_id` are
    /// untouched. Status becomes `Completed` iff every objective is
    /// complete, else `InProgress`.
    pub fn update_objective(quest: &Quest, objective_id: &str, progress: u32) -> Quest {
        let objectives: Vec<QuestObjective> = quest
            .objectives
            .iter()
            .map(|obj| {
                if obj.id != objective_id {
                    return obj.clone();
                }

                let current = obj.current.unwrap_or(0) + progress;
                let completed = match obj.target {
                    Some(target) => current >= target,
                    None => true,
                };

                QuestObjective {
                    current: Some(current),
                    completed,
                    ..obj.clone()
                }
            })
            .collect();

        let status = if objectives.iter().all(|obj| obj.completed) {
            QuestStatus::Completed
        } else {
            QuestStatus::InProgress
        };

        Quest {
            objectives,
            status,
            updated_at: Utc::now(),
            ..quest.clone()
        }
    }

    /// Complete a quest: award its XP and record it on the player.
    ///
    /// Fails with [`QuestError::ObjectivesIncomplete`] while any objective
    /// remains open; the player's progress is left untouched in that case.
    pub fn complete_quest(
        quest: &Quest,
        progress: &PlayerProgress,
    ) -> Result<QuestCompletion, QuestError> {
        if !Self::is_complete(quest) {
            return Err(QuestError::ObjectivesIncomplete);
        }

        let gain = XpSystem::add_xp(progress, quest.xp_reward);
        let mut updated = gain.progress;
        updated.completed_quests.push(quest.id.clone());

        Ok(QuestCompletion {
            progress: updated,
            xp_gained: quest.xp_reward,
            leveled_up: gain.leveled_up,
            new_level: gain.new_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objective(id: &str, target: Option<u32>) -> QuestObjective {
        QuestObjective {
            id: id.to_string(),
            description: format!("objective {id}"),
            completed: false,
            objective_type: ObjectiveType::AnswerQuestion,
            target,
            current: None,
        }
    }

    fn quest(objectives: Vec<QuestObjective>) -> Quest {
        let now = Utc::now();
        Quest {
            id: "quest-1".to_string(),
            title: "Times Tables Trial".to_string(),
            description: "Answer the maths questions".to_string(),
            quest_type: QuestType::Maths,
            difficulty: QuestDifficulty::Easy,
            xp_reward: 50,
            required_level: 1,
            objectives,
            status: QuestStatus::NotStarted,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_availability_by_level() {
        let mut q = quest(vec![objective("a", None)]);
        q.required_level = 3;
        assert!(!QuestSystem::is_available(&q, 2));
        assert!(QuestSystem::is_available(&q, 3));
        assert!(QuestSystem::is_available(&q, 10));
    }

    #[test]
    fn test_update_objective_counts_toward_target() {
        let q = quest(vec![objective("a", Some(3))]);

        let q = QuestSystem::update_objective(&q, "a", 2);
        assert_eq!(q.objectives[0].current, Some(2));
        assert!(!q.objectives[0].completed);
        assert_eq!(q.status, QuestStatus::InProgress);

        let q = QuestSystem::update_objective(&q, "a", 1);
        assert!(q.objectives[0].completed);
        assert_eq!(q.status, QuestStatus::Completed);
    }

    #[test]
    fn test_update_objective_without_target_completes() {
        let q = quest(vec![objective("a", None)]);
        let q = QuestSystem::update_objective(&q, "a", 1);
        assert!(q.objectives[0].completed);
        assert_eq!(q.status, QuestStatus::Completed);
    }

    #[test]
    fn test_update_leaves_other_objectives_alone() {
        let q = quest(vec![objective("a", Some(1)), objective("b", Some(2))]);
        let q = QuestSystem::update_objective(&q, "a", 1);
        assert!(q.objectives[0].completed);
        assert!(!q.objectives[1].completed);
        assert_eq!(q.status, QuestStatus::InProgress);
    }

    #[test]
    fn test_status_invariant_after_updates() {
        let mut q = quest(vec![objective("a", Some(2)), objective("b", None)]);
        for (id, amount) in [("a", 1), ("b", 1), ("a", 1)] {
            q = QuestSystem::update_objective(&q, id, amount);
            let all_done = q.objectives.iter().all(|o| o.completed);
            assert_eq!(q.status == QuestStatus::Completed, all_done);
        }
        assert_eq!(q.status, QuestStatus::Completed);
    }

    #[test]
    fn test_complete_quest_requires_all_objectives() {
        let q = quest(vec![objective("a", Some(1))]);
        let progress = PlayerProgress::new("user-1");

        let err = QuestSystem::complete_quest(&q, &progress).unwrap_err();
        assert_eq!(err, QuestError::ObjectivesIncomplete);
        // Caller's progress value is untouched by the failed call
        assert_eq!(progress.xp, 0);
        assert!(progress.completed_quests.is_empty());
    }

    #[test]
    fn test_complete_quest_awards_xp_and_records() {
        let q = QuestSystem::update_objective(&quest(vec![objective("a", Some(1))]), "a", 1);
        let progress = PlayerProgress::new("user-1");

        let done = QuestSystem::complete_quest(&q, &progress).unwrap();
        assert_eq!(done.xp_gained, 50);
        assert!(!done.leveled_up);
        assert_eq!(done.progress.xp, 50);
        assert_eq!(done.progress.completed_quests, vec!["quest-1".to_string()]);
    }

    #[test]
    fn test_complete_quest_reports_level_up() {
        let mut q = QuestSystem::update_objective(&quest(vec![objective("a", None)]), "a", 1);
        q.xp_reward = 120;
        let progress = PlayerProgress::new("user-1");

        let done = QuestSystem::complete_quest(&q, &progress).unwrap();
        assert!(done.leveled_up);
        assert_eq!(done.new_level, Some(2));
        assert_eq!(done.progress.xp, 20);
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&QuestStatus::NotStarted).unwrap(),
            "\"not_started\""
        );
        assert_eq!(
            serde_json::to_string(&QuestType::LocalKnowledge).unwrap(),
            "\"local_knowledge\""
        );
    }
}
