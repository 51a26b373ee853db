//! Saved plans
//!
//! A plan is a snapshot of a goal and its subtasks at save time. Identity
//! is immutable once created; the subtasks inside remain mutable through
//! the planner's id-matched operations.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExtendedSubtask;

/// A saved snapshot of a goal plus its subtasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGoal {
    pub id: String,
    pub main_goal: String,
    pub subtasks: Vec<ExtendedSubtask>,
    /// Formatted local timestamp string, set at save time
    pub saved_at: String,
}

impl SavedGoal {
    /// Snapshot the given goal and subtasks into a new plan
    pub fn new(main_goal: impl Into<String>, subtasks: Vec<ExtendedSubtask>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            main_goal: main_goal.into(),
            subtasks,
            saved_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Subtask;

    #[test]
    fn test_new_snapshots_subtasks() {
        let subtasks = vec![
            ExtendedSubtask::from_generated(Subtask {
                task: "Choose destination".to_string(),
                estimated_time: "2 hours".to_string(),
            }),
            ExtendedSubtask::from_generated(Subtask {
                task: "Book flights".to_string(),
                estimated_time: "1 hour".to_string(),
            }),
        ];

        let plan = SavedGoal::new("Plan a trip", subtasks.clone());
        assert_eq!(plan.main_goal, "Plan a trip");
        assert_eq!(plan.subtasks, subtasks);
        assert!(!plan.id.is_empty());
        assert!(!plan.saved_at.is_empty());
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let plan = SavedGoal::new("Learn Rust", vec![]);
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json.get("mainGoal").is_some());
        assert!(json.get("savedAt").is_some());
    }
}
