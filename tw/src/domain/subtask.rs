//! Subtask types
//!
//! `Subtask` is what the generation flow produces; `ExtendedSubtask` is
//! the planner's working record, carrying identity and tracking state.
//! Persisted shapes use camelCase so stored documents match the original
//! TaskWise local-storage format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One actionable unit produced by decomposing a goal
///
/// `estimated_time` is an unstructured human-readable string ("1 hour",
/// "30 minutes") - no duration parsing is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub task: String,
    pub estimated_time: String,
}

/// A subtask held by the planner: generation output plus identity,
/// completion state, and an optional deadline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedSubtask {
    /// Generated at creation, immutable afterwards
    pub id: String,
    pub task: String,
    pub estimated_time: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

impl ExtendedSubtask {
    /// Extend a generated subtask with a fresh id and tracking state
    pub fn from_generated(subtask: Subtask) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            task: subtask.task,
            estimated_time: subtask.estimated_time,
            done: false,
            deadline: None,
        }
    }
}
