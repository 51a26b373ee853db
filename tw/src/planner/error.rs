//! Planner error types
//!
//! Display strings double as the user-facing messages the CLI prints;
//! none of these are fatal to the application.

use thiserror::Error;

use crate::flows::FlowError;
use planstore::StoreError;

/// Errors from planner operations
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Please enter a goal.")]
    EmptyGoal,

    #[error("Please enter a title.")]
    EmptyTitle,

    #[error("No active goal or subtasks to save.")]
    NothingToSave,

    #[error("Subtask not found.")]
    SubtaskNotFound,

    #[error("Plan not found.")]
    PlanNotFound,

    #[error("Goal not found.")]
    GoalNotFound,

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
