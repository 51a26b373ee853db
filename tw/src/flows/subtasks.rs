//! Goal decomposition flow
//!
//! Breaks a goal into subtasks with estimated time allocations.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FLOW_MAX_TOKENS, FlowError, GenerationClient, parse_submission};
use crate::domain::Subtask;
use crate::llm::{CompletionRequest, Message, ToolDefinition};

/// Template context for the subtasks prompt
#[derive(Debug, Clone, Serialize)]
struct SubtasksContext<'a> {
    goal: &'a str,
}

/// Output schema for the decomposition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSubtasksOutput {
    pub subtasks: Vec<Subtask>,
}

/// Tool the model calls to submit its decomposition
fn submit_tool() -> ToolDefinition {
    ToolDefinition::new(
        "submit_subtasks",
        "Submit the generated subtasks. Call this once with the full list.",
        subtasks_schema(),
    )
}

/// JSON schema for a subtask list submission
fn subtasks_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "subtasks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "task": {
                            "type": "string",
                            "description": "A subtask required to achieve the goal"
                        },
                        "estimatedTime": {
                            "type": "string",
                            "description": "Estimated time allocation for the subtask (e.g., 1 hour, 30 minutes)"
                        }
                    },
                    "required": ["task", "estimatedTime"]
                },
                "description": "A list of subtasks with estimated time allocations"
            }
        },
        "required": ["subtasks"]
    })
}

/// Reject submissions with empty fields - the whole response fails, it is
/// never partially accepted
fn validate(output: &GenerateSubtasksOutput) -> Result<(), FlowError> {
    for subtask in &output.subtasks {
        if subtask.task.trim().is_empty() || subtask.estimated_time.trim().is_empty() {
            return Err(FlowError::InvalidOutput(
                "subtask submission contains an empty task or estimated time".to_string(),
            ));
        }
    }
    Ok(())
}

impl GenerationClient {
    /// Decompose a goal into subtasks with time estimates
    ///
    /// The returned list may be empty; the caller decides how to surface
    /// that (the planner records it as a user-visible warning).
    pub async fn generate_subtasks(&self, goal: &str) -> Result<Vec<Subtask>, FlowError> {
        let system_prompt = self
            .loader()
            .render("subtasks", &SubtasksContext { goal })
            .map_err(|e| FlowError::Template(e.to_string()))?;

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(format!("Break down this goal: {}", goal))],
            tools: vec![submit_tool()],
            max_tokens: FLOW_MAX_TOKENS,
        };

        let response = self.llm().complete(request).await?;
        let output: GenerateSubtasksOutput = parse_submission(&response, "submit_subtasks")?;
        validate(&output)?;

        info!(goal_len = goal.len(), count = output.subtasks.len(), "Generated subtasks");
        Ok(output.subtasks)
    }
}
