//! Subtask-to-steps flow
//!
//! Breaks one subtask title into smaller actionable steps. Invoked fresh
//! on every request - results are never cached across subtasks.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FLOW_MAX_TOKENS, FlowError, GenerationClient, parse_submission};
use crate::llm::{CompletionRequest, Message, ToolDefinition};

/// Template context for the steps prompt
#[derive(Debug, Clone, Serialize)]
struct StepsContext<'a> {
    task_title: &'a str,
}

/// Output schema for the breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateStepsOutput {
    pub steps: Vec<String>,
}

fn submit_tool() -> ToolDefinition {
    ToolDefinition::new(
        "submit_steps",
        "Submit the steps for the subtask. Call this once with the full ordered list.",
        serde_json::json!({
            "type": "object",
            "properties": {
                "steps": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "A list of actionable steps to complete the subtask"
                }
            },
            "required": ["steps"]
        }),
    )
}

fn validate(output: &GenerateStepsOutput) -> Result<(), FlowError> {
    if output.steps.iter().any(|s| s.trim().is_empty()) {
        return Err(FlowError::InvalidOutput(
            "steps submission contains an empty step".to_string(),
        ));
    }
    Ok(())
}

impl GenerationClient {
    /// Break a subtask title into ordered actionable steps
    pub async fn generate_steps(&self, task_title: &str) -> Result<Vec<String>, FlowError> {
        let system_prompt = self
            .loader()
            .render("steps", &StepsContext { task_title })
            .map_err(|e| FlowError::Template(e.to_string()))?;

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(format!("Break down this subtask: {}", task_title))],
            tools: vec![submit_tool()],
            max_tokens: FLOW_MAX_TOKENS,
        };

        let response = self.llm().complete(request).await?;
        let output: GenerateStepsOutput = parse_submission(&response, "submit_steps")?;
        validate(&output)?;

        info!(count = output.steps.len(), "Generated steps");
        Ok(output.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{text_response, tool_response};
    use crate::llm::client::mock::MockLlmClient;
    use crate::prompts::PromptLoader;
    use std::sync::Arc;

    fn client_with(responses: Vec<crate::llm::CompletionResponse>) -> GenerationClient {
        GenerationClient::new(Arc::new(MockLlmClient::new(responses)), PromptLoader::embedded_only())
    }

    #[tokio::test]
    async fn test_generate_steps_from_tool_call() {
        let client = client_with(vec![tool_response(
            "submit_steps",
            serde_json::json!({"steps": ["Compare airlines", "Pick dates", "Pay"]}),
        )]);

        let steps = client.generate_steps("Book flights").await.unwrap();
        assert_eq!(steps, vec!["Compare airlines", "Pick dates", "Pay"]);
    }

    #[tokio::test]
    async fn test_generate_steps_empty_list_is_valid() {
        let client = client_with(vec![tool_response("submit_steps", serde_json::json!({"steps": []}))]);

        let steps = client.generate_steps("Book flights").await.unwrap();
        assert!(steps.is_empty());
    }

    #[tokio::test]
    async fn test_generate_steps_rejects_empty_step() {
        let client = client_with(vec![tool_response(
            "submit_steps",
            serde_json::json!({"steps": ["Compare airlines", ""]}),
        )]);

        let result = client.generate_steps("Book flights").await;
        assert!(matches!(result, Err(FlowError::InvalidOutput(_))));
    }

    #[tokio::test]
    async fn test_generate_steps_rejects_prose() {
        let client = client_with(vec![text_response("First you should compare airlines.")]);

        let result = client.generate_steps("Book flights").await;
        assert!(matches!(result, Err(FlowError::InvalidOutput(_))));
    }
}
