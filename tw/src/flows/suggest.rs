//! Goal suggestion flow
//!
//! Takes no input and returns five single-sentence goal suggestions.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FLOW_MAX_TOKENS, FlowError, GenerationClient, parse_submission};
use crate::llm::{CompletionRequest, Message, ToolDefinition};

/// Output schema for the suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestGoalsOutput {
    pub suggestions: Vec<String>,
}

fn submit_tool() -> ToolDefinition {
    ToolDefinition::new(
        "submit_suggestions",
        "Submit the suggested goals. Call this once with all five suggestions.",
        serde_json::json!({
            "type": "object",
            "properties": {
                "suggestions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "A list of 5 suggested goals, each as a single sentence"
                }
            },
            "required": ["suggestions"]
        }),
    )
}

fn validate(output: &SuggestGoalsOutput) -> Result<(), FlowError> {
    if output.suggestions.iter().any(|s| s.trim().is_empty()) {
        return Err(FlowError::InvalidOutput(
            "suggestions submission contains an empty entry".to_string(),
        ));
    }
    Ok(())
}

impl GenerationClient {
    /// Suggest five creative, achievable goals
    pub async fn suggest_goals(&self) -> Result<Vec<String>, FlowError> {
        let system_prompt = self
            .loader()
            .render("suggest", &serde_json::json!({}))
            .map_err(|e| FlowError::Template(e.to_string()))?;

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user("Suggest five goals for me.")],
            tools: vec![submit_tool()],
            max_tokens: FLOW_MAX_TOKENS,
        };

        let response = self.llm().complete(request).await?;
        let output: SuggestGoalsOutput = parse_submission(&response, "submit_suggestions")?;
        validate(&output)?;

        info!(count = output.suggestions.len(), "Generated goal suggestions");
        Ok(output.suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::tool_response;
    use crate::llm::client::mock::MockLlmClient;
    use crate::prompts::PromptLoader;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_suggest_goals() {
        let client = GenerationClient::new(
            Arc::new(MockLlmClient::new(vec![tool_response(
                "submit_suggestions",
                serde_json::json!({"suggestions": [
                    "Run a 5k in under 30 minutes.",
                    "Read one book per month.",
                    "Learn to cook five new dishes.",
                    "Save 10% of each paycheck.",
                    "Keep a daily journal for 60 days."
                ]}),
            )])),
            PromptLoader::embedded_only(),
        );

        let suggestions = client.suggest_goals().await.unwrap();
        assert_eq!(suggestions.len(), 5);
        assert!(suggestions[0].contains("5k"));
    }

    #[tokio::test]
    async fn test_suggest_goals_rejects_empty_entry() {
        let client = GenerationClient::new(
            Arc::new(MockLlmClient::new(vec![tool_response(
                "submit_suggestions",
                serde_json::json!({"suggestions": ["Run a 5k.", " "]}),
            )])),
            PromptLoader::embedded_only(),
        );

        let result = client.suggest_goals().await;
        assert!(matches!(result, Err(FlowError::InvalidOutput(_))));
    }
}
