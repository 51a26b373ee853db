//! Conversational assistant flow
//!
//! Holds role-tagged history for the session and exposes the subtask
//! decomposition capability to the model as a callable tool.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{FLOW_MAX_TOKENS, FlowError, GenerationClient};
use crate::llm::{CompletionRequest, ContentBlock, Message, StopReason, ToolDefinition};

/// Name the assistant sees for the subtask capability
const SUBTASKS_TOOL: &str = "generate_subtasks";

/// Fallback when the model ends a turn without text after using a tool
const TOOL_NO_TEXT_FALLBACK: &str =
    "I've processed your request using a tool, but I'm having trouble summarizing the result. Could you try rephrasing?";

/// Fallback when the model produces no text at all
const NO_TEXT_FALLBACK: &str =
    "I'm sorry, I encountered an issue processing your request. Please try rephrasing or try again later.";

/// Goal argument the model passes to the subtask tool
#[derive(Debug, Deserialize)]
struct SubtasksToolInput {
    goal: String,
}

/// An interactive assistant conversation
///
/// History lives in the session and is replayed on every request; the
/// provider holds no state between calls.
pub struct ChatSession {
    client: Arc<GenerationClient>,
    system_prompt: String,
    history: Vec<Message>,
}

impl ChatSession {
    /// Start a session with an empty history
    pub fn new(client: Arc<GenerationClient>) -> Result<Self, FlowError> {
        let system_prompt = client
            .loader()
            .render("chat", &serde_json::json!({}))
            .map_err(|e| FlowError::Template(e.to_string()))?;

        Ok(Self {
            client,
            system_prompt,
            history: Vec::new(),
        })
    }

    /// Conversation so far (for history display)
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Drop the conversation history
    pub fn clear(&mut self) {
        self.history.clear();
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new(
            SUBTASKS_TOOL,
            "Breaks down a user-provided goal into a list of actionable subtasks with estimated time allocations. \
             Use this when a user explicitly asks to break down a goal, plan a task, or generate subtasks.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "goal": {
                        "type": "string",
                        "description": "The goal or task to break down into subtasks"
                    }
                },
                "required": ["goal"]
            }),
        )]
    }

    /// Send a message and return the assistant's response text
    ///
    /// Loops while the model requests the subtask tool: the decomposition
    /// flow runs locally, its result is fed back as a tool result, and
    /// the conversation continues until the model ends its turn.
    pub async fn send(&mut self, message: &str) -> Result<String, FlowError> {
        self.history.push(Message::user(message));
        let mut used_tool = false;

        loop {
            let request = CompletionRequest {
                system_prompt: self.system_prompt.clone(),
                messages: self.history.clone(),
                tools: self.tool_definitions(),
                max_tokens: FLOW_MAX_TOKENS,
            };

            let response = self.client.llm().complete(request).await?;

            match response.stop_reason {
                StopReason::ToolUse if !response.tool_calls.is_empty() => {
                    used_tool = true;

                    // Record the assistant's tool use in the history
                    let mut blocks: Vec<ContentBlock> = Vec::new();
                    if let Some(ref content) = response.content {
                        blocks.push(ContentBlock::text(content));
                    }
                    for tc in &response.tool_calls {
                        blocks.push(ContentBlock::ToolUse {
                            id: tc.id.clone(),
                            name: tc.name.clone(),
                            input: tc.input.clone(),
                        });
                    }
                    self.history.push(Message::assistant_blocks(blocks));

                    // Run each requested tool and feed the results back
                    let mut result_blocks: Vec<ContentBlock> = Vec::new();
                    for tc in &response.tool_calls {
                        debug!(tool = %tc.name, "chat: executing tool call");
                        let (content, is_error) = self.run_tool(&tc.name, &tc.input).await;
                        result_blocks.push(ContentBlock::tool_result(&tc.id, content, is_error));
                    }
                    self.history.push(Message::user_blocks(result_blocks));
                }
                _ => {
                    let text = match response.content {
                        Some(text) if !text.trim().is_empty() => text,
                        _ => {
                            warn!("chat: model returned no text response");
                            let fallback = if used_tool { TOOL_NO_TEXT_FALLBACK } else { NO_TEXT_FALLBACK };
                            fallback.to_string()
                        }
                    };
                    self.history.push(Message::assistant(&text));
                    return Ok(text);
                }
            }
        }
    }

    /// Execute a tool the model requested, returning (content, is_error)
    async fn run_tool(&self, name: &str, input: &serde_json::Value) -> (String, bool) {
        if name != SUBTASKS_TOOL {
            return (format!("Unknown tool: {}", name), true);
        }

        let input: SubtasksToolInput = match serde_json::from_value(input.clone()) {
            Ok(input) => input,
            Err(e) => return (format!("Invalid tool input: {}", e), true),
        };

        match self.client.generate_subtasks(&input.goal).await {
            Ok(subtasks) => {
                let payload = serde_json::json!({ "subtasks": subtasks });
                (payload.to_string(), false)
            }
            Err(e) => (format!("Subtask generation failed: {}", e), true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{text_response, tool_response};
    use crate::llm::client::mock::MockLlmClient;
    use crate::prompts::PromptLoader;

    fn session_with(responses: Vec<crate::llm::CompletionResponse>) -> ChatSession {
        let client = GenerationClient::new(Arc::new(MockLlmClient::new(responses)), PromptLoader::embedded_only());
        ChatSession::new(Arc::new(client)).unwrap()
    }

    #[tokio::test]
    async fn test_plain_conversation() {
        let mut session = session_with(vec![text_response("Hello! How can I help you plan today?")]);

        let reply = session.send("Hi there").await.unwrap();
        assert_eq!(reply, "Hello! How can I help you plan today?");
        // user message + assistant reply
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_tool_loop_feeds_subtasks_back() {
        let responses = vec![
            // Assistant decides to call the tool
            tool_response("generate_subtasks", serde_json::json!({"goal": "Plan a trip"})),
            // The tool call triggers the subtask flow internally
            tool_response(
                "submit_subtasks",
                serde_json::json!({"subtasks": [{"task": "Book flights", "estimatedTime": "1 hour"}]}),
            ),
            // Assistant summarizes the tool result
            text_response("Here is your plan:\n- Book flights (1 hour)"),
        ];
        let mut session = session_with(responses);

        let reply = session.send("Break down: plan a trip").await.unwrap();
        assert!(reply.contains("Book flights"));

        // user, assistant tool use, tool result, assistant text
        assert_eq!(session.history().len(), 4);
    }

    #[tokio::test]
    async fn test_no_text_fallback() {
        let mut session = session_with(vec![crate::llm::CompletionResponse {
            content: None,
            tool_calls: vec![],
            stop_reason: crate::llm::StopReason::EndTurn,
            usage: crate::llm::TokenUsage::default(),
        }]);

        let reply = session.send("Hello").await.unwrap();
        assert_eq!(reply, NO_TEXT_FALLBACK);
    }

    #[tokio::test]
    async fn test_tool_no_text_fallback() {
        let responses = vec![
            tool_response("generate_subtasks", serde_json::json!({"goal": "Plan a trip"})),
            tool_response("submit_subtasks", serde_json::json!({"subtasks": []})),
            crate::llm::CompletionResponse {
                content: None,
                tool_calls: vec![],
                stop_reason: crate::llm::StopReason::EndTurn,
                usage: crate::llm::TokenUsage::default(),
            },
        ];
        let mut session = session_with(responses);

        let reply = session.send("Break down: plan a trip").await.unwrap();
        assert_eq!(reply, TOOL_NO_TEXT_FALLBACK);
    }

    #[tokio::test]
    async fn test_clear_resets_history() {
        let mut session = session_with(vec![text_response("Sure.")]);
        session.send("Hello").await.unwrap();
        assert!(!session.history().is_empty());

        session.clear();
        assert!(session.history().is_empty());
    }
}
