//! Generation flows
//!
//! Each flow pairs a prompt template with typed input/output structs and
//! decodes the model's response through a decode-or-fail boundary:
//!
//! - [`GenerationClient::generate_subtasks`] - goal into subtasks with
//!   time estimates
//! - [`GenerationClient::generate_steps`] - one subtask into ordered
//!   steps
//! - [`GenerationClient::suggest_goals`] - five suggested goals
//! - [`ChatSession`] - conversational assistant that may call the
//!   subtask flow as a tool
//!
//! Structured output uses a single `submit_*` tool per flow whose input
//! schema mirrors the output struct. There is no retry policy and no
//! caching: a failed call surfaces directly, identical inputs re-invoke
//! the model.

use std::sync::Arc;

use serde::de::DeserializeOwned;

mod chat;
mod error;
mod steps;
mod subtasks;
mod suggest;

pub use chat::ChatSession;
pub use error::FlowError;
pub use steps::GenerateStepsOutput;
pub use subtasks::GenerateSubtasksOutput;
pub use suggest::SuggestGoalsOutput;

use crate::llm::{CompletionResponse, LlmClient};
use crate::prompts::PromptLoader;

/// Max tokens requested for a single generation flow response
pub const FLOW_MAX_TOKENS: u32 = 2048;

/// Schema-validated front door to the LLM provider
///
/// Stateless: holds only the provider client and the prompt loader.
pub struct GenerationClient {
    llm: Arc<dyn LlmClient>,
    loader: PromptLoader,
}

impl GenerationClient {
    pub fn new(llm: Arc<dyn LlmClient>, loader: PromptLoader) -> Self {
        Self { llm, loader }
    }

    pub(crate) fn llm(&self) -> &Arc<dyn LlmClient> {
        &self.llm
    }

    pub(crate) fn loader(&self) -> &PromptLoader {
        &self.loader
    }
}

/// Decode a flow's structured output from the model response
///
/// Looks for the named submit tool call first; falls back to parsing
/// plain text content as JSON. Anything else fails closed.
pub(crate) fn parse_submission<T: DeserializeOwned>(
    response: &CompletionResponse,
    tool_name: &str,
) -> Result<T, FlowError> {
    for tool_call in &response.tool_calls {
        if tool_call.name == tool_name {
            return serde_json::from_value(tool_call.input.clone())
                .map_err(|e| FlowError::InvalidOutput(format!("{} submission did not match schema: {}", tool_name, e)));
        }
    }

    if let Some(content) = &response.content
        && let Ok(output) = serde_json::from_str::<T>(content)
    {
        return Ok(output);
    }

    Err(FlowError::InvalidOutput(format!(
        "model did not produce a valid {} submission",
        tool_name
    )))
}
