//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// This is the core abstraction for invoking language models. No
/// conversation state is maintained between calls; the chat flow carries
/// its own history and replays it on every request. Identical inputs
/// re-invoke the model every time - there is no caching layer.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
