//! Flow error types

use thiserror::Error;

use crate::llm::LlmError;

/// Errors from the generation flows
///
/// Malformed model output is a hard failure: a response that does not
/// decode through the flow's output schema is rejected wholesale, never
/// partially accepted.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("Prompt template error: {0}")]
    Template(String),
}
