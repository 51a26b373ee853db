//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

/// Goal decomposition prompt
pub const SUBTASKS: &str = include_str!("../../prompts/subtasks.pmt");

/// Subtask-to-steps breakdown prompt
pub const STEPS: &str = include_str!("../../prompts/steps.pmt");

/// Goal suggestion prompt
pub const SUGGEST: &str = include_str!("../../prompts/suggest.pmt");

/// Assistant chat system prompt
pub const CHAT: &str = include_str!("../../prompts/chat.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "subtasks" => Some(SUBTASKS),
        "steps" => Some(STEPS),
        "suggest" => Some(SUGGEST),
        "chat" => Some(CHAT),
        _ => None,
    }
}
