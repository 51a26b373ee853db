//! TaskWise - AI-powered daily planner
//!
//! TaskWise turns a free-form goal into actionable subtasks with time
//! estimates via an LLM call, then lets the user edit, schedule, and
//! track those subtasks alongside a separate list of coarser tracked
//! goals. Saved plans and tracked goals persist as JSON documents in a
//! local store; the live subtask list exists only for the session.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and Anthropic implementation
//! - [`prompts`] - Handlebars templates with embedded fallbacks
//! - [`flows`] - typed generation flows (subtasks, steps, suggestions,
//!   chat) with decode-or-fail output boundaries
//! - [`domain`] - subtasks, saved plans, tracked goals
//! - [`planner`] - the application state store and persistence boundary
//! - [`views`] - terminal rendering
//! - [`repl`] - interactive planning and chat sessions
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod flows;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod repl;
pub mod views;

// Re-export commonly used types
pub use config::{Config, LlmConfig, StorageConfig};
pub use domain::{ExtendedSubtask, GoalKind, SavedGoal, Subtask, TrackedGoal};
pub use flows::{ChatSession, FlowError, GenerationClient};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use planner::{CalendarEntry, Planner, PlannerError, SAVED_GOALS_KEY, TRACKED_GOALS_KEY};
pub use prompts::PromptLoader;
