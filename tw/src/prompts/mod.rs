//! Prompt templates for the generation flows
//!
//! Templates are Handlebars `.pmt` files embedded at build time, with an
//! optional per-user override directory.

pub mod embedded;
mod loader;

pub use loader::PromptLoader;
