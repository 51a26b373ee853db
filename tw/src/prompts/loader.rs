//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::PathBuf;

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (`~/.config/taskwise/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader with the default user override directory
    pub fn new() -> Self {
        let user_dir = dirs::config_dir().map(|p| p.join("taskwise").join("prompts"));
        let user_dir = match user_dir {
            Some(dir) if dir.exists() => {
                debug!(?dir, "PromptLoader::new: user override directory found");
                Some(dir)
            }
            _ => None,
        };

        Self {
            hbs: Handlebars::new(),
            user_dir,
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self {
            hbs: Handlebars::new(),
            user_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks the user override directory first, then the embedded
    /// fallback.
    fn load_template(&self, name: &str) -> Result<String> {
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "load_template: found user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "render: called");
        let template = self.load_template(template_name)?;

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct GoalContext {
        goal: String,
    }

    #[test]
    fn test_render_embedded_subtasks() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader
            .render(
                "subtasks",
                &GoalContext {
                    goal: "Plan a trip".to_string(),
                },
            )
            .unwrap();
        assert!(rendered.contains("Goal: Plan a trip"));
        assert!(!rendered.contains("{{goal}}"));
    }

    #[test]
    fn test_render_unknown_template_fails() {
        let loader = PromptLoader::embedded_only();
        let result = loader.render("does-not-exist", &serde_json::json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_render_suggest_without_variables() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader.render("suggest", &serde_json::json!({})).unwrap();
        assert!(rendered.contains("achievable goals"));
    }
}
