//! Prompt Renderer - Render templates with context variables using Handlebars

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use super::GROUNDED_TEMPLATE;
use crate::error::{Result, VariantAiError};

/// Renders prompt templates using Handlebars templating
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Passages and questions are plain text, never HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Render a template string with any serializable context
    pub fn render_with<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .map_err(|e| VariantAiError::Prompt(format!("Failed to render template: {}", e)))
    }

    /// Interpolate context and the literal question into the grounding template
    pub fn grounded_prompt(&self, context: &str, question: &str) -> Result<String> {
        self.render_with(GROUNDED_TEMPLATE, &json!({ "context": context, "question": question }))
    }
}
