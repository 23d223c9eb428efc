//! Prompt builder for rendering templates.

use crate::types::PromptDefinition;
use handlebars::Handlebars;
use ladle_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Every variable the definition declares must be present; rendering uses
/// Handlebars with HTML escaping disabled (prompts are plain text).
///
/// # Arguments
/// * `definition` - Prompt definition (built-in or workspace override)
/// * `variables` - Template variables (e.g., "ingredient" -> "cheddar")
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: &HashMap<String, String>,
) -> AppResult<String> {
    tracing::debug!("Building prompt: {}", definition.id);

    for required in &definition.variables {
        if !variables.contains_key(required) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' missing required variable: {}",
                definition.id, required
            )));
        }
    }

    render_template(&definition.template, variables)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
