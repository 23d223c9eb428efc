//! Prompt definition types.

use serde::{Deserialize, Serialize};

/// A prompt definition: an identified Handlebars template plus the
/// variables it requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Prompt identifier (e.g., "safety.allergen")
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Variables the template requires
    #[serde(default)]
    pub variables: Vec<String>,

    /// Handlebars template text
    pub template: String,
}

impl PromptDefinition {
    /// Create a definition.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        variables: Vec<&str>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            variables: variables.into_iter().map(String::from).collect(),
            template: template.into(),
        }
    }
}
