//! Structured recipe extraction from retrieved passages.
//!
//! One reasoning-service call per batch of passages, demanding a strict
//! JSON array of `{name, ingredients[], instructions, calories?}` objects.
//! Extraction degrades to an empty list on any parse or service failure;
//! the corpus contribution disappears silently, the outer pipeline keeps
//! running. Results are not cached: retrieval is query-dependent.

use ladle_core::RecipeCandidate;
use ladle_llm::{clean_json, LlmClient, LlmRequest};
use ladle_prompt::PromptSet;
use std::sync::Arc;

/// Extractor over the reasoning service.
pub struct RecipeExtractor {
    llm: Arc<dyn LlmClient>,
    model: String,
    prompts: PromptSet,
}

impl RecipeExtractor {
    /// Create an extractor.
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, prompts: PromptSet) -> Self {
        Self {
            llm,
            model: model.into(),
            prompts,
        }
    }

    /// Extract structured candidates from a batch of passages.
    pub async fn extract(&self, passages: &[String]) -> Vec<RecipeCandidate> {
        if passages.is_empty() {
            return Vec::new();
        }

        let joined = passages.join("\n");

        let prompt = match self.prompts.extract_prompt(&joined) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("Failed to render extraction prompt: {}", e);
                return Vec::new();
            }
        };

        let request = LlmRequest::new(prompt, &self.model).with_temperature(0.0);

        let response = match self.llm.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Extraction service call failed: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<RecipeCandidate>>(clean_json(&response.content)) {
            Ok(recipes) => {
                tracing::debug!("Extracted {} recipes from {} passages", recipes.len(), passages.len());
                recipes
            }
            Err(e) => {
                tracing::debug!("Extraction response was not a JSON recipe array: {}", e);
                Vec::new()
            }
        }
    }
}
