//! Intent classification for incoming queries.
//!
//! One reasoning-service call decides whether a query is ingredient-driven
//! or profile-driven and picks up optional meal-type/diet slots. The
//! classification degrades to the profile branch on any failure; it never
//! stops the pipeline.

use ladle_llm::{clean_json, LlmClient, LlmRequest};
use ladle_prompt::PromptSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query intent: which retrieval flow runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// The query names ingredients ("chicken soup", "something with lentils")
    Ingredients,
    /// The query is a general profile ("a healthy lunch")
    Profile,
}

/// Result of classifying a query.
///
/// Immutable once produced; an explicit caller diet override is never
/// replaced by an inferred one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Detected intent
    pub intent: Intent,

    /// Meal-type slot (breakfast, lunch, dinner, snack)
    pub meal_type: Option<String>,

    /// Resolved diet: the caller override when set, else the inferred one
    pub diet: Option<String>,
}

/// Raw shape of the classifier's JSON response.
#[derive(Debug, Deserialize)]
struct RawClassification {
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    meal_type: Option<String>,
    #[serde(default)]
    diet: Option<String>,
}

/// Classify a query, resolving the diet against a caller override.
///
/// `existing_diet` always wins: the classifier's diet applies only when the
/// caller declared none. Any service or parse failure yields the profile
/// intent with empty slots (the override still applies).
pub async fn classify(
    llm: &Arc<dyn LlmClient>,
    model: &str,
    prompts: &PromptSet,
    query: &str,
    existing_diet: Option<&str>,
) -> Classification {
    let raw = request_classification(llm, model, prompts, query).await;

    let (intent, meal_type, inferred_diet) = match raw {
        Some(raw) => (
            coerce_intent(raw.intent.as_deref()),
            normalize_slot(raw.meal_type),
            normalize_slot(raw.diet),
        ),
        None => (Intent::Profile, None, None),
    };

    let diet = match existing_diet {
        // Explicit override always wins
        Some(diet) => Some(diet.to_string()),
        None => inferred_diet,
    };

    let classification = Classification {
        intent,
        meal_type,
        diet,
    };

    tracing::debug!("Classified query: {:?}", classification);

    classification
}

async fn request_classification(
    llm: &Arc<dyn LlmClient>,
    model: &str,
    prompts: &PromptSet,
    query: &str,
) -> Option<RawClassification> {
    let prompt = match prompts.intent_prompt(query) {
        Ok(prompt) => prompt,
        Err(e) => {
            tracing::warn!("Failed to render intent prompt: {}", e);
            return None;
        }
    };

    let request = LlmRequest::new(prompt, model).with_temperature(0.0);

    let response = match llm.complete(&request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Intent classification failed, defaulting to profile: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<RawClassification>(clean_json(&response.content)) {
        Ok(raw) => Some(raw),
        Err(e) => {
            tracing::debug!("Intent response was not valid JSON: {}", e);
            None
        }
    }
}

/// Coerce an intent string to a recognized value; anything else is profile.
fn coerce_intent(intent: Option<&str>) -> Intent {
    match intent.map(|s| s.to_lowercase()) {
        Some(ref s) if s == "ingredients" => Intent::Ingredients,
        _ => Intent::Profile,
    }
}

/// Empty or whitespace-only slot values normalize to `None`.
fn normalize_slot(slot: Option<String>) -> Option<String> {
    slot.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladle_llm::providers::mock::MockClient;

    fn llm(client: MockClient) -> Arc<dyn LlmClient> {
        Arc::new(client)
    }

    #[tokio::test]
    async fn test_classify_parses_response() {
        let llm = llm(MockClient::always(
            r#"{"intent": "ingredients", "meal_type": "dinner", "diet": "vegan"}"#,
        ));
        let prompts = PromptSet::builtin();

        let result = classify(&llm, "mock-model", &prompts, "chicken soup", None).await;
        assert_eq!(result.intent, Intent::Ingredients);
        assert_eq!(result.meal_type.as_deref(), Some("dinner"));
        assert_eq!(result.diet.as_deref(), Some("vegan"));
    }

    #[tokio::test]
    async fn test_override_diet_wins_over_inferred() {
        let llm = llm(MockClient::always(
            r#"{"intent": "profile", "meal_type": null, "diet": "vegetarian"}"#,
        ));
        let prompts = PromptSet::builtin();

        let result = classify(&llm, "mock-model", &prompts, "light dinner", Some("vegan")).await;
        assert_eq!(result.diet.as_deref(), Some("vegan"));
    }

    #[tokio::test]
    async fn test_inferred_diet_applies_when_no_override() {
        let llm = llm(MockClient::always(
            r#"{"intent": "profile", "diet": "vegetarian"}"#,
        ));
        let prompts = PromptSet::builtin();

        let result = classify(&llm, "mock-model", &prompts, "meatless dinner", None).await;
        assert_eq!(result.diet.as_deref(), Some("vegetarian"));
    }

    #[tokio::test]
    async fn test_unknown_intent_coerced_to_profile() {
        let llm = llm(MockClient::always(r#"{"intent": "dessert-hunting"}"#));
        let prompts = PromptSet::builtin();

        let result = classify(&llm, "mock-model", &prompts, "cake", None).await;
        assert_eq!(result.intent, Intent::Profile);
    }

    #[tokio::test]
    async fn test_service_failure_degrades_to_profile_with_override() {
        let llm = llm(MockClient::failing());
        let prompts = PromptSet::builtin();

        let result = classify(&llm, "mock-model", &prompts, "chicken soup", Some("vegan")).await;
        assert_eq!(result.intent, Intent::Profile);
        assert!(result.meal_type.is_none());
        assert_eq!(result.diet.as_deref(), Some("vegan"));
    }

    #[tokio::test]
    async fn test_malformed_response_degrades_to_profile() {
        let llm = llm(MockClient::always("sure, sounds tasty"));
        let prompts = PromptSet::builtin();

        let result = classify(&llm, "mock-model", &prompts, "chicken soup", None).await;
        assert_eq!(result.intent, Intent::Profile);
        assert!(result.diet.is_none());
    }

    #[tokio::test]
    async fn test_empty_slots_normalize_to_none() {
        let llm = llm(MockClient::always(
            r#"{"intent": "profile", "meal_type": "", "diet": ""}"#,
        ));
        let prompts = PromptSet::builtin();

        let result = classify(&llm, "mock-model", &prompts, "anything", None).await;
        assert!(result.meal_type.is_none());
        assert!(result.diet.is_none());
    }

    #[tokio::test]
    async fn test_fenced_response_tolerated() {
        let llm = llm(MockClient::always(
            "```json\n{\"intent\": \"ingredients\"}\n```",
        ));
        let prompts = PromptSet::builtin();

        let result = classify(&llm, "mock-model", &prompts, "lentils", None).await;
        assert_eq!(result.intent, Intent::Ingredients);
    }
}
