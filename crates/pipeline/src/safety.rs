//! Allergen and diet safety filtering.
//!
//! Both filters are fail-open: when the reasoning service is unavailable
//! they prefer including a candidate over dropping it. Callers who need
//! precision combine them with explicit allergen declarations.

use ladle_core::RecipeCandidate;
use ladle_llm::{clean_json, LlmClient, LlmRequest};
use ladle_prompt::PromptSet;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Meat keywords for the vegetarian degraded-mode fallback.
const MEAT_KEYWORDS: [&str; 6] = ["chicken", "beef", "pork", "fish", "lamb", "turkey"];

/// Shared, append-only cache of allergen classifications.
///
/// Keyed by `(ingredient, allergen)` lowercased; never invalidated during
/// the process lifetime. Service failures are cached as `false` so a dead
/// service is not re-queried for the same pair within the run.
#[derive(Debug, Clone, Default)]
pub struct AllergenCache {
    inner: Arc<RwLock<HashMap<(String, String), bool>>>,
}

impl AllergenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached classification. Keys are case-insensitive.
    pub fn get(&self, ingredient: &str, allergen: &str) -> Option<bool> {
        let key = (ingredient.to_lowercase(), allergen.to_lowercase());
        self.inner.read().unwrap().get(&key).copied()
    }

    /// Record a classification.
    pub fn insert(&self, ingredient: &str, allergen: &str, result: bool) {
        let key = (ingredient.to_lowercase(), allergen.to_lowercase());
        self.inner.write().unwrap().insert(key, result);
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}

/// Safety classifier over the reasoning service.
pub struct SafetyClassifier {
    llm: Arc<dyn LlmClient>,
    model: String,
    prompts: PromptSet,
    cache: AllergenCache,
}

impl SafetyClassifier {
    /// Create a classifier with an injected cache.
    ///
    /// The cache is constructed once by the process-wide context so that
    /// concurrent queries share classifications.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        prompts: PromptSet,
        cache: AllergenCache,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            prompts,
            cache,
        }
    }

    /// Access the shared allergen cache.
    pub fn cache(&self) -> &AllergenCache {
        &self.cache
    }

    /// Check whether an ingredient counts as a declared allergen.
    ///
    /// Cache-first. On a miss the service is asked a strict yes/no question
    /// and the first token of the answer decides. Any failure resolves to
    /// `false` (fail-open) and is cached so the error is not retried
    /// indefinitely within the run.
    pub async fn is_allergen(&self, ingredient: &str, allergen: &str) -> bool {
        if let Some(hit) = self.cache.get(ingredient, allergen) {
            return hit;
        }

        let result = self.classify_allergen(ingredient, allergen).await;
        self.cache.insert(ingredient, allergen, result);
        result
    }

    async fn classify_allergen(&self, ingredient: &str, allergen: &str) -> bool {
        let prompt = match self.prompts.allergen_prompt(ingredient, allergen) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("Failed to render allergen prompt: {}", e);
                return false;
            }
        };

        let request = LlmRequest::new(prompt, &self.model).with_temperature(0.0);

        match self.llm.complete(&request).await {
            Ok(response) => first_token_is_yes(&response.content),
            Err(e) => {
                tracing::debug!(
                    "Allergen check failed for ({}, {}), failing open: {}",
                    ingredient,
                    allergen,
                    e
                );
                false
            }
        }
    }

    /// Drop every recipe containing any declared allergen.
    ///
    /// A recipe is dropped as soon as one `(ingredient, allergy)` pair
    /// classifies positive; otherwise the whole cross-product is checked.
    pub async fn filter_by_allergens(
        &self,
        recipes: Vec<RecipeCandidate>,
        allergies: &[String],
    ) -> Vec<RecipeCandidate> {
        if allergies.is_empty() {
            return recipes;
        }

        let mut safe = Vec::with_capacity(recipes.len());

        'recipes: for recipe in recipes {
            for ingredient in &recipe.ingredients {
                for allergy in allergies {
                    if self.is_allergen(ingredient, allergy).await {
                        tracing::debug!(
                            "Dropping '{}': ingredient '{}' matches allergy '{}'",
                            recipe.name,
                            ingredient,
                            allergy
                        );
                        continue 'recipes;
                    }
                }
            }
            safe.push(recipe);
        }

        safe
    }

    /// Keep only recipes matching the diet.
    ///
    /// One service call carries the full candidate-name list and must come
    /// back as a JSON array of allowed names. On any failure the filter
    /// degrades: the literal diet "vegetarian" gets a deterministic keyword
    /// fallback, every other diet passes the input through unchanged. The
    /// asymmetry is deliberate degraded-mode policy.
    pub async fn filter_by_diet(
        &self,
        recipes: Vec<RecipeCandidate>,
        diet: &str,
    ) -> Vec<RecipeCandidate> {
        if recipes.is_empty() {
            return recipes;
        }

        let names: Vec<String> = recipes.iter().map(|r| r.name.clone()).collect();

        match self.allowed_names(diet, &names).await {
            Some(allowed) => recipes
                .into_iter()
                .filter(|r| allowed.iter().any(|name| name == &r.name))
                .collect(),
            None => {
                if diet.eq_ignore_ascii_case("vegetarian") {
                    tracing::debug!("Diet filter degraded to vegetarian keyword fallback");
                    recipes
                        .into_iter()
                        .filter(|r| {
                            let text = r.ingredients_text();
                            !MEAT_KEYWORDS.iter().any(|meat| text.contains(meat))
                        })
                        .collect()
                } else {
                    tracing::debug!("Diet filter for '{}' degraded to pass-through", diet);
                    recipes
                }
            }
        }
    }

    /// Ask the service which names match the diet. `None` means the call
    /// or the parse failed and the caller must degrade.
    async fn allowed_names(&self, diet: &str, names: &[String]) -> Option<Vec<String>> {
        let prompt = match self.prompts.diet_prompt(diet, names) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("Failed to render diet prompt: {}", e);
                return None;
            }
        };

        let request = LlmRequest::new(prompt, &self.model).with_temperature(0.0);

        let response = match self.llm.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Diet filter service call failed: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<String>>(clean_json(&response.content)) {
            Ok(allowed) => Some(allowed),
            Err(e) => {
                tracing::debug!("Diet filter response was not a JSON name list: {}", e);
                None
            }
        }
    }
}

/// Compare the first token of a response against "yes", case-insensitively.
fn first_token_is_yes(content: &str) -> bool {
    content
        .split_whitespace()
        .next()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .map(|token| token.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladle_llm::providers::mock::{MockClient, MockReply};

    fn classifier(client: MockClient) -> (Arc<MockClient>, SafetyClassifier) {
        let client = Arc::new(client);
        let classifier = SafetyClassifier::new(
            Arc::clone(&client) as Arc<dyn LlmClient>,
            "mock-model",
            PromptSet::builtin(),
            AllergenCache::new(),
        );
        (client, classifier)
    }

    fn recipe(name: &str, ingredients: &[&str]) -> RecipeCandidate {
        RecipeCandidate::new(name, ingredients.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_first_token_parsing() {
        assert!(first_token_is_yes("yes"));
        assert!(first_token_is_yes("Yes, definitely."));
        assert!(first_token_is_yes("YES."));
        assert!(!first_token_is_yes("no"));
        assert!(!first_token_is_yes("Not really"));
        assert!(!first_token_is_yes(""));
    }

    #[tokio::test]
    async fn test_is_allergen_yes_and_no() {
        let (_, classifier) = classifier(MockClient::scripted(vec![
            MockReply::Ok("yes".to_string()),
            MockReply::Ok("no".to_string()),
        ]));

        assert!(classifier.is_allergen("cheddar", "dairy").await);
        assert!(!classifier.is_allergen("tomato", "dairy").await);
    }

    #[tokio::test]
    async fn test_is_allergen_idempotent_via_cache() {
        let (client, classifier) = classifier(MockClient::scripted(vec![MockReply::Ok(
            "yes".to_string(),
        )]));

        assert!(classifier.is_allergen("cheddar", "dairy").await);
        // Second identical call: cache hit, no second service call
        assert!(classifier.is_allergen("cheddar", "dairy").await);
        // Keys are case-insensitive
        assert!(classifier.is_allergen("Cheddar", "DAIRY").await);

        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_is_allergen_fails_open_and_caches_failure() {
        let (client, classifier) = classifier(MockClient::failing());

        assert!(!classifier.is_allergen("cheddar", "dairy").await);
        // Failure result is cached: the dead service is not re-queried
        assert!(!classifier.is_allergen("cheddar", "dairy").await);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_filter_by_allergens_fail_open_keeps_everything() {
        let (_, classifier) = classifier(MockClient::failing());

        let recipes = vec![
            recipe("Mac and Cheese", &["macaroni", "cheddar"]),
            recipe("Tomato Soup", &["tomato"]),
        ];

        let filtered = classifier
            .filter_by_allergens(recipes.clone(), &["dairy".to_string()])
            .await;
        assert_eq!(filtered, recipes);
    }

    #[tokio::test]
    async fn test_filter_by_allergens_drops_on_first_match() {
        // Mac and Cheese: "macaroni" vs dairy -> no, "cheddar" vs dairy -> yes (dropped)
        // Tomato Soup: "tomato" vs dairy -> no (kept)
        let (client, classifier) = classifier(MockClient::scripted(vec![
            MockReply::Ok("no".to_string()),
            MockReply::Ok("yes".to_string()),
            MockReply::Ok("no".to_string()),
        ]));

        let recipes = vec![
            recipe("Mac and Cheese", &["macaroni", "cheddar"]),
            recipe("Tomato Soup", &["tomato"]),
        ];

        let filtered = classifier
            .filter_by_allergens(recipes, &["dairy".to_string()])
            .await;

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Tomato Soup");
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_filter_by_allergens_no_allergies_skips_service() {
        let (client, classifier) = classifier(MockClient::failing());

        let recipes = vec![recipe("Anything", &["stuff"])];
        let filtered = classifier.filter_by_allergens(recipes.clone(), &[]).await;

        assert_eq!(filtered, recipes);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_filter_by_diet_keeps_allowed_names() {
        let (_, classifier) = classifier(MockClient::always(r#"["Tomato Soup"]"#));

        let recipes = vec![
            recipe("Roast Chicken", &["chicken"]),
            recipe("Tomato Soup", &["tomato"]),
        ];

        let filtered = classifier.filter_by_diet(recipes, "vegetarian").await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Tomato Soup");
    }

    #[tokio::test]
    async fn test_filter_by_diet_tolerates_fenced_output() {
        let (_, classifier) = classifier(MockClient::always("```json\n[\"Tomato Soup\"]\n```"));

        let recipes = vec![
            recipe("Roast Chicken", &["chicken"]),
            recipe("Tomato Soup", &["tomato"]),
        ];

        let filtered = classifier.filter_by_diet(recipes, "vegan").await;
        assert_eq!(filtered.len(), 1);
    }

    #[tokio::test]
    async fn test_vegetarian_fallback_drops_meat_keywords() {
        let (_, classifier) = classifier(MockClient::failing());

        let recipes = vec![
            recipe("Roast Chicken", &["Chicken breast", "thyme"]),
            recipe("Shepherd's Pie", &["ground LAMB", "potato"]),
            recipe("Tomato Soup", &["tomato", "basil"]),
        ];

        let filtered = classifier.filter_by_diet(recipes, "vegetarian").await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Tomato Soup");
    }

    #[tokio::test]
    async fn test_non_vegetarian_diet_fails_open_unchanged() {
        let (_, classifier) = classifier(MockClient::failing());

        let recipes = vec![
            recipe("Roast Chicken", &["chicken"]),
            recipe("Tomato Soup", &["tomato"]),
        ];

        let filtered = classifier.filter_by_diet(recipes.clone(), "keto").await;
        assert_eq!(filtered, recipes);
    }

    #[tokio::test]
    async fn test_malformed_diet_response_degrades_like_failure() {
        let (_, classifier) = classifier(MockClient::always("all of them look fine to me"));

        let recipes = vec![
            recipe("Roast Chicken", &["chicken"]),
            recipe("Tomato Soup", &["tomato"]),
        ];

        let filtered = classifier.filter_by_diet(recipes, "vegetarian").await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Tomato Soup");
    }

    #[tokio::test]
    async fn test_filter_by_diet_empty_input_skips_service() {
        let (client, classifier) = classifier(MockClient::always("[]"));

        let filtered = classifier.filter_by_diet(Vec::new(), "vegetarian").await;
        assert!(filtered.is_empty());
        assert_eq!(client.call_count(), 0);
    }
}
