//! Built-in prompt definitions for every pipeline call site.
//!
//! The template texts are load-bearing: the diet filter and the extractor
//! parse the response as JSON, and the allergen check reads the first token.

use crate::builder::build_prompt;
use crate::loader::load_prompt;
use crate::types::PromptDefinition;
use ladle_core::AppResult;
use std::collections::HashMap;
use std::path::Path;

/// Intent/meal-type/diet classification.
pub const INTENT_ID: &str = "router.intent";

/// Strict yes/no allergen question.
pub const ALLERGEN_ID: &str = "safety.allergen";

/// Diet filter over a candidate name list.
pub const DIET_ID: &str = "safety.diet";

/// Structured recipe extraction from corpus passages.
pub const EXTRACT_ID: &str = "corpus.extract";

const INTENT_TEMPLATE: &str = r#"You are a smart recipe assistant.
User query: "{{query}}"

1. Determine intent:
    - "ingredients" if the user specifies ingredients
    - "profile" if the user asks generally (like "I want a healthy lunch")

2. Detect meal type (breakfast, lunch, dinner, snack), or leave empty if not clear.

3. Detect diet if mentioned (vegetarian, vegan, pescetarian, gluten-free), or leave empty.

Respond with a JSON object like:
{"intent": "profile", "meal_type": "lunch", "diet": "vegetarian"}
and nothing else.
"#;

const ALLERGEN_TEMPLATE: &str =
    r#"Is the ingredient "{{ingredient}}" considered "{{allergen}}"? Answer only "yes" or "no"."#;

const DIET_TEMPLATE: &str = r#"You are a diet filter. User diet: {{diet}}.
From this list of recipes, return ONLY the names that match the diet:
{{recipe_names}}

Return the allowed names as a JSON list of strings and nothing else.
"#;

const EXTRACT_TEMPLATE: &str = r#"You are a recipe assistant. Extract all recipes from the text.
Each recipe should include:
- name (title)
- ingredients (list)
- instructions (step-by-step)
- calories (if available, else null)

Return a JSON array exactly like:
[
  {"name": "Recipe 1", "ingredients": ["ingredient1", "ingredient2"], "instructions": "Step 1 ... Step 2 ...", "calories": 123},
  {"name": "Recipe 2", "ingredients": ["ingredientA", "ingredientB"], "instructions": "Step 1 ... Step 2 ...", "calories": 456}
]

ONLY include actual recipes. Exclude tables of contents, headings, or non-recipe text. Recipes start with "Serves" or "Ingredients:".

Recipe text:
"""
{{passages}}
"""
"#;

/// Get a built-in definition by id.
pub fn builtin(id: &str) -> Option<PromptDefinition> {
    match id {
        INTENT_ID => Some(PromptDefinition::new(
            INTENT_ID,
            "Intent classification",
            vec!["query"],
            INTENT_TEMPLATE,
        )),
        ALLERGEN_ID => Some(PromptDefinition::new(
            ALLERGEN_ID,
            "Allergen check",
            vec!["ingredient", "allergen"],
            ALLERGEN_TEMPLATE,
        )),
        DIET_ID => Some(PromptDefinition::new(
            DIET_ID,
            "Diet filter",
            vec!["diet", "recipe_names"],
            DIET_TEMPLATE,
        )),
        EXTRACT_ID => Some(PromptDefinition::new(
            EXTRACT_ID,
            "Recipe extraction",
            vec!["passages"],
            EXTRACT_TEMPLATE,
        )),
        _ => None,
    }
}

/// All built-in prompt ids.
pub fn builtin_ids() -> Vec<&'static str> {
    vec![INTENT_ID, ALLERGEN_ID, DIET_ID, EXTRACT_ID]
}

/// The resolved prompt set used by a pipeline instance.
///
/// Definitions are resolved once at startup (workspace overrides win over
/// built-ins) and rendered through typed methods at each call site.
#[derive(Debug, Clone)]
pub struct PromptSet {
    intent: PromptDefinition,
    allergen: PromptDefinition,
    diet: PromptDefinition,
    extract: PromptDefinition,
}

impl PromptSet {
    /// Resolve all pipeline prompts for a workspace.
    pub fn load(workspace: &Path) -> AppResult<Self> {
        Ok(Self {
            intent: load_prompt(workspace, INTENT_ID)?,
            allergen: load_prompt(workspace, ALLERGEN_ID)?,
            diet: load_prompt(workspace, DIET_ID)?,
            extract: load_prompt(workspace, EXTRACT_ID)?,
        })
    }

    /// Resolve the built-in prompts with no workspace overrides.
    pub fn builtin() -> Self {
        // builtin() covers every id listed here, so unwrap cannot fire
        Self {
            intent: builtin(INTENT_ID).unwrap(),
            allergen: builtin(ALLERGEN_ID).unwrap(),
            diet: builtin(DIET_ID).unwrap(),
            extract: builtin(EXTRACT_ID).unwrap(),
        }
    }

    /// Render the intent-classification prompt.
    pub fn intent_prompt(&self, query: &str) -> AppResult<String> {
        let mut vars = HashMap::new();
        vars.insert("query".to_string(), query.to_string());
        build_prompt(&self.intent, &vars)
    }

    /// Render the allergen yes/no prompt.
    pub fn allergen_prompt(&self, ingredient: &str, allergen: &str) -> AppResult<String> {
        let mut vars = HashMap::new();
        vars.insert("ingredient".to_string(), ingredient.to_string());
        vars.insert("allergen".to_string(), allergen.to_string());
        build_prompt(&self.allergen, &vars)
    }

    /// Render the diet-filter prompt over a JSON-encoded name list.
    pub fn diet_prompt(&self, diet: &str, recipe_names: &[String]) -> AppResult<String> {
        let mut vars = HashMap::new();
        vars.insert("diet".to_string(), diet.to_string());
        vars.insert(
            "recipe_names".to_string(),
            serde_json::to_string(recipe_names)?,
        );
        build_prompt(&self.diet, &vars)
    }

    /// Render the extraction prompt over joined passage text.
    pub fn extract_prompt(&self, passages: &str) -> AppResult<String> {
        let mut vars = HashMap::new();
        vars.insert("passages".to_string(), passages.to_string());
        build_prompt(&self.extract, &vars)
    }
}
