//! Wire types for the remote catalog API.

use ladle_core::RecipeCandidate;
use serde::{Deserialize, Serialize};

/// Parameters for the catalog's complex-search endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchParams {
    /// Ingredient terms to include (joined with commas on the wire)
    pub ingredients: Option<Vec<String>>,

    /// Meal type filter (breakfast, lunch, dinner, snack)
    pub meal_type: Option<String>,

    /// Remote diet filter. The pipeline always passes `None` here: diet
    /// enforcement is local, the remote filter is not relied upon.
    pub diet: Option<String>,

    /// Number of results to request
    pub number: u32,
}

impl SearchParams {
    /// Ingredient terms joined for the `includeIngredients` query parameter.
    pub fn include_ingredients(&self) -> Option<String> {
        self.ingredients
            .as_ref()
            .filter(|list| !list.is_empty())
            .map(|list| list.join(","))
    }
}

/// Response body of the complex-search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// A single search hit; only the id is requested
/// (`addRecipeInformation=false`, detail is fetched separately).
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: u64,
}

/// Response body of the detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResponse {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, rename = "extendedIngredients")]
    pub extended_ingredients: Vec<IngredientRef>,

    #[serde(default, rename = "sourceUrl")]
    pub source_url: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}

/// An ingredient reference within a detail response.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientRef {
    #[serde(default)]
    pub name: String,
}

impl DetailResponse {
    /// Convert a detail response into a pipeline candidate.
    ///
    /// Calories are not derivable from this endpoint and stay unset.
    pub fn into_candidate(self, id: u64) -> RecipeCandidate {
        RecipeCandidate {
            id: Some(id),
            name: self.title.unwrap_or_else(|| "Unknown".to_string()),
            ingredients: self
                .extended_ingredients
                .into_iter()
                .map(|i| i.name)
                .collect(),
            instructions: None,
            calories: None,
            source_url: self.source_url,
            image_url: self.image,
            origin: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_ingredients_joins_with_commas() {
        let params = SearchParams {
            ingredients: Some(vec!["chicken".to_string(), "rice".to_string()]),
            ..Default::default()
        };
        assert_eq!(params.include_ingredients().as_deref(), Some("chicken,rice"));
    }

    #[test]
    fn test_include_ingredients_empty_is_none() {
        let params = SearchParams {
            ingredients: Some(Vec::new()),
            ..Default::default()
        };
        assert!(params.include_ingredients().is_none());
    }

    #[test]
    fn test_detail_into_candidate() {
        let json = r#"{
            "title": "Garlic Butter Shrimp",
            "extendedIngredients": [{"name": "shrimp"}, {"name": "butter"}],
            "sourceUrl": "https://example.com/shrimp",
            "image": "https://example.com/shrimp.jpg"
        }"#;
        let detail: DetailResponse = serde_json::from_str(json).unwrap();
        let candidate = detail.into_candidate(7);

        assert_eq!(candidate.id, Some(7));
        assert_eq!(candidate.name, "Garlic Butter Shrimp");
        assert_eq!(candidate.ingredients, vec!["shrimp", "butter"]);
        assert_eq!(candidate.source_url.as_deref(), Some("https://example.com/shrimp"));
        assert!(candidate.calories.is_none());
        assert!(candidate.origin.is_none());
    }

    #[test]
    fn test_detail_missing_fields_tolerated() {
        let detail: DetailResponse = serde_json::from_str("{}").unwrap();
        let candidate = detail.into_candidate(1);
        assert_eq!(candidate.name, "Unknown");
        assert!(candidate.ingredients.is_empty());
    }

    #[test]
    fn test_search_response_parses_hits() {
        let json = r#"{"results": [{"id": 11}, {"id": 12}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<u64> = response.results.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![11, 12]);
    }
}
