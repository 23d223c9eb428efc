//! Shared domain types for the ladle pipeline.

use serde::{Deserialize, Serialize};

/// Provenance tag distinguishing which backing source produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Remote recipe catalog API
    Catalog,
    /// Locally indexed recipe corpus
    Corpus,
}

impl Origin {
    /// Get the canonical origin name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Corpus => "corpus",
        }
    }
}

/// A candidate recipe flowing through the pipeline.
///
/// Candidates are produced by the catalog client or the corpus extractor and
/// are mutated only by the filtering/tagging stages: the tagging stage sets
/// `origin` and clears provenance fields that do not apply to that origin
/// (corpus candidates never carry `source_url`/`image_url`).
///
/// Identity is `(origin, id-or-name)`; corpus candidates have no numeric id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    /// Catalog recipe id (absent for corpus candidates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Recipe name
    pub name: String,

    /// Ordered ingredient list
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Step-by-step instructions, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Calorie count, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,

    /// Link to the recipe page (catalog candidates only)
    #[serde(
        default,
        rename = "sourceUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_url: Option<String>,

    /// Image URL (catalog candidates only)
    #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Provenance tag, set by the tagging stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl RecipeCandidate {
    /// Create a candidate with just a name and ingredients.
    pub fn new(name: impl Into<String>, ingredients: Vec<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            ingredients,
            instructions: None,
            calories: None,
            source_url: None,
            image_url: None,
            origin: None,
        }
    }

    /// The terminal degraded result for a detail fetch that exhausted all
    /// attempts. Never cached, never an error.
    pub fn unknown(id: u64) -> Self {
        Self {
            id: Some(id),
            name: "Unknown".to_string(),
            ingredients: Vec::new(),
            instructions: None,
            calories: None,
            source_url: None,
            image_url: None,
            origin: None,
        }
    }

    /// Joined, lowercased ingredient text.
    ///
    /// Used by keyword-based fallback filters that match on substrings.
    pub fn ingredients_text(&self) -> String {
        self.ingredients.join(" ").to_lowercase()
    }

    /// Tag this candidate with its origin, clearing provenance fields that
    /// do not apply to that origin.
    pub fn tagged(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        if origin == Origin::Corpus {
            self.source_url = None;
            self.image_url = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        let sentinel = RecipeCandidate::unknown(42);
        assert_eq!(sentinel.id, Some(42));
        assert_eq!(sentinel.name, "Unknown");
        assert!(sentinel.ingredients.is_empty());
        assert!(sentinel.calories.is_none());
        assert!(sentinel.source_url.is_none());
    }

    #[test]
    fn test_ingredients_text_lowercases_and_joins() {
        let candidate = RecipeCandidate::new(
            "Roast Chicken",
            vec!["Chicken Breast".to_string(), "Olive Oil".to_string()],
        );
        assert_eq!(candidate.ingredients_text(), "chicken breast olive oil");
    }

    #[test]
    fn test_tagged_corpus_clears_provenance() {
        let mut candidate = RecipeCandidate::new("Lentil Soup", vec!["lentils".to_string()]);
        candidate.source_url = Some("https://example.com/lentil".to_string());
        candidate.image_url = Some("https://example.com/lentil.jpg".to_string());

        let tagged = candidate.tagged(Origin::Corpus);
        assert_eq!(tagged.origin, Some(Origin::Corpus));
        assert!(tagged.source_url.is_none());
        assert!(tagged.image_url.is_none());
    }

    #[test]
    fn test_tagged_catalog_keeps_provenance() {
        let mut candidate = RecipeCandidate::new("Pasta", vec!["pasta".to_string()]);
        candidate.source_url = Some("https://example.com/pasta".to_string());

        let tagged = candidate.tagged(Origin::Catalog);
        assert_eq!(tagged.origin, Some(Origin::Catalog));
        assert_eq!(
            tagged.source_url.as_deref(),
            Some("https://example.com/pasta")
        );
    }

    #[test]
    fn test_candidate_deserializes_from_extraction_shape() {
        let json = r#"{"name":"Bean Chili","ingredients":["beans","tomato"],"instructions":"Simmer.","calories":320}"#;
        let candidate: RecipeCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.name, "Bean Chili");
        assert_eq!(candidate.ingredients.len(), 2);
        assert_eq!(candidate.calories, Some(320));
        assert!(candidate.id.is_none());
        assert!(candidate.origin.is_none());
    }

    #[test]
    fn test_origin_serialization() {
        assert_eq!(serde_json::to_string(&Origin::Catalog).unwrap(), "\"catalog\"");
        assert_eq!(serde_json::to_string(&Origin::Corpus).unwrap(), "\"corpus\"");
    }
}
