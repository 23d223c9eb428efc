//! End-to-end query orchestration.
//!
//! `RecipePipeline::run_query` is the caller-facing entry point:
//! classify -> retrieve (catalog + corpus, concurrently) -> filter
//! (allergens, then diet) -> tag origin -> aggregate.

use crate::classify::{classify, Intent};
use crate::safety::SafetyClassifier;
use ladle_catalog::CatalogClient;
use ladle_core::{AppError, AppResult, Origin, RecipeCandidate};
use ladle_corpus::{PassageRetriever, RecipeExtractor};
use ladle_llm::LlmClient;
use ladle_prompt::PromptSet;
use std::sync::Arc;
use std::time::Duration;

/// Orchestration settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of catalog search results to request
    pub search_count: u32,

    /// Number of corpus passages to retrieve
    pub retrieve_k: usize,

    /// Overall per-query timeout. Unset = bounded only by the retry caps.
    pub query_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_count: 5,
            retrieve_k: 10,
            query_timeout: None,
        }
    }
}

/// The end-to-end recipe query pipeline.
///
/// Owns the process-wide collaborators; safe to share across concurrent
/// queries (the caches inside the catalog client and safety classifier are
/// lock-guarded and append-only).
pub struct RecipePipeline {
    llm: Arc<dyn LlmClient>,
    model: String,
    prompts: PromptSet,
    catalog: CatalogClient,
    retriever: Arc<dyn PassageRetriever>,
    extractor: RecipeExtractor,
    safety: SafetyClassifier,
    config: PipelineConfig,
}

impl RecipePipeline {
    /// Assemble a pipeline from its collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        prompts: PromptSet,
        catalog: CatalogClient,
        retriever: Arc<dyn PassageRetriever>,
        extractor: RecipeExtractor,
        safety: SafetyClassifier,
        config: PipelineConfig,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            prompts,
            catalog,
            retriever,
            extractor,
            safety,
            config,
        }
    }

    /// Answer a free-text food query.
    ///
    /// Explicit `allergies`/`diet` overrides always take precedence over
    /// values inferred from the query text. A query with zero results after
    /// full degradation is `Ok(vec![])`, never an error; the only error
    /// surfaced here is the optional overall timeout elapsing.
    pub async fn run_query(
        &self,
        query: &str,
        allergies: &[String],
        diet: Option<&str>,
    ) -> AppResult<Vec<RecipeCandidate>> {
        match self.config.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.run_query_inner(query, allergies, diet))
                .await
                .map_err(|_| AppError::Pipeline(format!("Query timed out after {:?}", timeout)))?,
            None => self.run_query_inner(query, allergies, diet).await,
        }
    }

    async fn run_query_inner(
        &self,
        query: &str,
        allergies: &[String],
        diet: Option<&str>,
    ) -> AppResult<Vec<RecipeCandidate>> {
        tracing::info!("Running query: {}", query);

        let classification = classify(&self.llm, &self.model, &self.prompts, query, diet).await;
        let resolved_diet = classification.diet.clone();

        // The ingredients flow searches with the raw query text as the sole
        // ingredient term; the profile flow searches unconstrained. Diet is
        // always None on the wire: local filtering owns diet enforcement.
        let ingredients = match classification.intent {
            Intent::Ingredients => Some(vec![query.to_string()]),
            Intent::Profile => None,
        };

        // Catalog search and corpus retrieval are independent sources
        let (catalog_results, passages) = tokio::join!(
            self.catalog.search(
                ingredients,
                classification.meal_type.clone(),
                None,
                self.config.search_count,
            ),
            self.retriever.retrieve(query, self.config.retrieve_k),
        );

        let passages = passages.unwrap_or_else(|e| {
            tracing::warn!("Corpus retrieval failed, continuing without corpus: {}", e);
            Vec::new()
        });

        tracing::debug!(
            "Retrieved {} catalog candidates, {} corpus passages",
            catalog_results.len(),
            passages.len()
        );

        // Catalog branch: allergens, then diet, then tag
        let mut filtered = catalog_results;
        if !allergies.is_empty() {
            filtered = self.safety.filter_by_allergens(filtered, allergies).await;
        }
        if let Some(ref diet) = resolved_diet {
            filtered = self.safety.filter_by_diet(filtered, diet).await;
        }

        let mut results: Vec<RecipeCandidate> = filtered
            .into_iter()
            .map(|c| c.tagged(Origin::Catalog))
            .collect();

        // Corpus branch: extract, diet-filter each candidate as a singleton,
        // then tag. Corpus candidates are not allergen-filtered (known gap,
        // see DESIGN.md).
        let extracted = self.extractor.extract(&passages).await;
        for candidate in extracted {
            let kept = match resolved_diet {
                Some(ref diet) => {
                    let survivors = self.safety.filter_by_diet(vec![candidate], diet).await;
                    match survivors.into_iter().next() {
                        Some(candidate) => candidate,
                        None => continue,
                    }
                }
                None => candidate,
            };
            results.push(kept.tagged(Origin::Corpus));
        }

        tracing::info!("Query produced {} results", results.len());

        Ok(results)
    }
}
