//! Query command handler.
//!
//! Assembles the process-wide pipeline context (reasoning-service client,
//! catalog client, retriever, shared caches) and runs one query through it.

use clap::Args;
use ladle_catalog::{CatalogClient, DetailCache, HttpCatalogApi};
use ladle_core::{config::AppConfig, AppResult, RecipeCandidate};
use ladle_corpus::{IndexRetriever, RecipeExtractor};
use ladle_llm::create_client;
use ladle_pipeline::{AllergenCache, PipelineConfig, RecipePipeline, SafetyClassifier};
use ladle_prompt::PromptSet;
use std::sync::Arc;
use std::time::Duration;

/// Answer a free-text food query
#[derive(Args, Debug)]
pub struct QueryCommand {
    /// The query text (e.g., "chicken soup")
    pub query: String,

    /// Declared food allergies (repeatable)
    #[arg(short, long = "allergy")]
    pub allergies: Vec<String>,

    /// Diet preference (vegetarian, vegan, pescetarian, gluten-free, ...)
    #[arg(short, long)]
    pub diet: Option<String>,

    /// Number of catalog results to request
    #[arg(long)]
    pub count: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl QueryCommand {
    /// Execute the query command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing query command");
        tracing::debug!("Query command options: {:?}", self);

        config.validate()?;

        let pipeline = build_pipeline(config, self.count)?;

        // Explicit overrides are normalized the way the original inputs
        // were: lowercased, empty entries dropped
        let allergies: Vec<String> = self
            .allergies
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        let diet = self
            .diet
            .as_deref()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty());

        let results = pipeline
            .run_query(&self.query, &allergies, diet.as_deref())
            .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            print_markdown(&results);
        }

        Ok(())
    }
}

/// Assemble the pipeline with its process-wide caches.
fn build_pipeline(config: &AppConfig, count: Option<u32>) -> AppResult<RecipePipeline> {
    let api_key = config.resolve_api_key();
    let llm = create_client(
        &config.provider,
        config.llm.endpoint.as_deref(),
        api_key.as_deref(),
    )?;

    let prompts = PromptSet::load(&config.workspace)?;

    // Missing catalog credentials surface here, before any query runs
    let catalog_api = HttpCatalogApi::from_settings(&config.catalog)?;
    let catalog = CatalogClient::new(Arc::new(catalog_api), DetailCache::new());

    let retriever = IndexRetriever::from_settings(config.corpus_index_path(), &config.corpus)?;

    let extractor = RecipeExtractor::new(Arc::clone(&llm), &config.model, prompts.clone());

    let safety = SafetyClassifier::new(
        Arc::clone(&llm),
        &config.model,
        prompts.clone(),
        AllergenCache::new(),
    );

    let pipeline_config = PipelineConfig {
        search_count: count.unwrap_or(config.pipeline.search_count),
        retrieve_k: config.corpus.retrieve_k as usize,
        query_timeout: config.pipeline.query_timeout_secs.map(Duration::from_secs),
    };

    Ok(RecipePipeline::new(
        llm,
        &config.model,
        prompts,
        catalog,
        Arc::new(retriever),
        extractor,
        safety,
        pipeline_config,
    ))
}

/// Render results as markdown, one block per recipe.
fn print_markdown(results: &[RecipeCandidate]) {
    if results.is_empty() {
        println!("No recipes found matching your filters.");
        return;
    }

    for recipe in results {
        let origin = recipe
            .origin
            .map(|o| o.as_str())
            .unwrap_or("unknown");

        match &recipe.source_url {
            Some(url) => println!("### [{}]({}) ({})", recipe.name, url, origin),
            None => println!("### {} ({})", recipe.name, origin),
        }

        if let Some(calories) = recipe.calories {
            println!("{} kcal", calories);
        }

        if !recipe.ingredients.is_empty() {
            println!("**Ingredients:**");
            for ingredient in &recipe.ingredients {
                println!("- {}", ingredient);
            }
        }

        if let Some(ref instructions) = recipe.instructions {
            println!("{}", instructions);
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladle_core::Origin;

    #[test]
    fn test_print_markdown_empty_does_not_panic() {
        print_markdown(&[]);
    }

    #[test]
    fn test_print_markdown_with_results_does_not_panic() {
        let mut recipe = RecipeCandidate::new("Tomato Soup", vec!["tomato".to_string()]);
        recipe.source_url = Some("https://example.com/1".to_string());
        recipe.calories = Some(180);
        print_markdown(&[recipe.tagged(Origin::Catalog)]);
    }
}
