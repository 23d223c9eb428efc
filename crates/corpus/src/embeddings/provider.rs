//! Embedding provider trait and factory.

use ladle_core::config::CorpusSettings;
use ladle_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "trigram", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Corpus("No embedding returned".to_string()))
    }
}

/// Create an embedding provider from corpus settings.
pub fn create_provider(settings: &CorpusSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.embedding_provider.as_str() {
        "trigram" => {
            let provider =
                super::providers::trigram::TrigramProvider::new(settings.embedding_dim as usize);
            Ok(Arc::new(provider))
        }

        "ollama" => {
            let provider = super::providers::ollama::OllamaProvider::new(
                settings.embedding_model.clone(),
                settings.embedding_dim as usize,
            );
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Corpus(format!(
            "Unknown embedding provider: '{}'. Supported providers: trigram, ollama",
            settings.embedding_provider
        ))),
    }
}
