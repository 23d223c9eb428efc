//! Passage retrieval over the corpus index.

use crate::embeddings::EmbeddingProvider;
use crate::index;
use ladle_core::config::CorpusSettings;
use ladle_core::AppResult;
use std::path::PathBuf;
use std::sync::Arc;

/// The retrieval interface the pipeline consumes.
///
/// Returns up to `k` relevant passages for a query. "No results" is an
/// empty list, never an error.
#[async_trait::async_trait]
pub trait PassageRetriever: Send + Sync {
    async fn retrieve(&self, query: &str, k: usize) -> AppResult<Vec<String>>;
}

/// Retriever over the SQLite corpus index.
///
/// The query is embedded with the same provider the index was built with
/// and matched by cosine similarity. An index that has not been built yet
/// retrieves as empty; only *building* against a missing source document
/// is an error.
pub struct IndexRetriever {
    db_path: PathBuf,
    provider: Arc<dyn EmbeddingProvider>,
}

impl IndexRetriever {
    /// Create a retriever over an index database.
    pub fn new(db_path: PathBuf, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { db_path, provider }
    }

    /// Create a retriever from corpus settings.
    pub fn from_settings(db_path: PathBuf, settings: &CorpusSettings) -> AppResult<Self> {
        let provider = crate::embeddings::create_provider(settings)?;
        Ok(Self::new(db_path, provider))
    }
}

#[async_trait::async_trait]
impl PassageRetriever for IndexRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> AppResult<Vec<String>> {
        if !self.db_path.exists() {
            tracing::debug!("Corpus index not built at {:?}, retrieving nothing", self.db_path);
            return Ok(Vec::new());
        }

        let query_embedding = self.provider.embed(query).await?;

        let conn = index::init_index(&self.db_path)?;
        let results = index::query_chunks(&conn, &query_embedding, k)?;

        tracing::debug!("Retrieved {} passages for query", results.len());

        Ok(results.into_iter().map(|(chunk, _score)| chunk.text).collect())
    }
}
