//! Corpus type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A source document indexed into the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSource {
    /// Unique source identifier
    pub source_id: String,

    /// Source file path
    pub path: String,

    /// When this source was indexed
    pub indexed_at: DateTime<Utc>,

    /// Number of chunks created from this source
    pub chunk_count: u32,

    /// Source size in bytes
    pub byte_count: u64,
}

/// A recipe-sized text chunk with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusChunk {
    /// Unique chunk identifier (content hash)
    pub id: String,

    /// Owning source id
    pub source_id: String,

    /// Position of the chunk within its source
    pub position: u32,

    /// Chunk text
    pub text: String,

    /// Embedding vector (present once embedded)
    pub embedding: Option<Vec<f32>>,
}

/// Statistics returned by an index build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnStats {
    /// Number of sources indexed
    pub sources_count: u32,

    /// Number of chunks created
    pub chunks_count: u32,

    /// Total bytes processed
    pub bytes_processed: u64,

    /// Wall-clock duration of the build
    pub duration_secs: f64,
}

/// Options for an index build.
#[derive(Debug, Clone, Default)]
pub struct LearnOptions {
    /// Files or directories to index
    pub paths: Vec<std::path::PathBuf>,

    /// Reset the index before building
    pub reset: bool,
}
