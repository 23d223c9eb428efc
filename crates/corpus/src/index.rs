//! SQLite-backed vector index for corpus chunks.

use crate::types::{CorpusChunk, CorpusSource};
use ladle_core::{AppError, AppResult};
use rusqlite::{params, Connection};
use std::path::Path;

/// Initialize the SQLite index database.
pub fn init_index(db_path: &Path) -> AppResult<Connection> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::Corpus(format!("Failed to create index directory: {}", e)))?;
    }

    let conn = Connection::open(db_path)
        .map_err(|e| AppError::Corpus(format!("Failed to open SQLite index: {}", e)))?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sources (
            id TEXT PRIMARY KEY,
            path TEXT NOT NULL,
            indexed_at TEXT NOT NULL,
            chunk_count INTEGER NOT NULL,
            byte_count INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS chunks (
            id TEXT PRIMARY KEY,
            source_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            embedding BLOB NOT NULL,
            FOREIGN KEY (source_id) REFERENCES sources(id)
        );

        CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source_id);
        "#,
    )
    .map_err(|e| AppError::Corpus(format!("Failed to create tables: {}", e)))?;

    tracing::debug!("Initialized SQLite index at {:?}", db_path);
    Ok(conn)
}

/// Insert a source into the index.
pub fn insert_source(conn: &Connection, source: &CorpusSource) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO sources (id, path, indexed_at, chunk_count, byte_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            source.source_id,
            source.path,
            source.indexed_at.to_rfc3339(),
            source.chunk_count,
            source.byte_count,
        ],
    )
    .map_err(|e| AppError::Corpus(format!("Failed to insert source: {}", e)))?;

    Ok(())
}

/// Insert a chunk with its embedding into the index.
pub fn insert_chunk(conn: &Connection, chunk: &CorpusChunk) -> AppResult<()> {
    let embedding = chunk
        .embedding
        .as_ref()
        .ok_or_else(|| AppError::Corpus(format!("Chunk '{}' has no embedding", chunk.id)))?;

    conn.execute(
        "INSERT OR REPLACE INTO chunks (id, source_id, position, text, embedding)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            chunk.id,
            chunk.source_id,
            chunk.position,
            chunk.text,
            embedding_to_bytes(embedding),
        ],
    )
    .map_err(|e| AppError::Corpus(format!("Failed to insert chunk: {}", e)))?;

    Ok(())
}

/// Query the top-k most similar chunks to the query embedding.
///
/// Returns chunks ordered by descending cosine similarity.
pub fn query_chunks(
    conn: &Connection,
    query_embedding: &[f32],
    top_k: usize,
) -> AppResult<Vec<(CorpusChunk, f32)>> {
    let mut stmt = conn
        .prepare("SELECT id, source_id, position, text, embedding FROM chunks")
        .map_err(|e| AppError::Corpus(format!("Failed to prepare query: {}", e)))?;

    let rows = stmt
        .query_map([], |row| {
            let embedding_bytes: Vec<u8> = row.get(4)?;
            Ok(CorpusChunk {
                id: row.get(0)?,
                source_id: row.get(1)?,
                position: row.get(2)?,
                text: row.get(3)?,
                embedding: Some(bytes_to_embedding(&embedding_bytes)),
            })
        })
        .map_err(|e| AppError::Corpus(format!("Failed to query chunks: {}", e)))?;

    let mut scored = Vec::new();
    for row in rows {
        let chunk = row.map_err(|e| AppError::Corpus(format!("Failed to read chunk: {}", e)))?;
        let score = chunk
            .embedding
            .as_ref()
            .map(|e| cosine_similarity(query_embedding, e))
            .unwrap_or(0.0);
        scored.push((chunk, score));
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);

    Ok(scored)
}

/// Get statistics about the index.
///
/// Returns (sources_count, chunks_count).
pub fn get_stats(conn: &Connection) -> AppResult<(u32, u32)> {
    let sources: u32 = conn
        .query_row("SELECT COUNT(*) FROM sources", [], |row| row.get(0))
        .map_err(|e| AppError::Corpus(format!("Failed to count sources: {}", e)))?;

    let chunks: u32 = conn
        .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
        .map_err(|e| AppError::Corpus(format!("Failed to count chunks: {}", e)))?;

    Ok((sources, chunks))
}

/// Reset the index, removing all chunks and sources.
pub fn reset_index(conn: &Connection) -> AppResult<()> {
    conn.execute_batch("DELETE FROM chunks; DELETE FROM sources;")
        .map_err(|e| AppError::Corpus(format!("Failed to reset index: {}", e)))?;
    Ok(())
}

/// Serialize an embedding as little-endian f32 bytes.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Deserialize little-endian f32 bytes into an embedding.
fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_chunk(id: &str, position: u32, text: &str, embedding: Vec<f32>) -> CorpusChunk {
        CorpusChunk {
            id: id.to_string(),
            source_id: "src-1".to_string(),
            position,
            text: text.to_string(),
            embedding: Some(embedding),
        }
    }

    #[test]
    fn test_init_index_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let conn = init_index(&dir.path().join("index.db")).unwrap();
        assert_eq!(get_stats(&conn).unwrap(), (0, 0));
    }

    #[test]
    fn test_insert_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let conn = init_index(&dir.path().join("index.db")).unwrap();

        let source = CorpusSource {
            source_id: "src-1".to_string(),
            path: "cookbook.txt".to_string(),
            indexed_at: Utc::now(),
            chunk_count: 2,
            byte_count: 100,
        };
        insert_source(&conn, &source).unwrap();

        insert_chunk(&conn, &test_chunk("c1", 0, "minestrone", vec![1.0, 0.0, 0.0])).unwrap();
        insert_chunk(&conn, &test_chunk("c2", 1, "falafel", vec![0.0, 1.0, 0.0])).unwrap();

        assert_eq!(get_stats(&conn).unwrap(), (1, 2));

        let results = query_chunks(&conn, &[1.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.text, "minestrone");
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_query_respects_top_k() {
        let dir = tempfile::tempdir().unwrap();
        let conn = init_index(&dir.path().join("index.db")).unwrap();

        for i in 0..5 {
            insert_chunk(
                &conn,
                &test_chunk(&format!("c{}", i), i, "text", vec![1.0, 0.0]),
            )
            .unwrap();
        }

        let results = query_chunks(&conn, &[1.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_chunk_without_embedding_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let conn = init_index(&dir.path().join("index.db")).unwrap();

        let mut chunk = test_chunk("c1", 0, "text", vec![]);
        chunk.embedding = None;
        assert!(insert_chunk(&conn, &chunk).is_err());
    }

    #[test]
    fn test_reset_index() {
        let dir = tempfile::tempdir().unwrap();
        let conn = init_index(&dir.path().join("index.db")).unwrap();

        insert_chunk(&conn, &test_chunk("c1", 0, "text", vec![1.0])).unwrap();
        reset_index(&conn).unwrap();
        assert_eq!(get_stats(&conn).unwrap(), (0, 0));
    }

    #[test]
    fn test_embedding_bytes_roundtrip() {
        let embedding = vec![0.5, -1.25, 3.75];
        let bytes = embedding_to_bytes(&embedding);
        assert_eq!(bytes_to_embedding(&bytes), embedding);
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }
}
