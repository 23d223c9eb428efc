//! Recipe-aware chunking of cookbook text.
//!
//! A chunk boundary is a heading line whose following content begins with
//! `Serves` or `Ingredients:` (case-insensitive), the shape recipes take in
//! the source cookbooks. Text before the first boundary (front matter,
//! tables of contents) is discarded. Oversized blocks are re-split with
//! `text-splitter` so no chunk exceeds the configured size.

use ladle_core::config::CorpusSettings;
use ladle_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use text_splitter::{ChunkConfig, TextSplitter};

use crate::types::CorpusChunk;

/// Split a source document into recipe-sized chunks.
pub fn chunk_document(
    source_id: &str,
    text: &str,
    settings: &CorpusSettings,
) -> AppResult<Vec<CorpusChunk>> {
    let blocks = split_recipe_blocks(text);

    let chunk_config = ChunkConfig::new(settings.chunk_size as usize)
        .with_overlap(settings.chunk_overlap as usize)
        .map_err(|e| AppError::Corpus(format!("Invalid chunk configuration: {}", e)))?;
    let splitter = TextSplitter::new(chunk_config);

    let mut chunks = Vec::new();

    for block in blocks {
        if block.len() <= settings.chunk_size as usize {
            push_chunk(&mut chunks, source_id, &block);
        } else {
            for piece in splitter.chunks(&block) {
                if !piece.trim().is_empty() {
                    push_chunk(&mut chunks, source_id, piece);
                }
            }
        }
    }

    tracing::debug!(
        "Chunker created {} chunks from {} bytes of source '{}'",
        chunks.len(),
        text.len(),
        source_id
    );

    Ok(chunks)
}

fn push_chunk(chunks: &mut Vec<CorpusChunk>, source_id: &str, text: &str) {
    let position = chunks.len() as u32;
    chunks.push(CorpusChunk {
        id: chunk_id(source_id, position, text),
        source_id: source_id.to_string(),
        position,
        text: text.to_string(),
        embedding: None,
    });
}

/// Content-hash chunk id.
fn chunk_id(source_id: &str, position: u32, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_id.as_bytes());
    hasher.update(position.to_le_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Split text into recipe blocks at heading boundaries.
fn split_recipe_blocks(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut boundaries = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if is_recipe_heading(&lines, i) {
            boundaries.push(i);
        }
    }

    let mut blocks = Vec::new();
    for (n, &start) in boundaries.iter().enumerate() {
        let end = boundaries.get(n + 1).copied().unwrap_or(lines.len());
        let block = lines[start..end].join("\n").trim().to_string();
        if !block.is_empty() {
            blocks.push(block);
        }
    }

    blocks
}

/// A heading is a non-empty line whose next non-empty line starts with
/// "Serves" or "Ingredients:".
fn is_recipe_heading(lines: &[&str], i: usize) -> bool {
    let line = lines[i].trim();
    if line.is_empty() {
        return false;
    }

    // The heading itself must not be a recipe-body line
    let lower = line.to_lowercase();
    if lower.starts_with("serves") || lower.starts_with("ingredients:") {
        return false;
    }

    for next in lines.iter().skip(i + 1) {
        let next = next.trim().to_lowercase();
        if next.is_empty() {
            continue;
        }
        return next.starts_with("serves") || next.starts_with("ingredients:");
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CorpusSettings {
        CorpusSettings::default()
    }

    const COOKBOOK: &str = "\
Table of Contents
Soups ..... 4
Mains ..... 12

Minestrone Soup
Serves 4
Ingredients: beans, celery, tomato
Simmer everything for an hour.

Falafel Wrap
Ingredients: chickpeas, parsley, flatbread
Blend, fry, wrap.
";

    #[test]
    fn test_chunker_splits_at_recipe_headings() {
        let chunks = chunk_document("src-1", COOKBOOK, &settings()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.starts_with("Minestrone Soup"));
        assert!(chunks[1].text.starts_with("Falafel Wrap"));
    }

    #[test]
    fn test_front_matter_discarded() {
        let chunks = chunk_document("src-1", COOKBOOK, &settings()).unwrap();
        for chunk in &chunks {
            assert!(!chunk.text.contains("Table of Contents"));
        }
    }

    #[test]
    fn test_no_recipes_yields_no_chunks() {
        let chunks = chunk_document("src-1", "Just an essay about food.\n", &settings()).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_oversized_block_is_resplit() {
        let long_body = "Stir the pot. ".repeat(400);
        let text = format!("Endless Stew\nServes 8\nIngredients: patience\n{}", long_body);

        let chunks = chunk_document("src-1", &text, &settings()).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.len() <= settings().chunk_size as usize);
        }
    }

    #[test]
    fn test_chunk_ids_are_unique_and_positions_ordered() {
        let chunks = chunk_document("src-1", COOKBOOK, &settings()).unwrap();
        let mut ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), chunks.len());

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, i as u32);
        }
    }

    #[test]
    fn test_case_insensitive_markers() {
        let text = "Hearty Stew\nSERVES 6\nCook it well.\n";
        let chunks = chunk_document("src-1", text, &settings()).unwrap();
        assert_eq!(chunks.len(), 1);
    }
}
