//! Corpus command handler.
//!
//! Builds and inspects the local recipe corpus index.

use clap::{Args, Subcommand};
use ladle_core::{config::AppConfig, AppResult};
use ladle_corpus::LearnOptions;
use std::path::PathBuf;

/// Corpus index management
#[derive(Args, Debug)]
pub struct CorpusCommand {
    #[command(subcommand)]
    pub action: CorpusAction,
}

#[derive(Subcommand, Debug)]
pub enum CorpusAction {
    /// Build the index from cookbook documents
    Learn(CorpusLearnCommand),
    /// Show index statistics
    Stats(CorpusStatsCommand),
    /// Remove the index
    Clean(CorpusCleanCommand),
}

impl CorpusCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            CorpusAction::Learn(cmd) => cmd.execute(config).await,
            CorpusAction::Stats(cmd) => cmd.execute(config).await,
            CorpusAction::Clean(cmd) => cmd.execute(config).await,
        }
    }
}

/// Build the index from cookbook documents
#[derive(Args, Debug)]
pub struct CorpusLearnCommand {
    /// Files or directories to index
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Reset the index before building
    #[arg(long)]
    pub reset: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CorpusLearnCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing corpus learn command");

        let options = LearnOptions {
            paths: self.paths.clone(),
            reset: self.reset,
        };

        let stats =
            ladle_corpus::learn(&config.corpus_index_path(), &config.corpus, &options).await?;

        if self.json {
            let output = serde_json::json!({
                "sourcesCount": stats.sources_count,
                "chunksCount": stats.chunks_count,
                "bytesProcessed": stats.bytes_processed,
                "durationSecs": stats.duration_secs,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Indexed {} sources ({} chunks, {} bytes) in {:.2}s",
                stats.sources_count, stats.chunks_count, stats.bytes_processed, stats.duration_secs
            );
        }

        Ok(())
    }
}

/// Show index statistics
#[derive(Args, Debug)]
pub struct CorpusStatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CorpusStatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let (sources, chunks) = ladle_corpus::stats(&config.corpus_index_path())?;

        if self.json {
            let output = serde_json::json!({
                "sourcesCount": sources,
                "chunksCount": chunks,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Corpus index: {} sources, {} chunks", sources, chunks);
        }

        Ok(())
    }
}

/// Remove the index
#[derive(Args, Debug)]
pub struct CorpusCleanCommand {}

impl CorpusCleanCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        ladle_corpus::clean(&config.corpus_index_path())?;
        println!("Corpus index removed");
        Ok(())
    }
}
