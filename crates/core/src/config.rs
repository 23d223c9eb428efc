//! Configuration management for the ladle CLI.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (.ladle/config.yaml)
//!
//! The configuration is workspace-centric, with most state stored in `.ladle/`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// CLI behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .ladle/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Reasoning-service provider (e.g., "ollama", "openai")
    pub provider: String,

    /// Model identifier for the reasoning service
    pub model: String,

    /// API key for the reasoning-service provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Reasoning-service settings from config.yaml
    pub llm: LlmSettings,

    /// Remote catalog settings
    pub catalog: CatalogSettings,

    /// Corpus indexing/retrieval settings
    pub corpus: CorpusSettings,

    /// Pipeline orchestration settings
    pub pipeline: PipelineSettings,
}

/// Reasoning-service provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Provider identifier ("ollama", "openai")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Custom endpoint URL
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    #[serde(default, rename = "apiKeyEnv")]
    pub api_key_env: Option<String>,
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            endpoint: None,
            api_key_env: None,
        }
    }
}

/// Remote recipe catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Base URL of the catalog API
    #[serde(default = "default_catalog_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the catalog API key
    #[serde(default = "default_catalog_key_env", rename = "apiKeyEnv")]
    pub api_key_env: String,
}

fn default_catalog_endpoint() -> String {
    "https://spoonacular-recipe-food-nutrition-v1.p.rapidapi.com".to_string()
}

fn default_catalog_key_env() -> String {
    "CATALOG_API_KEY".to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            endpoint: default_catalog_endpoint(),
            api_key_env: default_catalog_key_env(),
        }
    }
}

/// Corpus indexing and retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSettings {
    /// Embedding provider ("trigram", "ollama")
    #[serde(default = "default_embedding_provider", rename = "embeddingProvider")]
    pub embedding_provider: String,

    /// Embedding model identifier
    #[serde(default = "default_embedding_model", rename = "embeddingModel")]
    pub embedding_model: String,

    /// Embedding vector dimension
    #[serde(default = "default_embedding_dim", rename = "embeddingDim")]
    pub embedding_dim: u32,

    /// Maximum chunk size in characters
    #[serde(default = "default_chunk_size", rename = "chunkSize")]
    pub chunk_size: u32,

    /// Overlap between oversized-chunk splits
    #[serde(default = "default_chunk_overlap", rename = "chunkOverlap")]
    pub chunk_overlap: u32,

    /// Number of passages to retrieve per query
    #[serde(default = "default_retrieve_k", rename = "retrieveK")]
    pub retrieve_k: u32,
}

fn default_embedding_provider() -> String {
    "trigram".to_string()
}

fn default_embedding_model() -> String {
    "trigram-v1".to_string()
}

fn default_embedding_dim() -> u32 {
    384
}

fn default_chunk_size() -> u32 {
    2500
}

fn default_chunk_overlap() -> u32 {
    200
}

fn default_retrieve_k() -> u32 {
    10
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            embedding_provider: default_embedding_provider(),
            embedding_model: default_embedding_model(),
            embedding_dim: default_embedding_dim(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            retrieve_k: default_retrieve_k(),
        }
    }
}

/// Pipeline orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Number of catalog search results to request
    #[serde(default = "default_search_count", rename = "searchCount")]
    pub search_count: u32,

    /// Overall per-query timeout in seconds (unset = bounded only by retry caps)
    #[serde(default, rename = "queryTimeoutSecs")]
    pub query_timeout_secs: Option<u64>,
}

fn default_search_count() -> u32 {
    5
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            search_count: default_search_count(),
            query_timeout_secs: None,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSettings>,
    catalog: Option<CatalogSettings>,
    corpus: Option<CorpusSettings>,
    pipeline: Option<PipelineSettings>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: LlmSettings::default(),
            catalog: CatalogSettings::default(),
            corpus: CorpusSettings::default(),
            pipeline: PipelineSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `LADLE_WORKSPACE`: Override workspace path
    /// - `LADLE_CONFIG`: Path to config file
    /// - `LADLE_PROVIDER`: Reasoning-service provider
    /// - `LADLE_MODEL`: Model identifier
    /// - `LADLE_API_KEY`: Reasoning-service API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("LADLE_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("LADLE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            config.workspace.join(".ladle/config.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("LADLE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("LADLE_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("LADLE_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.provider.clone();
            result.model = llm.model.clone();
            result.llm = llm;
        }

        if let Some(catalog) = config_file.catalog {
            result.catalog = catalog;
        }

        if let Some(corpus) = config_file.corpus {
            result.corpus = corpus;
        }

        if let Some(pipeline) = config_file.pipeline {
            result.pipeline = pipeline;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .ladle directory.
    pub fn ladle_dir(&self) -> PathBuf {
        self.workspace.join(".ladle")
    }

    /// Get the path to the corpus index database.
    pub fn corpus_index_path(&self) -> PathBuf {
        self.ladle_dir().join("corpus/index.db")
    }

    /// Ensure the .ladle directory exists.
    pub fn ensure_ladle_dir(&self) -> AppResult<()> {
        let ladle_dir = self.ladle_dir();
        if !ladle_dir.exists() {
            std::fs::create_dir_all(&ladle_dir).map_err(|e| {
                AppError::Config(format!("Failed to create .ladle directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Resolve the reasoning-service API key.
    ///
    /// `LADLE_API_KEY` wins; otherwise the configured `apiKeyEnv` variable
    /// is consulted.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        if let Some(ref env_var) = self.llm.api_key_env {
            if let Ok(key) = std::env::var(env_var) {
                return Some(key);
            }
        }

        None
    }

    /// Resolve the catalog API key from the configured environment variable.
    ///
    /// A missing key is a permanent configuration error: it is raised here,
    /// at startup, and never handled by the retry path.
    pub fn resolve_catalog_key(&self) -> AppResult<String> {
        std::env::var(&self.catalog.api_key_env).map_err(|_| {
            AppError::Config(format!(
                "Catalog API key not found in environment variable: {}",
                self.catalog.api_key_env
            ))
        })
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama", "openai"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        // Ollama runs locally and needs no API key
        if self.provider == "openai" && self.resolve_api_key().is_none() {
            return Err(AppError::Config(
                "OpenAI provider requires an API key (LADLE_API_KEY or llm.apiKeyEnv)".to_string(),
            ));
        }

        Ok(())
    }
}
