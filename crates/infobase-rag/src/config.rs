//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Lang;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Embeddings provider (Voyage AI)
    pub embeddings: EmbeddingConfig,
    /// Chat-completion provider (Anthropic)
    pub llm: LlmConfig,
    /// Vector index location and search settings
    pub index: IndexConfig,
    /// Query cache TTL and sweep interval
    pub cache: CacheConfig,
    /// Scraping and index building
    pub ingest: IngestConfig,
    /// Query validation and answer filters
    pub moderation: ModerationConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl RagConfig {
    /// Load configuration.
    ///
    /// Reads `.env` from the working directory if present, then the TOML file
    /// at `path` (defaults when `None`), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Failed to read .env: {}", e);
            }
        }

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Apply environment overrides from a lookup function
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("VOYAGE_API_KEY") {
            self.embeddings.api_key = key;
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(host) = lookup("INFOBASE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("INFOBASE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::config(format!("INFOBASE_PORT is not a port: {}", port)))?;
        }
        Ok(())
    }

    /// Check settings needed to answer queries
    pub fn validate(&self) -> Result<()> {
        if self.embeddings.api_key.trim().is_empty() {
            return Err(Error::config("VOYAGE_API_KEY is not set"));
        }
        if self.llm.api_key.trim().is_empty() {
            return Err(Error::config("ANTHROPIC_API_KEY is not set"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(Error::config("cache.ttl_secs must be positive"));
        }
        if self.cache.sweep_interval_secs == 0 {
            return Err(Error::config("cache.sweep_interval_secs must be positive"));
        }
        if self.index.top_k == 0 {
            return Err(Error::config("index.top_k must be positive"));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5555,
            enable_cors: true,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// API base URL
    pub base_url: String,
    /// API key (usually from `VOYAGE_API_KEY`)
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Embedding dimensions (1536 for voyage-large-2)
    pub dimensions: usize,
    /// Texts per embedding request
    pub batch_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.voyageai.com".to_string(),
            api_key: String::new(),
            model: "voyage-large-2".to_string(),
            dimensions: 1536,
            batch_size: 20,
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// LLM (Anthropic) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// API key (usually from `ANTHROPIC_API_KEY`)
    #[serde(skip_serializing)]
    pub api_key: String,
    /// `anthropic-version` header
    pub api_version: String,
    /// Generation model name
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            api_version: "2023-06-01".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 1024,
            temperature: 0.0, // Summaries should stick to the extract
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Merged English index directory
    pub path: PathBuf,
    /// Merged French index directory. French queries use the English
    /// index when unset.
    pub fr_path: Option<PathBuf>,
    /// Number of extracts retrieved per query
    pub top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./processed/vectorstore_merged"),
            fr_path: None,
            top_k: 4,
        }
    }
}

impl IndexConfig {
    /// Index directory for a request language
    pub fn path_for(&self, lang: Lang) -> &Path {
        match (lang, &self.fr_path) {
            (Lang::Fr, Some(path)) => path,
            _ => &self.path,
        }
    }
}

/// Query cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Age in seconds after which a cached query is swept
    pub ttl_secs: u64,
    /// Seconds between sweeps
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 10,
            sweep_interval_secs: 30,
        }
    }
}

/// Scraping and index-building configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Article catalogue (JSON list of article metadata)
    pub catalogue_url: String,
    /// French article listing page, an alternative to the JSON catalogue
    pub listing_url: String,
    /// Where scraped articles are written
    pub articles_path: PathBuf,
    /// Directory receiving partial and merged indexes
    pub output_dir: PathBuf,
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Pause between article downloads, in milliseconds
    pub request_delay_ms: u64,
    /// Pause between embedding batches, in milliseconds
    pub batch_delay_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            catalogue_url: "https://health-infobase.canada.ca/src/json/articles.json".to_string(),
            listing_url: "https://sante-infobase.canada.ca".to_string(),
            articles_path: PathBuf::from("./unprocessed/articles.json"),
            output_dir: PathBuf::from("./processed"),
            chunk_size: 5000,
            chunk_overlap: 0,
            request_delay_ms: 500,
            batch_delay_ms: 5000, // Provider rate limits
        }
    }
}

/// Query validation and answer filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Longest accepted query, in characters
    pub max_query_chars: usize,
    /// Answers must be strictly longer than this, in characters
    pub min_answer_chars: usize,
    /// Words added to the bundled profanity list
    pub extra_profanity: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            max_query_chars: 300,
            min_answer_chars: 100,
            extra_profanity: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub filter: String,
    /// Also write logs to this file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "infobase_rag=info,tower_http=info".to_string(),
            file: None,
        }
    }
}
