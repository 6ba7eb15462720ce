use crate::error::RfqMatchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// RFQ matcher application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Embedding provider API key
    #[serde(default, skip_serializing)]
    pub openai_api_key: String,

    /// Embedding provider base URL (OpenAI-compatible)
    pub openai_base_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Expected embedding dimension, if pinned
    pub embedding_dimensions: Option<usize>,

    /// Per-request timeout for the embedding provider
    pub embed_timeout_secs: u64,

    /// Maximum attempts per embedding request
    pub embed_max_retries: u32,

    /// In-flight embedding requests while building the catalog index
    pub embed_concurrency: usize,

    /// Catalog CSV path
    pub catalog_path: PathBuf,

    /// Name of the optional quantity column in the catalog
    pub catalog_quantity_column: String,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            embedding_dimensions: None,
            embed_timeout_secs: 30,
            embed_max_retries: 3,
            embed_concurrency: 4,
            catalog_path: PathBuf::from("SKU_list_of_23-24.csv"),
            catalog_quantity_column: "Monthly Quantity".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 5000,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, RfqMatchError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or(defaults.openai_base_url),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or(defaults.embedding_model),
            embedding_dimensions: Self::get_env_parsed("EMBEDDING_DIMENSIONS"),
            embed_timeout_secs: Self::get_env_parsed("EMBED_TIMEOUT_SECS")
                .unwrap_or(defaults.embed_timeout_secs),
            embed_max_retries: Self::get_env_parsed("EMBED_MAX_RETRIES")
                .unwrap_or(defaults.embed_max_retries),
            embed_concurrency: Self::get_env_parsed("EMBED_CONCURRENCY")
                .unwrap_or(defaults.embed_concurrency),
            catalog_path: Self::get_env_path("CATALOG_PATH")
                .unwrap_or(defaults.catalog_path),
            catalog_quantity_column: std::env::var("CATALOG_QUANTITY_COLUMN")
                .unwrap_or(defaults.catalog_quantity_column),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT")
                .unwrap_or(defaults.server_port),
            log_dir: Self::get_env_path("LOG_DIR")
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or(defaults.log_level),
        };

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Parse a value from environment variable, ignoring malformed input
    fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Embedding request timeout
    pub fn embed_timeout(&self) -> Duration {
        Duration::from_secs(self.embed_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), RfqMatchError> {
        if self.openai_api_key.trim().is_empty() {
            return Err(RfqMatchError::config("OPENAI_API_KEY is not set"));
        }

        if !self.openai_base_url.starts_with("http://")
            && !self.openai_base_url.starts_with("https://") {
            return Err(RfqMatchError::config(
                "OpenAI base URL must start with http:// or https://"
            ));
        }

        if self.embedding_model.trim().is_empty() {
            return Err(RfqMatchError::config("Embedding model name cannot be empty"));
        }

        if self.embedding_dimensions == Some(0) {
            return Err(RfqMatchError::config("Embedding dimensions cannot be 0"));
        }

        if self.embed_timeout_secs == 0 {
            return Err(RfqMatchError::config("Embedding timeout cannot be 0"));
        }

        if self.embed_max_retries == 0 {
            return Err(RfqMatchError::config("Embedding retries must be at least 1"));
        }

        if self.embed_concurrency == 0 {
            return Err(RfqMatchError::config("Embedding concurrency must be at least 1"));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(RfqMatchError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}
