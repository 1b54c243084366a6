//! Configuration loading, validation, and management for QueryDeck.
//!
//! Loads configuration from `~/.querydeck/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.querydeck/config.toml`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Gateway (HTTP server) configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Qdrant vector index configuration
    #[serde(default)]
    pub qdrant: QdrantConfig,

    /// Embedding/summarization sidecar configuration
    #[serde(default)]
    pub sidecar: SidecarConfig,

    /// Gemini generation configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Chunk store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Retrieval defaults
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("gateway", &self.gateway)
            .field("qdrant", &self.qdrant)
            .field("sidecar", &self.sidecar)
            .field("gemini", &self.gemini)
            .field("store", &self.store)
            .field("retrieval", &self.retrieval)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8085
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    #[serde(default = "default_qdrant_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_qdrant_url() -> String {
    "http://localhost:6333".into()
}
fn default_collection() -> String {
    "documents".into()
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: default_qdrant_url(),
            collection: default_collection(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidecarConfig {
    #[serde(default = "default_sidecar_url")]
    pub base_url: String,
}

fn default_sidecar_url() -> String {
    "http://localhost:8000".into()
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            base_url: default_sidecar_url(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; usually supplied via `GEMINI_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_gemini_url")]
    pub api_url: String,
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1/models/gemini-1.5-pro:generateContent".into()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_gemini_url(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend: "memory" or "postgres".
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Connection string, required for the postgres backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
}

fn default_store_backend() -> String {
    "memory".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            database_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Default number of passages to retrieve per query.
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.querydeck/config.toml).
    ///
    /// Environment variable overrides (highest priority):
    /// - `QUERYDECK_GEMINI_API_KEY` / `GEMINI_API_KEY`
    /// - `QUERYDECK_QDRANT_URL`
    /// - `QUERYDECK_SIDECAR_URL`
    /// - `DATABASE_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.gemini.api_key.is_none() {
            config.gemini.api_key = std::env::var("QUERYDECK_GEMINI_API_KEY")
                .ok()
                .or_else(|| std::env::var("GEMINI_API_KEY").ok());
        }

        if let Ok(url) = std::env::var("QUERYDECK_QDRANT_URL") {
            config.qdrant.url = url;
        }

        if let Ok(url) = std::env::var("QUERYDECK_SIDECAR_URL") {
            config.sidecar.base_url = url;
        }

        if config.store.database_url.is_none() {
            config.store.database_url = std::env::var("DATABASE_URL").ok();
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".querydeck")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.default_top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.default_top_k must be greater than 0".into(),
            ));
        }

        match self.store.backend.as_str() {
            "memory" => {}
            "postgres" => {
                if self.store.database_url.is_none()
                    && std::env::var("DATABASE_URL").is_err()
                {
                    return Err(ConfigError::ValidationError(
                        "store.backend = \"postgres\" requires store.database_url or DATABASE_URL"
                            .into(),
                    ));
                }
            }
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown store backend: {other}"
                )));
            }
        }

        if self.qdrant.collection.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "qdrant.collection cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if a generation API key is available.
    pub fn has_gemini_key(&self) -> bool {
        self.gemini.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
