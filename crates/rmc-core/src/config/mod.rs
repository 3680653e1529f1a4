//! Configuration system for rmc.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{RmcError, RmcResult};
use crate::traits::{EmbedderConfig, EmbedderProvider, RelationStoreConfig};
use crate::types::RetrievalDefaults;

/// Retriever tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    /// Maximum number of direct matches taken from vector search.
    pub vector_limit: usize,
    /// Maximum in-flight neighbor fetches per BFS layer.
    pub expansion_concurrency: usize,
    /// Deadline for a single store call, in milliseconds.
    pub store_timeout_ms: u64,
    /// Deadline for a whole retrieval, in milliseconds.
    pub retrieve_timeout_ms: u64,
    /// Largest `max_depth` a caller may request.
    pub max_depth_limit: usize,
    /// Values for unset retrieval options.
    pub defaults: RetrievalDefaults,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            vector_limit: 5,
            expansion_concurrency: 4,
            store_timeout_ms: 2_000,
            retrieve_timeout_ms: 10_000,
            max_depth_limit: 6,
            defaults: RetrievalDefaults::default(),
        }
    }
}

impl RetrieverConfig {
    /// Deadline for a single store call.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Deadline for a whole retrieval.
    pub fn retrieve_timeout(&self) -> Duration {
        Duration::from_millis(self.retrieve_timeout_ms)
    }

    /// Validate configuration values are in valid ranges.
    pub fn validate(&self) -> RmcResult<()> {
        if self.vector_limit == 0 {
            return Err(RmcError::Configuration(
                "vector_limit must be at least 1".to_string(),
            ));
        }
        if self.expansion_concurrency == 0 {
            return Err(RmcError::Configuration(
                "expansion_concurrency must be at least 1".to_string(),
            ));
        }
        if self.store_timeout_ms == 0 || self.retrieve_timeout_ms == 0 {
            return Err(RmcError::Configuration(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.defaults.max_depth > self.max_depth_limit {
            return Err(RmcError::Configuration(format!(
                "default max_depth {} exceeds max_depth_limit {}",
                self.defaults.max_depth, self.max_depth_limit
            )));
        }
        if !(0.0..=1.0).contains(&self.defaults.min_confidence) {
            return Err(RmcError::Configuration(
                "default min_confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Embedder provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderProviderConfig {
    /// Provider type.
    pub provider: EmbedderProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: EmbedderConfig,
}

impl Default for EmbedderProviderConfig {
    fn default() -> Self {
        Self {
            provider: EmbedderProvider::OpenAI,
            config: EmbedderConfig::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RmcConfig {
    /// Retriever configuration.
    pub retriever: RetrieverConfig,
    /// Embedder configuration.
    pub embedder: EmbedderProviderConfig,
    /// Relation store configuration.
    pub relation_store: RelationStoreConfig,
}

impl RmcConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> RmcResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| RmcError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RmcError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| RmcError::Configuration(e.to_string()))?,
            _ => {
                return Err(RmcError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.retriever.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            config.embedder.config.api_key = Some(api_key);
        }
        if let Ok(provider) = std::env::var("RMC_EMBEDDER_PROVIDER") {
            config.embedder.provider = match provider.to_lowercase().as_str() {
                "ollama" => EmbedderProvider::Ollama,
                _ => EmbedderProvider::OpenAI,
            };
        }
        if let Ok(model) = std::env::var("RMC_EMBEDDER_MODEL") {
            config.embedder.config.model = model;
        }
        if let Some(dims) = env_number("RMC_EMBEDDER_DIMS") {
            config.embedder.config.embedding_dims = dims;
        }
        if let Ok(url) = std::env::var("RMC_EMBEDDER_BASE_URL") {
            config.embedder.config.base_url = Some(url);
        }

        if let Ok(path) = std::env::var("RMC_RELATION_DB_PATH") {
            config.relation_store.path = PathBuf::from(path);
        }

        if let Some(limit) = env_number("RMC_VECTOR_LIMIT") {
            config.retriever.vector_limit = limit;
        }
        if let Some(concurrency) = env_number("RMC_EXPANSION_CONCURRENCY") {
            config.retriever.expansion_concurrency = concurrency;
        }
        if let Some(ms) = env_number("RMC_STORE_TIMEOUT_MS") {
            config.retriever.store_timeout_ms = ms;
        }
        if let Some(ms) = env_number("RMC_RETRIEVE_TIMEOUT_MS") {
            config.retriever.retrieve_timeout_ms = ms;
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> RmcConfigBuilder {
        RmcConfigBuilder::default()
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable environment value");
            None
        }
    }
}

/// Builder for RmcConfig.
#[derive(Default)]
pub struct RmcConfigBuilder {
    config: RmcConfig,
}

impl RmcConfigBuilder {
    /// Set retriever configuration.
    pub fn retriever(mut self, config: RetrieverConfig) -> Self {
        self.config.retriever = config;
        self
    }

    /// Set embedder configuration.
    pub fn embedder(mut self, config: EmbedderProviderConfig) -> Self {
        self.config.embedder = config;
        self
    }

    /// Set relation store configuration.
    pub fn relation_store(mut self, config: RelationStoreConfig) -> Self {
        self.config.relation_store = config;
        self
    }

    /// Set the direct match cap.
    pub fn vector_limit(mut self, limit: usize) -> Self {
        self.config.retriever.vector_limit = limit;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> RmcResult<RmcConfig> {
        self.config.retriever.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = RetrieverConfig::default();
        assert_eq!(config.vector_limit, 5);
        assert_eq!(config.defaults.max_depth, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let zero_limit = RetrieverConfig {
            vector_limit: 0,
            ..Default::default()
        };
        assert!(zero_limit.validate().is_err());

        let zero_timeout = RetrieverConfig {
            store_timeout_ms: 0,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());

        let deep_default = RetrieverConfig {
            max_depth_limit: 1,
            ..Default::default()
        };
        assert!(deep_default.validate().is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[retriever]
vector_limit = 8
store_timeout_ms = 500

[retriever.defaults]
max_depth = 3

[embedder]
provider = "ollama"
model = "nomic-embed-text"
embedding_dims = 768

[relation_store]
path = ":memory:"
"#
        )
        .unwrap();

        let config = RmcConfig::from_file(file.path()).unwrap();
        assert_eq!(config.retriever.vector_limit, 8);
        assert_eq!(config.retriever.store_timeout_ms, 500);
        assert_eq!(config.retriever.expansion_concurrency, 4);
        assert_eq!(config.retriever.defaults.max_depth, 3);
        assert!((config.retriever.defaults.min_confidence - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.embedder.provider, EmbedderProvider::Ollama);
        assert_eq!(config.embedder.config.embedding_dims, 768);
        assert!(config.relation_store.is_in_memory());
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(RmcConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_builder_validates() {
        assert!(RmcConfig::builder().vector_limit(0).build().is_err());
        let config = RmcConfig::builder().vector_limit(10).build().unwrap();
        assert_eq!(config.retriever.vector_limit, 10);
    }
}
