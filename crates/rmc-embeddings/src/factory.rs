//! Factory for creating embedding providers.

use std::sync::Arc;

use rmc_core::config::EmbedderProviderConfig;
use rmc_core::error::RmcResult;
use rmc_core::traits::{Embedder, EmbedderConfig, EmbedderProvider};

use crate::ollama::OllamaEmbedder;
use crate::openai::OpenAIEmbedder;

/// Factory for creating embedding providers.
pub struct EmbedderFactory;

impl EmbedderFactory {
    /// Create an embedder from the given configuration.
    pub fn create(provider: EmbedderProvider, config: EmbedderConfig) -> RmcResult<Arc<dyn Embedder>> {
        tracing::debug!(?provider, model = %config.model, dims = config.embedding_dims, "Creating embedder");
        match provider {
            EmbedderProvider::OpenAI => {
                let embedder = OpenAIEmbedder::new(config)?;
                Ok(Arc::new(embedder))
            }
            EmbedderProvider::Ollama => {
                let embedder = OllamaEmbedder::new(config)?;
                Ok(Arc::new(embedder))
            }
        }
    }

    /// Create an embedder from the `[embedder]` section of an `RmcConfig`.
    pub fn from_config(config: &EmbedderProviderConfig) -> RmcResult<Arc<dyn Embedder>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an OpenAI embedder with default configuration.
    pub fn openai() -> RmcResult<Arc<dyn Embedder>> {
        Self::create(EmbedderProvider::OpenAI, EmbedderConfig::default())
    }

    /// Create an OpenAI embedder with a specific model.
    pub fn openai_with_model(model: impl Into<String>, dims: usize) -> RmcResult<Arc<dyn Embedder>> {
        let config = EmbedderConfig {
            model: model.into(),
            embedding_dims: dims,
            ..Default::default()
        };
        Self::create(EmbedderProvider::OpenAI, config)
    }

    /// Create an Ollama embedder with default configuration.
    pub fn ollama() -> RmcResult<Arc<dyn Embedder>> {
        Self::ollama_with_model("nomic-embed-text", 768)
    }

    /// Create an Ollama embedder with a specific model.
    pub fn ollama_with_model(model: impl Into<String>, dims: usize) -> RmcResult<Arc<dyn Embedder>> {
        let config = EmbedderConfig {
            model: model.into(),
            embedding_dims: dims,
            ..Default::default()
        };
        Self::create(EmbedderProvider::Ollama, config)
    }
}
