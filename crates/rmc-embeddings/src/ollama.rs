//! Ollama embedding provider implementation.

use async_trait::async_trait;

use rmc_core::error::{RmcError, RmcResult};
use rmc_core::traits::{ensure_dimension, Embedder, EmbedderConfig};

#[cfg(feature = "ollama")]
use ollama_rs::{generation::embeddings::request::GenerateEmbeddingsRequest, Ollama};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama embedding provider.
pub struct OllamaEmbedder {
    #[cfg(feature = "ollama")]
    client: Ollama,
    config: EmbedderConfig,
    host: String,
    port: u16,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder.
    pub fn new(config: EmbedderConfig) -> RmcResult<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        let url = url::Url::parse(&base_url)
            .map_err(|e| RmcError::Configuration(format!("Invalid Ollama URL: {}", e)))?;

        let host = format!("{}://{}", url.scheme(), url.host_str().unwrap_or("localhost"));
        let port = url.port().unwrap_or(11434);

        #[cfg(feature = "ollama")]
        let client = Ollama::new(host.clone(), port);

        Ok(Self {
            #[cfg(feature = "ollama")]
            client,
            config,
            host,
            port,
        })
    }

    /// Server address requests are sent to.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Take the single vector out of a batch response and check its length.
#[cfg_attr(not(feature = "ollama"), allow(dead_code))]
fn first_embedding(batch: Vec<Vec<f32>>, expected: usize) -> RmcResult<Vec<f32>> {
    let embedding = batch
        .into_iter()
        .next()
        .ok_or_else(|| RmcError::embedding("No embedding returned"))?;

    ensure_dimension(embedding, expected)
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[cfg(feature = "ollama")]
    async fn embed(&self, text: &str) -> RmcResult<Vec<f32>> {
        let request = GenerateEmbeddingsRequest::new(self.config.model.clone(), text.into());

        let response = self
            .client
            .generate_embeddings(request)
            .await
            .map_err(|e| RmcError::embedding(format!("Ollama embedding error: {}", e)))?;

        first_embedding(response.embeddings, self.config.embedding_dims)
    }

    #[cfg(not(feature = "ollama"))]
    async fn embed(&self, _text: &str) -> RmcResult<Vec<f32>> {
        Err(RmcError::Configuration(
            "Ollama feature not enabled. Enable the 'ollama' feature.".to_string(),
        ))
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dims
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
