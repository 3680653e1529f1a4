//! Embedder trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{RmcError, RmcResult};

/// Core Embedder trait - all embedding providers implement this.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate the embedding for a single text.
    async fn embed(&self, text: &str) -> RmcResult<Vec<f32>>;

    /// Dimension every returned vector has.
    fn dimension(&self) -> usize;

    /// Model name.
    fn model_name(&self) -> &str;
}

/// Check that a provider returned a vector of the configured dimension.
pub fn ensure_dimension(embedding: Vec<f32>, expected: usize) -> RmcResult<Vec<f32>> {
    if embedding.is_empty() {
        return Err(RmcError::embedding("Provider returned an empty embedding"));
    }
    if embedding.len() != expected {
        return Err(RmcError::dimension_mismatch(expected, embedding.len()));
    }
    Ok(embedding)
}

/// Embedder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Model name/identifier.
    pub model: String,
    /// Embedding dimensions.
    #[serde(default = "default_embedding_dims")]
    pub embedding_dims: usize,
    /// API key (if not using environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_embedding_dims() -> usize {
    1536
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            embedding_dims: default_embedding_dims(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Embedder provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderProvider {
    #[default]
    OpenAI,
    Ollama,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dimension() {
        assert!(ensure_dimension(vec![0.1, 0.2], 2).is_ok());
        assert!(ensure_dimension(vec![], 2).is_err());

        let err = ensure_dimension(vec![0.1], 2).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::EmbDimensionMismatch);
    }
}
