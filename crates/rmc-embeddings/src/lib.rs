//! rmc-embeddings - Embedding provider implementations for rmc.
//!
//! This crate provides the query embedders the rmc retriever calls before
//! vector search. Every provider checks the returned vector against its
//! configured dimension.
//!
//! # Supported Providers
//!
//! - **OpenAI** (feature: `openai`) - text-embedding-3-small, text-embedding-3-large, etc.
//! - **Ollama** (feature: `ollama`) - Local embedding models via Ollama
//!
//! # Example
//!
//! ```ignore
//! use rmc_embeddings::EmbedderFactory;
//!
//! // Create an OpenAI embedder
//! let embedder = EmbedderFactory::openai()?;
//!
//! // Or with a specific model
//! let embedder = EmbedderFactory::openai_with_model("text-embedding-3-large", 3072)?;
//!
//! // Create an Ollama embedder
//! let embedder = EmbedderFactory::ollama_with_model("nomic-embed-text", 768)?;
//! ```

mod factory;
mod ollama;
mod openai;

pub use factory::EmbedderFactory;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAIEmbedder;

// Re-export core types for convenience
pub use rmc_core::traits::{Embedder, EmbedderConfig, EmbedderProvider};
