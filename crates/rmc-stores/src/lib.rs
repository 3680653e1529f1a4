//! rmc-stores - Store implementations for rmc.
//!
//! This crate provides the stores the rmc retriever reads from:
//!
//! - [`MemoryVectorStore`]: in-process embeddings with cosine search
//! - [`SqliteRelationStore`] (feature: `embedded`) - typed relations
//!   persisted in SQLite and traversed through petgraph

mod memory;

#[cfg(feature = "embedded")]
pub mod embedded;

pub use memory::MemoryVectorStore;

#[cfg(feature = "embedded")]
pub use embedded::SqliteRelationStore;

// Re-export core types
pub use rmc_core::traits::{RelationStore, RelationStoreConfig, VectorStore};
