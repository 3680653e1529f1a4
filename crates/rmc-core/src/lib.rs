//! rmc-core - Core library for rmc.
//!
//! This crate provides the types, collaborator traits, and the hybrid
//! [`Retriever`] that combines vector search with relation-graph traversal.
//!
//! # Example
//!
//! ```ignore
//! use rmc_core::{RetrievalOptions, RelationType, Retriever};
//!
//! let retriever = Retriever::new(embedder, vector_store, relation_store);
//!
//! let options = RetrievalOptions::new()
//!     .with_max_depth(2)
//!     .with_relation_types([RelationType::Causes, RelationType::Impacts]);
//! let result = retriever.retrieve("why did the deploy fail?", &options).await?;
//!
//! for path in &result.inference_paths {
//!     println!("{} ({:.2})", path.description, path.confidence);
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod retrieval;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{RetrieverConfig, RmcConfig};
pub use error::{ErrorCode, RmcError, RmcResult};
pub use events::{EventBus, NoopObserver, RetrievalEvent, RetrievalObserver, TracingObserver};
pub use retrieval::Retriever;
pub use traits::{Embedder, EmbedderConfig, EmbedderProvider, RelationStore, VectorStore};
pub use types::{
    GraphContext, InferencePath, MemoryNode, Neighbor, PathType, RelationEdge, RelationType,
    RetrievalOptions, RetrievalResult,
};
