//! Collaborator traits the retriever depends on.

mod embedder;
mod relation_store;
mod vector_store;

pub use embedder::*;
pub use relation_store::*;
pub use vector_store::*;
