//! Hybrid retrieval pipeline.
//!
//! Vector search finds the direct matches, breadth-first expansion gathers
//! the relational context around them, and depth-first mining extracts
//! inference paths from that context:
//! - [`Retriever`]: the orchestrator and the only entry point callers need
//! - [`find_paths`]: pure path mining over an already expanded graph
//! - [`compose`]: pure result assembly

mod compose;
mod engine;
mod expansion;
mod inference;
mod vector_search;

pub use compose::compose;
pub use engine::Retriever;
pub use inference::{find_paths, MAX_CAUSAL_HOPS, MAX_SUPPORT_HOPS};
