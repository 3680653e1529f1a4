//! Retrieval result.

use serde::{Deserialize, Serialize};

use super::graph::GraphContext;
use super::inference::InferencePath;
use super::memory_node::MemoryNode;

/// Everything one `retrieve` call found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Vector search matches.
    pub direct_matches: Vec<MemoryNode>,
    /// Graph expanded from the direct matches.
    pub related_context: GraphContext,
    /// Inference paths, highest confidence first.
    pub inference_paths: Vec<InferencePath>,
    /// One-line description of the counts.
    pub summary: String,
}

impl RetrievalResult {
    /// Whether nothing matched the query.
    pub fn is_empty(&self) -> bool {
        self.direct_matches.is_empty()
    }
}
