//! Vector store trait.

use async_trait::async_trait;

use crate::error::RmcResult;
use crate::types::MemoryNode;

/// Nearest-neighbor lookup over memory embeddings.
///
/// Implementations must be safe for concurrent use by simultaneous
/// retrievals.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return up to `limit` memories most similar to `vector`.
    ///
    /// Only memories with `confidence >= min_confidence` are candidates and,
    /// when `agent_filter` is non-empty, only those written by a listed
    /// agent. Results carry `similarity` and are ordered by it, descending.
    async fn nearest_neighbors(
        &self,
        vector: &[f32],
        min_confidence: f32,
        agent_filter: &[String],
        limit: usize,
    ) -> RmcResult<Vec<MemoryNode>>;
}
