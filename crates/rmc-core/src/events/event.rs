//! Retrieval trace events.
//!
//! Emitted while a retrieval runs so callers and tests can follow the
//! traversal without parsing log text.

use serde::{Deserialize, Serialize};

use crate::types::PathType;

/// One step of a retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RetrievalEvent {
    /// Vector search produced the seed set.
    SeedsFound { count: usize },
    /// Vector search failed or timed out and was treated as empty.
    VectorSearchDegraded { error: String },
    /// Neighbors of a node were fetched.
    NodeExpanded {
        node_id: String,
        depth: usize,
        neighbor_count: usize,
    },
    /// A node sits at the depth bound and was not expanded.
    DepthLimitReached { node_id: String, depth: usize },
    /// A neighbor fetch failed or timed out and was treated as empty.
    NeighborFetchFailed { node_id: String, error: String },
    /// An inference path was kept.
    PathFound {
        path_type: PathType,
        hops: usize,
        confidence: f32,
    },
    /// The retrieval finished.
    RetrievalCompleted {
        direct_matches: usize,
        context_size: usize,
        inference_paths: usize,
        elapsed_ms: u64,
    },
}

impl RetrievalEvent {
    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SeedsFound { .. } => "retrieval.seeds_found",
            Self::VectorSearchDegraded { .. } => "retrieval.vector_search_degraded",
            Self::NodeExpanded { .. } => "retrieval.node_expanded",
            Self::DepthLimitReached { .. } => "retrieval.depth_limit_reached",
            Self::NeighborFetchFailed { .. } => "retrieval.neighbor_fetch_failed",
            Self::PathFound { .. } => "retrieval.path_found",
            Self::RetrievalCompleted { .. } => "retrieval.completed",
        }
    }

    /// The node this event concerns, if any.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::NodeExpanded { node_id, .. }
            | Self::DepthLimitReached { node_id, .. }
            | Self::NeighborFetchFailed { node_id, .. } => Some(node_id),
            _ => None,
        }
    }
}
