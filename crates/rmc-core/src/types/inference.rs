//! Inference paths mined from the expanded graph.

use serde::{Deserialize, Serialize};
use super::memory_node::MemoryNode;
use super::relation::RelationEdge;

/// Reasoning pattern an inference path represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    /// Chain of CAUSES/IMPACTS edges.
    CausalChain,
    /// A single CONTRADICTS edge.
    ContradictionResolution,
    /// Chain of SUPPORTS edges.
    MultiHopSupport,
    /// Time-ordered sequence. Reserved; no miner emits it yet.
    TemporalSequence,
}

/// A multi-node chain through the relation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferencePath {
    /// Pattern kind.
    #[serde(rename = "type")]
    pub path_type: PathType,
    /// Nodes in path order.
    pub nodes: Vec<MemoryNode>,
    /// `edges[i]` connects `nodes[i]` to `nodes[i + 1]`.
    pub edges: Vec<RelationEdge>,
    /// Human-readable rendering of the path.
    pub description: String,
    /// Derived confidence (0-1).
    pub confidence: f32,
}

impl InferencePath {
    /// IDs of the nodes in path order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Number of edges (hops) in the path.
    pub fn hops(&self) -> usize {
        self.edges.len()
    }
}
