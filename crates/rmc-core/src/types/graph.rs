//! Expanded relational context.

use serde::{Deserialize, Serialize};

use super::memory_node::MemoryNode;
use super::relation::{RelationEdge, RelationType};

/// The subgraph discovered by expanding from the direct matches.
///
/// `memories` holds each node once, in discovery order, with its BFS depth.
/// `relations` holds every distinct `(source, target, type)` edge that was
/// fetched; an edge target is not required to be in `memories`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphContext {
    /// Expanded memories.
    pub memories: Vec<MemoryNode>,
    /// Discovered edges.
    pub relations: Vec<RelationEdge>,
}

impl GraphContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a memory by ID.
    pub fn node(&self, id: &str) -> Option<&MemoryNode> {
        self.memories.iter().find(|m| m.id == id)
    }

    /// Whether the context contains a memory.
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Edges of the given type.
    pub fn relations_of(&self, relation_type: RelationType) -> impl Iterator<Item = &RelationEdge> {
        self.relations
            .iter()
            .filter(move |e| e.relation_type == relation_type)
    }

    /// Number of memories in the context.
    pub fn len(&self) -> usize {
        self.memories.len()
    }

    /// Whether the context has no memories.
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}
