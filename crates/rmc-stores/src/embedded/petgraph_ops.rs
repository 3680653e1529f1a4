//! In-memory relation graph operations using petgraph.
//!
//! Nodes are memory snapshots and edges are typed relations. A stable graph
//! keeps node indices valid across removals, so the ID index never needs to
//! be rebuilt.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use rmc_core::error::{RmcError, RmcResult};
use rmc_core::types::{MemoryNode, Neighbor, RelationEdge, RelationType};

/// The in-memory graph type.
pub type RelationGraph = StableDiGraph<MemoryNode, RelationEdge>;

/// Index for O(1) lookups by memory ID.
pub type IdIndex = HashMap<String, NodeIndex>;

/// Graph operations on the in-memory graph.
pub struct GraphOps<'a> {
    graph: &'a mut RelationGraph,
    index: &'a mut IdIndex,
}

impl<'a> GraphOps<'a> {
    /// Create a new GraphOps instance.
    pub fn new(graph: &'a mut RelationGraph, index: &'a mut IdIndex) -> Self {
        Self { graph, index }
    }

    /// Insert a memory or replace the stored snapshot.
    pub fn upsert_memory(&mut self, mut node: MemoryNode) -> NodeIndex {
        node.similarity = None;
        node.depth = None;

        if let Some(&idx) = self.index.get(&node.id) {
            if let Some(weight) = self.graph.node_weight_mut(idx) {
                *weight = node;
            }
            return idx;
        }

        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Insert an edge, or update strength and reason of the existing edge
    /// with the same `(source, target, type)`.
    ///
    /// Returns `true` when a new edge was added.
    pub fn upsert_relation(&mut self, edge: RelationEdge) -> RmcResult<bool> {
        let source = self
            .find(&edge.source)
            .ok_or_else(|| RmcError::unknown_node(&edge.source))?;
        let target = self
            .find(&edge.target)
            .ok_or_else(|| RmcError::unknown_node(&edge.target))?;

        let existing = self
            .graph
            .edges(source)
            .find(|e| e.target() == target && e.weight().relation_type == edge.relation_type)
            .map(|e| e.id());

        if let Some(weight) = existing.and_then(|id| self.graph.edge_weight_mut(id)) {
            *weight = edge;
            return Ok(false);
        }

        self.graph.add_edge(source, target, edge);
        Ok(true)
    }

    /// Find a node by memory ID.
    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Get the memory with the given ID.
    pub fn memory(&self, id: &str) -> Option<&MemoryNode> {
        self.find(id).and_then(|idx| self.graph.node_weight(idx))
    }

    /// Outgoing edges of `id` restricted to `types`, oldest first.
    pub fn outgoing(&self, id: &str, types: &[RelationType]) -> Vec<Neighbor> {
        let Some(idx) = self.find(id) else {
            return Vec::new();
        };

        let mut neighbors: Vec<Neighbor> = self
            .graph
            .edges(idx)
            .filter(|e| types.contains(&e.weight().relation_type))
            .filter_map(|e| {
                self.graph.node_weight(e.target()).map(|node| Neighbor {
                    edge: e.weight().clone(),
                    node: node.clone(),
                })
            })
            .collect();
        // Adjacency lists are newest first.
        neighbors.reverse();
        neighbors
    }

    /// Remove a memory and every edge touching it.
    pub fn remove_memory(&mut self, id: &str) -> Option<MemoryNode> {
        let idx = self.index.remove(id)?;
        self.graph.remove_node(idx)
    }

    /// Clear all nodes and edges from the graph.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.index.clear();
    }

    /// Get the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
