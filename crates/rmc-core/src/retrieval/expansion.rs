//! Graph expansion stage: bounded breadth-first traversal over typed edges.
//!
//! The traversal runs one BFS layer at a time. Neighbor fetches inside a
//! layer are issued concurrently (at most `concurrency` in flight), but their
//! results are merged by a single writer in frontier order, so the output is
//! the same as a sequential queue-based BFS:
//!
//! - every node enters `memories` once, at its shortest distance from a seed;
//! - nodes at `max_depth` are kept but never expanded;
//! - each `(source, target, type)` edge is recorded once, even when its
//!   target was already visited.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::events::{RetrievalEvent, RetrievalObserver};
use crate::traits::RelationStore;
use crate::types::{GraphContext, MemoryNode, Neighbor, NormalizedOptions, RelationType};

/// Breadth-first expander over a relation store.
pub(crate) struct GraphExpander<'a> {
    store: &'a dyn RelationStore,
    options: &'a NormalizedOptions,
    concurrency: usize,
    timeout: Duration,
    observer: &'a dyn RetrievalObserver,
}

impl<'a> GraphExpander<'a> {
    pub(crate) fn new(
        store: &'a dyn RelationStore,
        options: &'a NormalizedOptions,
        concurrency: usize,
        timeout: Duration,
        observer: &'a dyn RetrievalObserver,
    ) -> Self {
        Self {
            store,
            options,
            concurrency: concurrency.max(1),
            timeout,
            observer,
        }
    }

    /// Expand `seeds` into a bounded subgraph.
    pub(crate) async fn expand(&self, seeds: &[MemoryNode]) -> GraphContext {
        let mut context = GraphContext::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut recorded: HashSet<(String, String, RelationType)> = HashSet::new();
        let mut frontier: Vec<String> = Vec::new();

        for seed in seeds {
            if visited.insert(seed.id.clone()) {
                context.memories.push(seed.clone().at_depth(0));
                frontier.push(seed.id.clone());
            }
        }

        let mut depth = 0;
        while !frontier.is_empty() {
            if depth >= self.options.max_depth {
                for node_id in frontier {
                    self.observer.observe(&RetrievalEvent::DepthLimitReached { node_id, depth });
                }
                break;
            }

            let layer: Vec<(String, Vec<Neighbor>)> = stream::iter(frontier)
                .map(|node_id| async move {
                    let neighbors = self.fetch(&node_id).await;
                    (node_id, neighbors)
                })
                .buffered(self.concurrency)
                .collect()
                .await;

            let mut next = Vec::new();
            for (node_id, neighbors) in layer {
                self.observer.observe(&RetrievalEvent::NodeExpanded {
                    node_id: node_id.clone(),
                    depth,
                    neighbor_count: neighbors.len(),
                });

                for Neighbor { edge, mut node } in neighbors {
                    if edge.source != node_id
                        || edge.target != node.id
                        || !self.options.allows(edge.relation_type)
                    {
                        debug!(node_id = %node_id, target = %edge.target, "Skipping edge outside the requested set");
                        continue;
                    }

                    let (source, target, relation_type) = edge.key();
                    if recorded.insert((source.to_string(), target.to_string(), relation_type)) {
                        context.relations.push(edge);
                    }

                    if visited.insert(node.id.clone()) {
                        node.similarity = None;
                        next.push(node.id.clone());
                        context.memories.push(node.at_depth(depth + 1));
                    }
                }
            }

            frontier = next;
            depth += 1;
        }

        debug!(
            memories = context.memories.len(),
            relations = context.relations.len(),
            "Graph expansion complete"
        );
        context
    }

    /// Outgoing edges of one node; failures and timeouts yield no neighbors.
    async fn fetch(&self, node_id: &str) -> Vec<Neighbor> {
        let call = self.store.outgoing_edges(node_id, &self.options.relation_types);
        let error = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(neighbors)) => return neighbors,
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}ms", self.timeout.as_millis()),
        };
        self.observer.observe(&RetrievalEvent::NeighborFetchFailed {
            node_id: node_id.to_string(),
            error,
        });
        Vec::new()
    }
}
