//! Vector search stage: query vector to seed memories.

use std::collections::HashSet;
use std::time::Duration;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::events::{RetrievalEvent, RetrievalObserver};
use crate::traits::VectorStore;
use crate::types::{MemoryNode, NormalizedOptions};

/// Fetch the direct matches for a query vector.
///
/// Store failures and timeouts degrade to an empty result. Whatever the
/// store returns is re-checked against the confidence floor and agent
/// filter, deduplicated by ID, ordered by similarity and capped at `limit`.
/// Every returned node has `depth == Some(0)`.
pub(crate) async fn search(
    store: &dyn VectorStore,
    query_vector: &[f32],
    options: &NormalizedOptions,
    limit: usize,
    timeout: Duration,
    observer: &dyn RetrievalObserver,
) -> Vec<MemoryNode> {
    let call = store.nearest_neighbors(
        query_vector,
        options.min_confidence,
        &options.agent_filter,
        limit,
    );

    let candidates = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(nodes)) => nodes,
        Ok(Err(e)) => {
            observer.observe(&RetrievalEvent::VectorSearchDegraded {
                error: e.to_string(),
            });
            Vec::new()
        }
        Err(_) => {
            observer.observe(&RetrievalEvent::VectorSearchDegraded {
                error: format!("timed out after {}ms", timeout.as_millis()),
            });
            Vec::new()
        }
    };

    let mut seen = HashSet::new();
    let mut seeds: Vec<MemoryNode> = candidates
        .into_iter()
        .filter(|node| node.confidence >= options.min_confidence)
        .filter(|node| {
            options.agent_filter.is_empty() || options.agent_filter.contains(&node.agent_id)
        })
        .filter(|node| seen.insert(node.id.clone()))
        .map(|node| node.at_depth(0))
        .collect();

    seeds.sort_by_key(|node| std::cmp::Reverse(OrderedFloat(node.similarity.unwrap_or(0.0))));
    seeds.truncate(limit);

    debug!(count = seeds.len(), limit, "Vector search complete");
    observer.observe(&RetrievalEvent::SeedsFound { count: seeds.len() });
    seeds
}
