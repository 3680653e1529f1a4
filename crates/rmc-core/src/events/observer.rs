//! Injectable sink for retrieval events.

use super::event::RetrievalEvent;

/// Receives retrieval events as they happen.
///
/// Observers are called inline on the retrieval path and must not block.
pub trait RetrievalObserver: Send + Sync {
    fn observe(&self, event: &RetrievalEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RetrievalObserver for TracingObserver {
    fn observe(&self, event: &RetrievalEvent) {
        match event {
            RetrievalEvent::VectorSearchDegraded { error } => {
                tracing::warn!(error = %error, "Vector search degraded to empty result");
            }
            RetrievalEvent::NeighborFetchFailed { node_id, error } => {
                tracing::warn!(node_id = %node_id, error = %error, "Neighbor fetch failed");
            }
            RetrievalEvent::RetrievalCompleted {
                direct_matches,
                context_size,
                inference_paths,
                elapsed_ms,
            } => {
                tracing::info!(
                    direct_matches,
                    context_size,
                    inference_paths,
                    elapsed_ms,
                    "Retrieval completed"
                );
            }
            other => tracing::trace!(kind = other.event_type(), details = ?other, "Retrieval step"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RetrievalObserver for NoopObserver {
    fn observe(&self, _event: &RetrievalEvent) {}
}
