//! Retriever orchestrating the hybrid retrieval pipeline.
//!
//! One call runs four stages in strict sequence: vector search for the
//! direct matches, breadth-first graph expansion around them, inference path
//! mining over the expanded graph, and result composition. Calls share no
//! mutable state, so one `Retriever` can serve concurrent requests.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::RetrieverConfig;
use crate::error::{RmcError, RmcResult};
use crate::events::{RetrievalEvent, RetrievalObserver, TracingObserver};
use crate::traits::{ensure_dimension, Embedder, RelationStore, VectorStore};
use crate::types::{NormalizedOptions, RetrievalOptions, RetrievalResult};

use super::compose::compose;
use super::expansion::GraphExpander;
use super::inference::find_paths;
use super::vector_search;

/// Hybrid vector + graph retriever.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    relation_store: Arc<dyn RelationStore>,
    config: RetrieverConfig,
    observer: Arc<dyn RetrievalObserver>,
}

impl Retriever {
    /// Create a retriever with the default configuration.
    ///
    /// Traversal events are logged through `tracing` until another observer
    /// is installed with [`Retriever::with_observer`].
    pub fn new(
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        relation_store: Arc<dyn RelationStore>,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            relation_store,
            config: RetrieverConfig::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: RetrieverConfig) -> RmcResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Install the observer that receives traversal events.
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Retrieve memories relevant to `query_text`.
    ///
    /// Options are validated before any I/O. Embedding failures are fatal;
    /// store failures degrade to empty results. The whole call is bounded by
    /// `retrieve_timeout_ms` and yields [`RmcError::Timeout`] when exceeded.
    pub async fn retrieve(
        &self,
        query_text: &str,
        options: &RetrievalOptions,
    ) -> RmcResult<RetrievalResult> {
        let options = options.normalize(&self.config.defaults, self.config.max_depth_limit)?;
        if query_text.trim().is_empty() {
            return Err(RmcError::validation_with_suggestion(
                "query_text must not be empty",
                "Provide the text to search memories for",
            ));
        }

        match tokio::time::timeout(self.config.retrieve_timeout(), self.run(query_text, &options))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_ms = self.config.retrieve_timeout_ms,
                    "Retrieval exceeded its deadline"
                );
                Err(RmcError::timeout("retrieve", self.config.retrieve_timeout_ms))
            }
        }
    }

    async fn run(&self, query_text: &str, options: &NormalizedOptions) -> RmcResult<RetrievalResult> {
        let started = Instant::now();
        let observer = self.observer.as_ref();

        let embedding = self.embedder.embed(query_text).await?;
        let embedding = ensure_dimension(embedding, self.embedder.dimension())?;

        let direct_matches = vector_search::search(
            self.vector_store.as_ref(),
            &embedding,
            options,
            self.config.vector_limit,
            self.config.store_timeout(),
            observer,
        )
        .await;

        let related_context = GraphExpander::new(
            self.relation_store.as_ref(),
            options,
            self.config.expansion_concurrency,
            self.config.store_timeout(),
            observer,
        )
        .expand(&direct_matches)
        .await;

        let inference_paths = if options.include_inference_paths {
            find_paths(&direct_matches, &related_context)
        } else {
            Vec::new()
        };
        for path in &inference_paths {
            observer.observe(&RetrievalEvent::PathFound {
                path_type: path.path_type,
                hops: path.hops(),
                confidence: path.confidence,
            });
        }

        let result = compose(direct_matches, related_context, inference_paths);

        debug!(summary = %result.summary, "Retrieval composed");
        observer.observe(&RetrievalEvent::RetrievalCompleted {
            direct_matches: result.direct_matches.len(),
            context_size: result.related_context.len(),
            inference_paths: result.inference_paths.len(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        });

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::traits::MockEmbedder;
    use crate::types::{MemoryNode, Neighbor, RelationType};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    /// Vector store that counts calls and always returns the same nodes.
    #[derive(Default)]
    struct CountingVectorStore {
        nodes: Vec<MemoryNode>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VectorStore for CountingVectorStore {
        async fn nearest_neighbors(
            &self,
            _vector: &[f32],
            _min_confidence: f32,
            _agent_filter: &[String],
            _limit: usize,
        ) -> RmcResult<Vec<MemoryNode>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.nodes.clone())
        }
    }

    struct EmptyRelations;

    #[async_trait]
    impl RelationStore for EmptyRelations {
        async fn outgoing_edges(
            &self,
            _node_id: &str,
            _types: &[RelationType],
        ) -> RmcResult<Vec<Neighbor>> {
            Ok(Vec::new())
        }
    }

    fn embedder_returning(vector: Vec<f32>) -> MockEmbedder {
        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .returning(move |_| Ok(vector.clone()));
        embedder.expect_dimension().return_const(3usize);
        embedder
    }

    fn retriever(embedder: MockEmbedder, store: Arc<CountingVectorStore>) -> Retriever {
        Retriever::new(Arc::new(embedder), store, Arc::new(EmptyRelations))
    }

    #[tokio::test]
    async fn test_invalid_options_rejected_before_io() {
        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().never();
        let store = Arc::new(CountingVectorStore::default());
        let retriever = retriever(embedder, store.clone());

        let err = assert_err!(
            retriever
                .retrieve("query", &RetrievalOptions::new().with_max_depth(99))
                .await
        );
        assert!(err.is_validation());

        let err = assert_err!(
            retriever
                .retrieve("query", &RetrievalOptions::new().with_min_confidence(1.5))
                .await
        );
        assert!(err.is_validation());

        let err = assert_err!(retriever.retrieve("   ", &RetrievalOptions::new()).await);
        assert!(err.is_validation());

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_fatal() {
        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .returning(|_| Err(RmcError::embedding("provider down")));
        let store = Arc::new(CountingVectorStore::default());
        let retriever = retriever(embedder, store.clone());

        let err = assert_err!(retriever.retrieve("query", &RetrievalOptions::new()).await);
        assert!(matches!(err, RmcError::Embedding { .. }));
        assert!(!err.is_validation());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_fatal() {
        let store = Arc::new(CountingVectorStore::default());
        let retriever = retriever(embedder_returning(vec![0.1, 0.2]), store.clone());

        let err = assert_err!(retriever.retrieve("query", &RetrievalOptions::new()).await);
        assert_eq!(err.code(), crate::error::ErrorCode::EmbDimensionMismatch);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_matches_yields_well_formed_empty_result() {
        let store = Arc::new(CountingVectorStore::default());
        let retriever = retriever(embedder_returning(vec![0.1, 0.2, 0.3]), store);

        let result = assert_ok!(retriever.retrieve("query", &RetrievalOptions::new()).await);
        assert!(result.is_empty());
        assert!(result.related_context.is_empty());
        assert!(result.inference_paths.is_empty());
        assert_eq!(result.summary, "Retrieved 0 direct matches");
    }

    #[tokio::test]
    async fn test_completion_event_reports_counts() {
        let store = Arc::new(CountingVectorStore {
            nodes: vec![MemoryNode::new("m1", "the build broke", "agent", 0.9).with_similarity(0.8)],
            calls: AtomicUsize::new(0),
        });
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        let retriever = retriever(embedder_returning(vec![0.1, 0.2, 0.3]), store)
            .with_observer(Arc::new(bus.clone()));

        let result = assert_ok!(retriever.retrieve("query", &RetrievalOptions::new()).await);
        assert_eq!(result.direct_matches.len(), 1);

        let events = sub.drain();
        assert_eq!(events.first(), Some(&RetrievalEvent::SeedsFound { count: 1 }));
        assert!(matches!(
            events.last(),
            Some(RetrievalEvent::RetrievalCompleted {
                direct_matches: 1,
                context_size: 1,
                inference_paths: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_with_config_validates() {
        let retriever = retriever(
            MockEmbedder::new(),
            Arc::new(CountingVectorStore::default()),
        );
        let bad = RetrieverConfig {
            expansion_concurrency: 0,
            ..Default::default()
        };
        assert!(retriever.with_config(bad).is_err());
    }
}
