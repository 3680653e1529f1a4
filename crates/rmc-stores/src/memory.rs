//! In-process vector store with brute-force cosine search.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use ordered_float::OrderedFloat;

use rmc_core::error::{RmcError, RmcResult};
use rmc_core::traits::VectorStore;
use rmc_core::types::MemoryNode;

struct Entry {
    node: MemoryNode,
    embedding: Vec<f32>,
}

/// Vector store keeping every embedding in memory.
///
/// Search is a linear scan, which is fine for the tens of thousands of
/// memories a single agent accumulates.
#[derive(Default)]
pub struct MemoryVectorStore {
    dimension: Option<usize>,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryVectorStore {
    /// Create an empty store accepting embeddings of any (consistent) length.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that only accepts embeddings of `dimension`.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: Some(dimension),
            ..Self::default()
        }
    }

    /// Insert or replace a memory and its embedding.
    pub fn upsert(&self, node: MemoryNode, embedding: Vec<f32>) -> RmcResult<()> {
        if embedding.is_empty() {
            return Err(RmcError::validation("embedding must not be empty"));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(RmcError::validation("embedding contains non-finite values"));
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| RmcError::internal(e.to_string()))?;

        let expected = self
            .dimension
            .or_else(|| entries.values().next().map(|e| e.embedding.len()));
        if let Some(expected) = expected {
            if embedding.len() != expected {
                return Err(RmcError::dimension_mismatch(expected, embedding.len()));
            }
        }

        let mut node = node;
        node.similarity = None;
        node.depth = None;
        entries.insert(node.id.clone(), Entry { node, embedding });
        Ok(())
    }

    /// Remove a memory. Returns whether it was present.
    pub fn remove(&self, id: &str) -> RmcResult<bool> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| RmcError::internal(e.to_string()))?;
        Ok(entries.remove(id).is_some())
    }

    /// Number of stored memories.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn nearest_neighbors(
        &self,
        vector: &[f32],
        min_confidence: f32,
        agent_filter: &[String],
        limit: usize,
    ) -> RmcResult<Vec<MemoryNode>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| RmcError::internal(e.to_string()))?;

        if let Some(entry) = entries.values().next() {
            if entry.embedding.len() != vector.len() {
                return Err(RmcError::dimension_mismatch(entry.embedding.len(), vector.len()));
            }
        }

        let mut scored: Vec<(f32, &MemoryNode)> = entries
            .values()
            .filter(|e| e.node.confidence >= min_confidence)
            .filter(|e| agent_filter.is_empty() || agent_filter.contains(&e.node.agent_id))
            .map(|e| (cosine_similarity(vector, &e.embedding), &e.node))
            .collect();

        // Ties break on ID so results do not depend on hash order.
        scored.sort_by(|a, b| {
            OrderedFloat(b.0)
                .cmp(&OrderedFloat(a.0))
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(score, node)| node.clone().with_similarity(score))
            .collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
