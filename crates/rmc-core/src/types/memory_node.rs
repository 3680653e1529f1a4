//! Memory node snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A memory as seen by one retrieval call.
///
/// Nodes are immutable snapshots; identity is `id`. `similarity` is only set
/// for nodes returned by vector search and `depth` only for nodes that are
/// part of an expanded graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryNode {
    /// Opaque memory identifier.
    pub id: String,
    /// The memory text.
    pub content: String,
    /// Agent that wrote the memory.
    pub agent_id: String,
    /// Writer-assigned confidence (0-1).
    pub confidence: f32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Cosine similarity to the query vector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    /// Shortest relational distance from a seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

impl MemoryNode {
    /// Create a new memory node created now.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        agent_id: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            agent_id: agent_id.into(),
            confidence,
            created_at: Utc::now(),
            similarity: None,
            depth: None,
        }
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the similarity score.
    pub fn with_similarity(mut self, similarity: f32) -> Self {
        self.similarity = Some(similarity);
        self
    }

    /// Place the node at a BFS depth.
    pub fn at_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// A short single-line preview of the content.
    pub fn preview(&self, max_chars: usize) -> String {
        let line = self.content.lines().next().unwrap_or_default();
        if line.chars().count() <= max_chars && !self.content.contains('\n') {
            return line.to_string();
        }
        let truncated: String = line.chars().take(max_chars).collect();
        format!("{}…", truncated.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_optional_fields() {
        let node = MemoryNode::new("m1", "Rates rose", "agent-a", 0.9)
            .with_similarity(0.75)
            .at_depth(0);
        assert_eq!(node.similarity, Some(0.75));
        assert_eq!(node.depth, Some(0));
    }

    #[test]
    fn test_optional_fields_skipped_when_unset() {
        let node = MemoryNode::new("m1", "Rates rose", "agent-a", 0.9);
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("similarity").is_none());
        assert!(json.get("depth").is_none());
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let node = MemoryNode::new("m1", "a".repeat(100), "agent-a", 0.9);
        let preview = node.preview(10);
        assert_eq!(preview.chars().count(), 11);
        assert!(preview.ends_with('…'));

        let short = MemoryNode::new("m2", "short", "agent-a", 0.9);
        assert_eq!(short.preview(10), "short");
    }
}
