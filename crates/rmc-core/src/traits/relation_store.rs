//! Relation store trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::RmcResult;
use crate::types::{Neighbor, RelationType};

/// Source of typed, directed edges between memories.
#[async_trait]
pub trait RelationStore: Send + Sync {
    /// Edges whose source is `node_id` and whose type is in `types`, each
    /// with its resolved target memory.
    async fn outgoing_edges(&self, node_id: &str, types: &[RelationType])
        -> RmcResult<Vec<Neighbor>>;
}

/// Relation store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationStoreConfig {
    /// Database path, or `:memory:` for an ephemeral store.
    pub path: PathBuf,
}

impl RelationStoreConfig {
    /// Whether the store lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty() || self.path.as_os_str() == ":memory:"
    }
}

impl Default for RelationStoreConfig {
    fn default() -> Self {
        let rmc_dir = dirs::home_dir()
            .map(|h| h.join(".rmc"))
            .unwrap_or_else(|| PathBuf::from(".rmc"));
        Self {
            path: rmc_dir.join("relations.db"),
        }
    }
}
