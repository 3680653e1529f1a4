//! Embedded relation store using petgraph + SQLite hybrid architecture.
//!
//! This module provides a relation store that:
//! - Uses SQLite for persistent storage
//! - Uses a petgraph stable graph for O(degree) neighbor lookups
//! - Writes through to SQLite and reloads the graph on open
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          SqliteRelationStore            │
//! ├─────────────────────────────────────────┤
//! │  ┌─────────────┐    ┌────────────────┐  │
//! │  │   SQLite    │    │   petgraph     │  │
//! │  │ (persistent)│───►│  (in-memory)   │  │
//! │  │             │    │  StableDiGraph │  │
//! │  └─────────────┘    └────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```

pub mod petgraph_ops;
pub mod schema;
pub mod sync;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::Connection;

use rmc_core::error::{RmcError, RmcResult};
use rmc_core::traits::{RelationStore, RelationStoreConfig};
use rmc_core::types::{MemoryNode, Neighbor, RelationEdge, RelationType};

use petgraph_ops::{GraphOps, IdIndex, RelationGraph};

/// In-memory graph plus its ID index, guarded together.
#[derive(Default)]
struct GraphState {
    graph: RelationGraph,
    index: IdIndex,
}

impl GraphState {
    fn ops(&mut self) -> GraphOps<'_> {
        GraphOps::new(&mut self.graph, &mut self.index)
    }
}

/// Embedded relation store using petgraph + SQLite.
///
/// Thread-safe via Mutex on the connection and graph. Lock order is always
/// connection first, then graph.
pub struct SqliteRelationStore {
    /// SQLite connection (wrapped in Mutex for Send + Sync).
    conn: Mutex<Connection>,
    /// In-memory graph for fast traversal.
    state: Mutex<GraphState>,
}

impl SqliteRelationStore {
    /// Open (or create) a store at the given database path.
    ///
    /// Existing memories and relations are loaded into memory.
    pub fn new(db_path: impl AsRef<Path>) -> RmcResult<Self> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// Create a new in-memory store.
    pub fn in_memory() -> RmcResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Create from a RelationStoreConfig, creating parent directories.
    pub fn from_config(config: &RelationStoreConfig) -> RmcResult<Self> {
        if config.is_in_memory() {
            return Self::in_memory();
        }
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::new(&config.path)
    }

    fn with_connection(conn: Connection) -> RmcResult<Self> {
        schema::init_schema(&conn)?;

        let mut state = GraphState::default();
        sync::load_graph(&conn, &mut state.graph, &mut state.index)?;

        Ok(Self {
            conn: Mutex::new(conn),
            state: Mutex::new(state),
        })
    }

    fn conn(&self) -> RmcResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| RmcError::internal(e.to_string()))
    }

    fn state(&self) -> RmcResult<MutexGuard<'_, GraphState>> {
        self.state.lock().map_err(|e| RmcError::internal(e.to_string()))
    }

    /// Add a memory, replacing any stored snapshot with the same ID.
    pub fn add_memory(&self, node: &MemoryNode) -> RmcResult<()> {
        if node.id.trim().is_empty() {
            return Err(RmcError::validation("memory id must not be empty"));
        }
        if !(0.0..=1.0).contains(&node.confidence) {
            return Err(RmcError::out_of_range(
                "confidence",
                node.confidence,
                "between 0.0 and 1.0",
            ));
        }

        let conn = self.conn()?;
        sync::save_memory(&conn, node)?;
        self.state()?.ops().upsert_memory(node.clone());
        Ok(())
    }

    /// Add a relation between two stored memories.
    ///
    /// A relation with the same `(source, target, type)` is updated in place.
    pub fn add_relation(&self, edge: &RelationEdge) -> RmcResult<()> {
        if !(0.0..=1.0).contains(&edge.strength) {
            return Err(RmcError::out_of_range(
                "strength",
                edge.strength,
                "between 0.0 and 1.0",
            ));
        }

        let conn = self.conn()?;
        let mut state = self.state()?;
        for endpoint in [&edge.source, &edge.target] {
            if state.ops().find(endpoint).is_none() {
                return Err(RmcError::unknown_node(endpoint));
            }
        }

        sync::save_relation(&conn, edge)?;
        let added = state.ops().upsert_relation(edge.clone())?;
        tracing::debug!(
            source = %edge.source,
            target = %edge.target,
            relation_type = %edge.relation_type,
            added,
            "Stored relation"
        );
        Ok(())
    }

    /// Remove a memory and every relation touching it.
    ///
    /// Returns whether the memory existed.
    pub fn remove_memory(&self, id: &str) -> RmcResult<bool> {
        let conn = self.conn()?;
        let deleted = sync::delete_memory(&conn, id)?;
        let removed = self.state()?.ops().remove_memory(id).is_some();
        Ok(deleted || removed)
    }

    /// Get a stored memory.
    pub fn get_memory(&self, id: &str) -> RmcResult<Option<MemoryNode>> {
        let mut state = self.state()?;
        Ok(state.ops().memory(id).cloned())
    }

    /// Number of stored memories.
    pub fn memory_count(&self) -> RmcResult<usize> {
        Ok(self.state()?.ops().node_count())
    }

    /// Number of stored relations.
    pub fn relation_count(&self) -> RmcResult<usize> {
        Ok(self.state()?.ops().edge_count())
    }
}

#[async_trait]
impl RelationStore for SqliteRelationStore {
    async fn outgoing_edges(
        &self,
        node_id: &str,
        types: &[RelationType],
    ) -> RmcResult<Vec<Neighbor>> {
        let mut state = self.state()?;
        Ok(state.ops().outgoing(node_id, types))
    }
}

// Implement Debug for SqliteRelationStore
impl std::fmt::Debug for SqliteRelationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRelationStore")
            .field("memory_count", &self.memory_count().unwrap_or(0))
            .field("relation_count", &self.relation_count().unwrap_or(0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;

    fn memory(id: &str) -> MemoryNode {
        MemoryNode::new(id, format!("memory {}", id), "planner", 0.8)
    }

    fn store_with(ids: &[&str]) -> SqliteRelationStore {
        let store = SqliteRelationStore::in_memory().unwrap();
        for id in ids {
            store.add_memory(&memory(id)).unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_outgoing_edges_filters_types() {
        let store = store_with(&["a", "b", "c"]);
        store
            .add_relation(&RelationEdge::new("a", "b", RelationType::Causes, 0.9))
            .unwrap();
        store
            .add_relation(&RelationEdge::new("a", "c", RelationType::Contradicts, 0.4))
            .unwrap();

        let causes = store
            .outgoing_edges("a", &[RelationType::Causes])
            .await
            .unwrap();
        assert_eq!(causes.len(), 1);
        assert_eq!(causes[0].node.id, "b");
        assert_eq!(causes[0].edge.relation_type, RelationType::Causes);

        let all = store.outgoing_edges("a", &RelationType::all()).await.unwrap();
        assert_eq!(all.len(), 2);

        assert!(store
            .outgoing_edges("unknown", &RelationType::all())
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_add_relation_validation() {
        let store = store_with(&["a"]);

        let err = assert_err!(store.add_relation(&RelationEdge::new(
            "a",
            "missing",
            RelationType::Causes,
            0.5
        )));
        assert_eq!(err.code(), rmc_core::ErrorCode::RelUnknownNode);

        let err = assert_err!(store.add_relation(&RelationEdge::new(
            "a",
            "a",
            RelationType::Causes,
            1.5
        )));
        assert!(err.is_validation());
        assert_eq!(store.relation_count().unwrap(), 0);
    }

    #[test]
    fn test_add_memory_validation() {
        let store = SqliteRelationStore::in_memory().unwrap();
        assert_err!(store.add_memory(&MemoryNode::new(" ", "x", "a", 0.5)));
        assert_err!(store.add_memory(&MemoryNode::new("m", "x", "a", -0.1)));
        assert_eq!(store.memory_count().unwrap(), 0);
    }

    #[test]
    fn test_remove_memory_cascades() {
        let store = store_with(&["a", "b"]);
        store
            .add_relation(&RelationEdge::new("a", "b", RelationType::Supports, 0.5))
            .unwrap();

        assert!(store.remove_memory("b").unwrap());
        assert!(!store.remove_memory("b").unwrap());
        assert_eq!(store.memory_count().unwrap(), 1);
        assert_eq!(store.relation_count().unwrap(), 0);
        assert!(store.get_memory("b").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persistence() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = RelationStoreConfig {
            path: temp_dir.path().join("nested").join("relations.db"),
        };

        {
            let store = SqliteRelationStore::from_config(&config).unwrap();
            store.add_memory(&memory("a")).unwrap();
            store.add_memory(&memory("b")).unwrap();
            store.add_memory(&memory("c")).unwrap();
            store
                .add_relation(&RelationEdge::new("a", "c", RelationType::Impacts, 0.3))
                .unwrap();
            store
                .add_relation(&RelationEdge::new("a", "b", RelationType::Impacts, 0.6))
                .unwrap();
            store
                .add_relation(&RelationEdge::new("a", "c", RelationType::Impacts, 0.9))
                .unwrap();
        }

        {
            let store = SqliteRelationStore::from_config(&config).unwrap();
            assert_eq!(store.memory_count().unwrap(), 3);
            assert_eq!(store.relation_count().unwrap(), 2);

            let neighbors = store
                .outgoing_edges("a", &RelationType::all())
                .await
                .unwrap();
            let targets: Vec<_> = neighbors.iter().map(|n| n.node.id.as_str()).collect();
            assert_eq!(targets, vec!["c", "b"]);
            assert!((neighbors[0].edge.strength - 0.9).abs() < 1e-6);
        }
    }
}
