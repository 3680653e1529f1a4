//! SQLite <-> petgraph synchronization.
//!
//! Loads the persisted graph into petgraph on open and writes every change
//! back to SQLite before the in-memory graph is touched.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use rmc_core::error::{RmcError, RmcResult};
use rmc_core::types::{MemoryNode, RelationEdge, RelationType};

use super::petgraph_ops::{GraphOps, IdIndex, RelationGraph};

/// Load the entire graph from SQLite into petgraph.
///
/// Relations load in insertion order so neighbor order survives a restart.
/// Rows with an unknown relation tag are skipped with a warning.
pub fn load_graph(conn: &Connection, graph: &mut RelationGraph, index: &mut IdIndex) -> RmcResult<()> {
    let mut ops = GraphOps::new(graph, index);
    ops.clear();

    let mut stmt = conn.prepare(
        "SELECT id, content, agent_id, confidence, created_at FROM memories ORDER BY rowid",
    )?;
    let memories = stmt.query_map([], |row| {
        let id: String = row.get(0)?;
        let content: String = row.get(1)?;
        let agent_id: String = row.get(2)?;
        let confidence: f64 = row.get(3)?;
        let created_at: String = row.get(4)?;
        Ok((MemoryNode::new(id, content, agent_id, confidence as f32), created_at))
    })?;

    for row in memories {
        let (node, created_at) = row?;
        let node = node.with_created_at(parse_timestamp(&created_at)?);
        ops.upsert_memory(node);
    }

    let mut stmt = conn.prepare(
        "SELECT source_id, target_id, relation_type, strength, reason FROM relations ORDER BY id",
    )?;
    let relations = stmt.query_map([], |row| {
        let source: String = row.get(0)?;
        let target: String = row.get(1)?;
        let tag: String = row.get(2)?;
        let strength: f64 = row.get(3)?;
        let reason: Option<String> = row.get(4)?;
        Ok((source, target, tag, strength, reason))
    })?;

    for row in relations {
        let (source, target, tag, strength, reason) = row?;
        let relation_type = match RelationType::parse(&tag) {
            Ok(relation_type) => relation_type,
            Err(_) => {
                tracing::warn!(source = %source, target = %target, tag = %tag, "Skipping relation with unknown type");
                continue;
            }
        };
        let mut edge = RelationEdge::new(source, target, relation_type, strength as f32);
        edge.reason = reason;
        ops.upsert_relation(edge)?;
    }

    tracing::debug!(
        memories = ops.node_count(),
        relations = ops.edge_count(),
        "Loaded relation graph"
    );
    Ok(())
}

/// Save a memory to SQLite, replacing any previous snapshot.
pub fn save_memory(conn: &Connection, node: &MemoryNode) -> RmcResult<()> {
    conn.execute(
        r#"
        INSERT INTO memories (id, content, agent_id, confidence, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(id) DO UPDATE SET
            content = excluded.content,
            agent_id = excluded.agent_id,
            confidence = excluded.confidence,
            created_at = excluded.created_at
        "#,
        params![
            node.id,
            node.content,
            node.agent_id,
            node.confidence as f64,
            node.created_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Save a relation to SQLite.
///
/// Upserts on `(source, target, type)`; the original row (and so its load
/// order) is kept.
pub fn save_relation(conn: &Connection, edge: &RelationEdge) -> RmcResult<()> {
    conn.execute(
        r#"
        INSERT INTO relations (source_id, target_id, relation_type, strength, reason, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
        ON CONFLICT(source_id, target_id, relation_type) DO UPDATE SET
            strength = excluded.strength,
            reason = excluded.reason,
            updated_at = datetime('now')
        "#,
        params![
            edge.source,
            edge.target,
            edge.relation_type.as_str(),
            edge.strength as f64,
            edge.reason
        ],
    )?;
    Ok(())
}

/// Delete a memory; relations touching it cascade.
///
/// Returns whether a row was deleted.
pub fn delete_memory(conn: &Connection, id: &str) -> RmcResult<bool> {
    let deleted = conn.execute("DELETE FROM memories WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

fn parse_timestamp(raw: &str) -> RmcResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RmcError::database(format!("Invalid created_at '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded::schema::init_schema;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let conn = setup();
        let a = MemoryNode::new("a", "deploy failed", "ops", 0.9);
        let b = MemoryNode::new("b", "rollback started", "ops", 0.7);
        save_memory(&conn, &a).unwrap();
        save_memory(&conn, &b).unwrap();
        save_relation(
            &conn,
            &RelationEdge::new("a", "b", RelationType::Causes, 0.8).with_reason("runbook"),
        )
        .unwrap();

        let mut graph = RelationGraph::default();
        let mut index = IdIndex::new();
        load_graph(&conn, &mut graph, &mut index).unwrap();

        let ops = GraphOps::new(&mut graph, &mut index);
        assert_eq!(ops.node_count(), 2);
        let neighbors = ops.outgoing("a", &[RelationType::Causes]);
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].edge.reason.as_deref(), Some("runbook"));
        assert_eq!(ops.memory("a").unwrap().created_at.timestamp(), a.created_at.timestamp());
    }

    #[test]
    fn test_save_relation_upserts() {
        let conn = setup();
        save_memory(&conn, &MemoryNode::new("a", "x", "ops", 0.9)).unwrap();
        save_memory(&conn, &MemoryNode::new("b", "y", "ops", 0.9)).unwrap();

        save_relation(&conn, &RelationEdge::new("a", "b", RelationType::Supports, 0.2)).unwrap();
        save_relation(&conn, &RelationEdge::new("a", "b", RelationType::Supports, 0.6)).unwrap();

        let (count, strength): (i64, f64) = conn
            .query_row("SELECT COUNT(*), MAX(strength) FROM relations", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(count, 1);
        assert!((strength - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_tags_are_skipped_on_load() {
        let conn = setup();
        save_memory(&conn, &MemoryNode::new("a", "x", "ops", 0.9)).unwrap();
        save_memory(&conn, &MemoryNode::new("b", "y", "ops", 0.9)).unwrap();
        conn.execute(
            "INSERT INTO relations (source_id, target_id, relation_type) VALUES ('a', 'b', 'FOLLOWS')",
            [],
        )
        .unwrap();

        let mut graph = RelationGraph::default();
        let mut index = IdIndex::new();
        load_graph(&conn, &mut graph, &mut index).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_delete_memory_reports_presence() {
        let conn = setup();
        save_memory(&conn, &MemoryNode::new("a", "x", "ops", 0.9)).unwrap();
        assert!(delete_memory(&conn, "a").unwrap());
        assert!(!delete_memory(&conn, "a").unwrap());
    }
}
