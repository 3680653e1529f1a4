//! SQLite schema for the embedded relation store.
//!
//! Two tables:
//! - `memories`: node snapshots (content, agent, confidence)
//! - `relations`: typed directed edges, unique per `(source, target, type)`

use rusqlite::Connection;

use rmc_core::error::RmcResult;

/// SQL for the memories table.
pub const CREATE_MEMORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS memories (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    agent_id TEXT NOT NULL,
    confidence REAL NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// Index for agent filtering.
pub const CREATE_MEMORIES_AGENT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_memories_agent ON memories(agent_id)
"#;

/// SQL for the relations table.
pub const CREATE_RELATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS relations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id TEXT NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
    target_id TEXT NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
    relation_type TEXT NOT NULL,
    strength REAL NOT NULL DEFAULT 1.0,
    reason TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(source_id, target_id, relation_type)
)
"#;

/// Index for traversal from source.
pub const CREATE_RELATIONS_SOURCE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_relations_source ON relations(source_id)
"#;

/// Index for cascading from target.
pub const CREATE_RELATIONS_TARGET_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_relations_target ON relations(target_id)
"#;

/// Initialize the schema in the given database connection.
///
/// Idempotent.
pub fn init_schema(conn: &Connection) -> RmcResult<()> {
    // Enable foreign keys
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(CREATE_MEMORIES_TABLE, [])?;
    conn.execute(CREATE_RELATIONS_TABLE, [])?;

    conn.execute(CREATE_MEMORIES_AGENT_INDEX, [])?;
    conn.execute(CREATE_RELATIONS_SOURCE_INDEX, [])?;
    conn.execute(CREATE_RELATIONS_TARGET_INDEX, [])?;

    Ok(())
}
