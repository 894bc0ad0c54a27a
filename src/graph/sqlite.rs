//! SQLite-backed graph store.
//!
//! Nodes and edges live in two tables and ids are SQLite rowids. A third
//! table maps tenant keys to root nodes so the session layer can find a
//! user's tree at login. The connection is synchronous behind a lock; no
//! call holds it across an await point.

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

use super::{ChildScan, FilesystemRoot, GraphStore, NodeId, NodeKind, NodeRecord};
use crate::entry::Encoding;
use crate::error::{FsError, FsResult};
use crate::perms::{Access, PermissionSet};

const SCHEMA: &str = r#"
-- Entry nodes: the persisted attribute set, one row per file or directory.
-- `path` is a denormalized cache; hierarchy lives in `edges`.
CREATE TABLE IF NOT EXISTS nodes (
    id INTEGER PRIMARY KEY,
    kind TEXT NOT NULL,
    path TEXT NOT NULL,
    perm_read INTEGER NOT NULL,
    perm_write INTEGER NOT NULL,
    perm_execute INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    last_modified INTEGER NOT NULL,
    contents BLOB,
    encoding TEXT
);

-- Parent-directory → child-entry edges; one inbound edge per non-root node.
CREATE TABLE IF NOT EXISTS edges (
    parent_id INTEGER NOT NULL REFERENCES nodes(id),
    child_id INTEGER NOT NULL UNIQUE REFERENCES nodes(id)
);
CREATE INDEX IF NOT EXISTS idx_edges_parent ON edges(parent_id);

-- Tenant key → root node registry.
CREATE TABLE IF NOT EXISTS trees (
    key TEXT PRIMARY KEY,
    root_id INTEGER NOT NULL REFERENCES nodes(id)
);
"#;

const NODE_COLUMNS: &str = "id, kind, path, perm_read, perm_write, perm_execute, \
                            created_at, last_modified, contents, encoding";

/// Graph store persisted in a SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> FsResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        tracing::info!("opened graph store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> FsResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Register a fresh tree under `key` and create its root directory node.
    ///
    /// Fails if `key` is already registered.
    pub fn create_tree(&self, key: &str) -> FsResult<FilesystemRoot> {
        let conn = self.conn.lock();
        let id = insert_node(&conn, &NodeRecord::root())?;
        conn.execute(
            "INSERT INTO trees (key, root_id) VALUES (?1, ?2)",
            params![key, id.raw()],
        )?;
        tracing::debug!(key, root = id.raw(), "created tree");
        Ok(FilesystemRoot(id))
    }

    /// Look up the root of the tree registered under `key`.
    pub fn find_tree(&self, key: &str) -> FsResult<Option<FilesystemRoot>> {
        let conn = self.conn.lock();
        let root = conn
            .query_row(
                "SELECT root_id FROM trees WHERE key = ?1",
                params![key],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(root.map(|id| FilesystemRoot(NodeId(id))))
    }
}

fn insert_node(conn: &Connection, record: &NodeRecord) -> FsResult<NodeId> {
    conn.execute(
        "INSERT INTO nodes (kind, path, perm_read, perm_write, perm_execute, \
                            created_at, last_modified, contents, encoding)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.kind.as_str(),
            record.path,
            record.permissions.read.bits(),
            record.permissions.write.bits(),
            record.permissions.execute.bits(),
            record.created_at,
            record.last_modified,
            record.contents,
            record.encoding.map(|e| e.as_str()),
        ],
    )?;
    Ok(NodeId(conn.last_insert_rowid()))
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(NodeId, NodeRecord)> {
    let kind: String = row.get(1)?;
    let encoding: Option<String> = row.get(9)?;
    Ok((
        NodeId(row.get(0)?),
        NodeRecord {
            kind: NodeKind::from_str(&kind).unwrap_or(NodeKind::File),
            path: row.get(2)?,
            permissions: PermissionSet {
                read: Access::from_bits_truncate(row.get(3)?),
                write: Access::from_bits_truncate(row.get(4)?),
                execute: Access::from_bits_truncate(row.get(5)?),
            },
            created_at: row.get(6)?,
            last_modified: row.get(7)?,
            contents: row.get(8)?,
            encoding: encoding.as_deref().and_then(Encoding::from_str),
        },
    ))
}

#[async_trait]
impl GraphStore for SqliteStore {
    async fn create_root(&self, record: NodeRecord) -> FsResult<FilesystemRoot> {
        let conn = self.conn.lock();
        Ok(FilesystemRoot(insert_node(&conn, &record)?))
    }

    async fn node(&self, id: NodeId) -> FsResult<NodeRecord> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                &format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = ?1"),
                params![id.raw()],
                |row| row_to_record(row),
            )
            .optional()?;
        match row {
            Some((_, record)) => Ok(record),
            None => Err(FsError::backend(format!("no such node: {}", id.raw()))),
        }
    }

    async fn scan_children(&self, parent: NodeId, limit: usize) -> FsResult<ChildScan> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {NODE_COLUMNS} FROM nodes \
             WHERE id IN (SELECT child_id FROM edges WHERE parent_id = ?1) \
             LIMIT ?2"
        ))?;
        // Fetch one row past the cap so truncation is observable.
        let rows = stmt.query_map(params![parent.raw(), (limit + 1) as i64], |row| {
            row_to_record(row)
        })?;
        let mut children = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        let truncated = children.len() > limit;
        if truncated {
            children.truncate(limit);
        }
        Ok(ChildScan {
            children,
            truncated,
        })
    }

    async fn insert_child(&self, parent: NodeId, record: NodeRecord) -> FsResult<NodeId> {
        let conn = self.conn.lock();
        let id = insert_node(&conn, &record)?;
        conn.execute(
            "INSERT INTO edges (parent_id, child_id) VALUES (?1, ?2)",
            params![parent.raw(), id.raw()],
        )?;
        Ok(id)
    }

    async fn update_node(&self, id: NodeId, record: NodeRecord) -> FsResult<()> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE nodes SET kind = ?1, path = ?2, perm_read = ?3, perm_write = ?4, \
                              perm_execute = ?5, created_at = ?6, last_modified = ?7, \
                              contents = ?8, encoding = ?9
             WHERE id = ?10",
            params![
                record.kind.as_str(),
                record.path,
                record.permissions.read.bits(),
                record.permissions.write.bits(),
                record.permissions.execute.bits(),
                record.created_at,
                record.last_modified,
                record.contents,
                record.encoding.map(|e| e.as_str()),
                id.raw(),
            ],
        )?;
        if changed == 0 {
            return Err(FsError::backend(format!("no such node: {}", id.raw())));
        }
        Ok(())
    }

    async fn remove_node(&self, id: NodeId) -> FsResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM edges WHERE child_id = ?1", params![id.raw()])?;
        let removed = conn.execute("DELETE FROM nodes WHERE id = ?1", params![id.raw()])?;
        if removed == 0 {
            return Err(FsError::backend(format!("no such node: {}", id.raw())));
        }
        Ok(())
    }
}
