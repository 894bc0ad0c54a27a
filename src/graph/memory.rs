//! In-memory graph store.
//!
//! An arena of nodes behind a lock, used for tests and scratch trees.
//! Supports multiple independent roots; all data is lost on drop.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{ChildScan, FilesystemRoot, GraphStore, NodeId, NodeRecord};
use crate::error::{FsError, FsResult};

struct MemNode {
    record: NodeRecord,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Default)]
struct Arena {
    nodes: HashMap<i64, MemNode>,
    next_id: i64,
}

impl Arena {
    fn alloc(&mut self, record: NodeRecord, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id.raw(),
            MemNode {
                record,
                parent,
                children: Vec::new(),
            },
        );
        id
    }
}

fn missing(id: NodeId) -> FsError {
    FsError::backend(format!("no such node: {}", id.raw()))
}

/// In-memory graph store backed by a node arena.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Arena>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn create_root(&self, record: NodeRecord) -> FsResult<FilesystemRoot> {
        let mut arena = self.inner.write();
        let id = arena.alloc(record, None);
        Ok(FilesystemRoot(id))
    }

    async fn node(&self, id: NodeId) -> FsResult<NodeRecord> {
        let arena = self.inner.read();
        arena
            .nodes
            .get(&id.raw())
            .map(|n| n.record.clone())
            .ok_or_else(|| missing(id))
    }

    async fn scan_children(&self, parent: NodeId, limit: usize) -> FsResult<ChildScan> {
        let arena = self.inner.read();
        let node = arena.nodes.get(&parent.raw()).ok_or_else(|| missing(parent))?;
        let truncated = node.children.len() > limit;
        let children = node
            .children
            .iter()
            .take(limit)
            .filter_map(|cid| arena.nodes.get(&cid.raw()).map(|c| (*cid, c.record.clone())))
            .collect();
        Ok(ChildScan {
            children,
            truncated,
        })
    }

    async fn insert_child(&self, parent: NodeId, record: NodeRecord) -> FsResult<NodeId> {
        let mut arena = self.inner.write();
        if !arena.nodes.contains_key(&parent.raw()) {
            return Err(missing(parent));
        }
        let id = arena.alloc(record, Some(parent));
        if let Some(p) = arena.nodes.get_mut(&parent.raw()) {
            p.children.push(id);
        }
        Ok(id)
    }

    async fn update_node(&self, id: NodeId, record: NodeRecord) -> FsResult<()> {
        let mut arena = self.inner.write();
        match arena.nodes.get_mut(&id.raw()) {
            Some(node) => {
                node.record = record;
                Ok(())
            }
            None => Err(missing(id)),
        }
    }

    async fn remove_node(&self, id: NodeId) -> FsResult<()> {
        let mut arena = self.inner.write();
        let node = arena.nodes.remove(&id.raw()).ok_or_else(|| missing(id))?;
        if let Some(parent) = node.parent {
            if let Some(p) = arena.nodes.get_mut(&parent.raw()) {
                p.children.retain(|c| *c != id);
            }
        }
        Ok(())
    }
}
