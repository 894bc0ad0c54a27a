//! Graph-backed storage: trees of nodes linked by parent→child edges.
//!
//! Each entry is a node carrying the persisted attribute set; hierarchy
//! lives entirely in the edges. A [`FilesystemRoot`] anchors one independent
//! tree (one per tenant). [`GraphConnector`] implements the
//! [`Connector`](crate::connector::Connector) contract on top of any
//! [`GraphStore`], resolving paths with one single-hop child scan per
//! component.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::connector::Connector;
use crate::entry::{Encoding, Entry, EntryMeta};
use crate::error::{FsError, FsResult};
use crate::path;
use crate::perms::PermissionSet;

/// Default cap on a single-hop child scan during path resolution.
pub const DEFAULT_SCAN_LIMIT: usize = 500;

/// Opaque backend-assigned node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) i64);

impl NodeId {
    /// Raw backend id, for logging.
    pub fn raw(&self) -> i64 {
        self.0
    }
}

/// Root node anchoring one independent hierarchical tree.
///
/// Always a directory; never carries a parent edge. The session layer holds
/// one per tenant and hands it to the connector at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemRoot(pub(crate) NodeId);

impl FilesystemRoot {
    /// The root's node id.
    pub fn node(&self) -> NodeId {
        self.0
    }
}

/// Node type tag as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Directory => "DIRECTORY",
            NodeKind::File => "FILE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DIRECTORY" => Some(NodeKind::Directory),
            "FILE" => Some(NodeKind::File),
            _ => None,
        }
    }
}

/// Persisted attribute set for one node.
///
/// `path` is a denormalized cache of the node's full path. It is kept
/// consistent by the write path and never trusted independently of
/// traversal: resolution always walks edges and merely filters on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub kind: NodeKind,
    pub path: String,
    pub permissions: PermissionSet,
    pub created_at: i64,
    pub last_modified: i64,
    pub contents: Option<Vec<u8>>,
    pub encoding: Option<Encoding>,
}

impl NodeRecord {
    /// Build the record for `entry` stored at `path`.
    pub fn from_entry(path: &str, entry: &Entry) -> Self {
        let meta = *entry.meta();
        let (kind, contents, encoding) = match entry {
            Entry::Directory { .. } => (NodeKind::Directory, None, None),
            Entry::File {
                contents, encoding, ..
            } => (NodeKind::File, Some(contents.clone()), Some(*encoding)),
        };
        Self {
            kind,
            path: path.to_string(),
            permissions: meta.permissions,
            created_at: meta.created_at,
            last_modified: meta.last_modified,
            contents,
            encoding,
        }
    }

    /// Reconstruct the entry value from stored attributes.
    pub fn to_entry(&self) -> Entry {
        let meta = EntryMeta {
            permissions: self.permissions,
            created_at: self.created_at,
            last_modified: self.last_modified,
        };
        match self.kind {
            NodeKind::Directory => Entry::directory(meta),
            NodeKind::File => Entry::file(
                meta,
                self.contents.clone().unwrap_or_default(),
                self.encoding.unwrap_or(Encoding::Binary),
            ),
        }
    }

    /// Directory record with fresh metadata, used for tree roots.
    pub fn root() -> Self {
        Self::from_entry("/", &Entry::directory(EntryMeta::now()))
    }
}

/// Result of a capped single-hop child scan.
#[derive(Debug, Clone)]
pub struct ChildScan {
    /// Up to `limit` direct children as (id, record) pairs.
    pub children: Vec<(NodeId, NodeRecord)>,
    /// True when the scan stopped at the cap with children unread.
    pub truncated: bool,
}

/// Backend graph primitives the connector is built from.
///
/// Implementations treat each call as a point operation that may fail
/// transiently; no retry happens at this layer.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create a detached root node, anchoring a fresh tree.
    async fn create_root(&self, record: NodeRecord) -> FsResult<FilesystemRoot>;

    /// Fetch one node's stored attributes.
    async fn node(&self, id: NodeId) -> FsResult<NodeRecord>;

    /// Single-hop enumeration of direct children, capped at `limit` rows.
    async fn scan_children(&self, parent: NodeId, limit: usize) -> FsResult<ChildScan>;

    /// Insert a new node plus the parent→child edge to it.
    async fn insert_child(&self, parent: NodeId, record: NodeRecord) -> FsResult<NodeId>;

    /// Overwrite a node's attributes in place. Outgoing edges are untouched.
    async fn update_node(&self, id: NodeId, record: NodeRecord) -> FsResult<()>;

    /// Delete a node and its inbound edge.
    async fn remove_node(&self, id: NodeId) -> FsResult<()>;
}

#[async_trait]
impl<S: GraphStore + ?Sized> GraphStore for Arc<S> {
    async fn create_root(&self, record: NodeRecord) -> FsResult<FilesystemRoot> {
        (**self).create_root(record).await
    }

    async fn node(&self, id: NodeId) -> FsResult<NodeRecord> {
        (**self).node(id).await
    }

    async fn scan_children(&self, parent: NodeId, limit: usize) -> FsResult<ChildScan> {
        (**self).scan_children(parent, limit).await
    }

    async fn insert_child(&self, parent: NodeId, record: NodeRecord) -> FsResult<NodeId> {
        (**self).insert_child(parent, record).await
    }

    async fn update_node(&self, id: NodeId, record: NodeRecord) -> FsResult<()> {
        (**self).update_node(id, record).await
    }

    async fn remove_node(&self, id: NodeId) -> FsResult<()> {
        (**self).remove_node(id).await
    }
}

/// Connector that resolves paths by walking a graph of nodes and edges.
///
/// Resolution starts at the tree root and performs one single-hop scan per
/// path component, filtering children on their stored `path` attribute, so a
/// path of depth `n` costs exactly `n` hops. Every hop is bounded by the
/// scan limit; hitting the cap without a match is a distinct
/// `TraversalLimitExceeded` failure, never `NotFound` — a truncated scan
/// must not masquerade as an absent path.
///
/// `place` is not atomic across its scan-then-create-or-update sequence:
/// two concurrent writers creating the same new path can both observe
/// "absent" and insert duplicate siblings. Guarding against that requires a
/// backend uniqueness constraint and is outside this connector's contract.
pub struct GraphConnector<S> {
    store: S,
    root: FilesystemRoot,
    scan_limit: usize,
}

impl<S: GraphStore> GraphConnector<S> {
    /// Bind a connector to one tree in `store`.
    pub fn new(store: S, root: FilesystemRoot) -> Self {
        Self {
            store,
            root,
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    /// Override the per-hop child-scan cap.
    pub fn with_scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = limit;
        self
    }

    /// The tree this connector operates on.
    pub fn root(&self) -> FilesystemRoot {
        self.root
    }

    /// Resolve a path to its node id, one hop per component.
    async fn resolve(&self, target: &str) -> FsResult<NodeId> {
        path::validate(target)?;
        let mut current = self.root.node();
        let mut prefix = String::new();
        for comp in path::components(target) {
            prefix.push('/');
            prefix.push_str(comp);
            let scan = self.store.scan_children(current, self.scan_limit).await?;
            match scan.children.iter().find(|(_, rec)| rec.path == prefix) {
                Some((id, _)) => current = *id,
                None if scan.truncated => return Err(FsError::traversal_limit(prefix)),
                None => return Err(FsError::not_found(target)),
            }
        }
        Ok(current)
    }
}

#[async_trait]
impl<S: GraphStore> Connector for GraphConnector<S> {
    async fn retrieve(&self, target: &str) -> FsResult<Entry> {
        let id = self.resolve(target).await?;
        let record = self.store.node(id).await?;
        Ok(record.to_entry())
    }

    async fn place(&self, target: &str, entry: Entry) -> FsResult<()> {
        path::validate(target)?;
        if target == "/" {
            if !entry.is_dir() {
                return Err(FsError::not_a_directory(target));
            }
            let record = NodeRecord::from_entry("/", &entry);
            return self.store.update_node(self.root.node(), record).await;
        }

        // Resolve the parent first; its absence is the caller's problem,
        // never auto-created here.
        let parent_path = path::dirname(target);
        let parent = self.resolve(parent_path).await?;
        let parent_record = self.store.node(parent).await?;
        if parent_record.kind != NodeKind::Directory {
            return Err(FsError::not_a_directory(parent_path));
        }

        let record = NodeRecord::from_entry(target, &entry);
        let scan = self.store.scan_children(parent, self.scan_limit).await?;
        match scan.children.iter().find(|(_, rec)| rec.path == target) {
            Some((id, _)) => self.store.update_node(*id, record).await,
            None if scan.truncated => Err(FsError::traversal_limit(target.to_string())),
            None => {
                let id = self.store.insert_child(parent, record).await?;
                tracing::debug!(path = target, id = id.raw(), "created node");
                Ok(())
            }
        }
    }

    async fn contains(&self, target: &str) -> FsResult<bool> {
        match self.resolve(target).await {
            Ok(_) => Ok(true),
            Err(FsError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn list_children(&self, target: &str) -> FsResult<Vec<String>> {
        let id = self.resolve(target).await?;
        let record = self.store.node(id).await?;
        if record.kind != NodeKind::Directory {
            return Err(FsError::not_a_directory(target));
        }
        let scan = self.store.scan_children(id, self.scan_limit).await?;
        if scan.truncated {
            return Err(FsError::traversal_limit(target.to_string()));
        }
        Ok(scan
            .children
            .iter()
            .map(|(_, rec)| path::basename(&rec.path).to_string())
            .collect())
    }

    async fn remove(&self, target: &str) -> FsResult<()> {
        let id = self.resolve(target).await?;
        if id == self.root.node() {
            return Err(FsError::invalid_path("cannot remove the tree root"));
        }
        self.store.remove_node(id).await?;
        tracing::debug!(path = target, "removed node");
        Ok(())
    }
}
