//! # graphfs
//!
//! Persistent, path-addressed virtual filesystem on a graph-oriented store.
//!
//! Directory structure is a graph, not a nested document: each entry is a
//! node carrying attributes, hierarchy lives in parent→child edges, and one
//! [`FilesystemRoot`] anchors each tenant's tree. The public [`Filesystem`]
//! façade owns all path semantics, existence policy, and encoding logic and
//! talks to storage only through the narrow [`Connector`] contract;
//! [`GraphConnector`] implements that contract by resolving paths one
//! single-hop child scan at a time.
//!
//! Not POSIX: no symlinks, hard links, file descriptors, or streaming I/O.
//! Permission bits are stored faithfully but never enforced, and concurrent
//! writers get last-write-wins semantics at best.

pub mod connector;
pub mod entry;
pub mod error;
pub mod fs;
pub mod graph;
pub mod path;
pub mod perms;
pub mod seed;

pub use connector::Connector;
pub use entry::{Encoding, Entry, EntryMeta, FileData, now_millis};
pub use error::{FsError, FsResult};
pub use fs::{Filesystem, Stat};
pub use graph::{
    ChildScan, DEFAULT_SCAN_LIMIT, FilesystemRoot, GraphConnector, GraphStore, MemoryStore,
    NodeId, NodeKind, NodeRecord, SqliteStore,
};
pub use path::ParsedPath;
pub use perms::{Access, PermissionSet};
pub use seed::seed_default_tree;
