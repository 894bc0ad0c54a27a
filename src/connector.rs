//! Storage connector contract.

use async_trait::async_trait;

use crate::entry::Entry;
use crate::error::FsResult;

/// Pluggable storage-backend contract consumed by the
/// [`Filesystem`](crate::fs::Filesystem) façade.
///
/// One connector instance is bound to one tree root; every method is keyed
/// by a normalized absolute path. The façade never touches storage except
/// through this trait, so backends can be swapped without changing any path
/// semantics.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Fetch the entry at `path`. Fails `NotFound` if the path is absent.
    async fn retrieve(&self, path: &str) -> FsResult<Entry>;

    /// Create the entry if absent, overwrite it in place if present.
    ///
    /// The parent directory must already resolve; ancestors are never
    /// auto-created. Overwriting an existing directory's attributes leaves
    /// its child edges intact.
    async fn place(&self, path: &str, entry: Entry) -> FsResult<()>;

    /// Presence check. Absence is `Ok(false)`, never a failure; other
    /// faults (including a truncated scan) still propagate.
    async fn contains(&self, path: &str) -> FsResult<bool>;

    /// Local names of the direct children of the directory at `path`.
    async fn list_children(&self, path: &str) -> FsResult<Vec<String>>;

    /// Delete the entry at `path` together with its inbound edge.
    async fn remove(&self, path: &str) -> FsResult<()>;
}
