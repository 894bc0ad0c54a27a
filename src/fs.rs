//! Filesystem façade: the public operation set over a [`Connector`].

use serde::{Deserialize, Serialize};

use crate::connector::Connector;
use crate::entry::{Entry, EntryMeta, FileData, now_millis};
use crate::error::{FsError, FsResult};
use crate::path::{self, ParsedPath};

/// Status of an entry plus its parsed path components.
///
/// Derived from the entry's type tag and the path string only; no content
/// or timestamp inspection happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub is_directory: bool,
    pub is_file: bool,
    #[serde(flatten)]
    pub path: ParsedPath,
}

/// Path-addressed virtual filesystem over a pluggable storage connector.
///
/// Owns all path semantics, existence policy, and encoding logic; storage is
/// reached only through the [`Connector`] contract. All operations take
/// normalized absolute paths — resolving `.`, `..`, and `~` is the caller's
/// responsibility. Every call re-resolves from the backend; no path cache is
/// kept, so the backend stays the single source of truth. Failures propagate
/// to the caller without retries.
pub struct Filesystem<C> {
    connector: C,
}

impl<C: Connector> Filesystem<C> {
    /// Wrap a connector bound to one tree.
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// The underlying connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Raw contents of the file at `path`.
    pub async fn read(&self, path: &str) -> FsResult<Vec<u8>> {
        match self.connector.retrieve(path).await? {
            Entry::File { contents, .. } => Ok(contents),
            Entry::Directory { .. } => Err(FsError::not_a_file(path)),
        }
    }

    /// Contents of the file at `path`, decoded as UTF-8.
    pub async fn read_to_string(&self, path: &str) -> FsResult<String> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes).map_err(|_| FsError::not_utf8(path))
    }

    /// Write `data` to the file at `path`, creating it if absent.
    ///
    /// An existing file keeps its creation time and permissions; contents,
    /// encoding tag, and last_modified are replaced. A fresh file gets
    /// default permissions and both timestamps set to now. The parent
    /// directory must already exist.
    pub async fn write(&self, path: &str, data: impl Into<FileData>) -> FsResult<()> {
        let data = data.into();
        let entry = match self.connector.retrieve(path).await {
            Ok(Entry::File { meta, .. }) => Entry::file(
                EntryMeta {
                    last_modified: now_millis(),
                    ..meta
                },
                data.bytes,
                data.encoding,
            ),
            Ok(Entry::Directory { .. }) => return Err(FsError::not_a_file(path)),
            Err(FsError::NotFound(_)) => Entry::file(EntryMeta::now(), data.bytes, data.encoding),
            Err(e) => return Err(e),
        };
        tracing::debug!(path, "write");
        self.connector.place(path, entry).await
    }

    /// Append `data` to the file at `path`.
    ///
    /// Concatenates after the current contents and applies the same update
    /// rules as `write`. On an absent path this behaves exactly as `write`.
    pub async fn append(&self, path: &str, data: impl Into<FileData>) -> FsResult<()> {
        let data = data.into();
        match self.connector.retrieve(path).await {
            Ok(Entry::File {
                meta, mut contents, ..
            }) => {
                contents.extend_from_slice(&data.bytes);
                let entry = Entry::file(
                    EntryMeta {
                        last_modified: now_millis(),
                        ..meta
                    },
                    contents,
                    data.encoding,
                );
                tracing::debug!(path, "append");
                self.connector.place(path, entry).await
            }
            Ok(Entry::Directory { .. }) => Err(FsError::not_a_file(path)),
            Err(FsError::NotFound(_)) => self.write(path, data).await,
            Err(e) => Err(e),
        }
    }

    /// Type tag and parsed path components of the entry at `path`.
    pub async fn stat(&self, path: &str) -> FsResult<Stat> {
        let entry = self.connector.retrieve(path).await?;
        Ok(Stat {
            is_directory: entry.is_dir(),
            is_file: entry.is_file(),
            path: path::parse(path),
        })
    }

    /// Presence check. Absence is `Ok(false)`, never an error.
    pub async fn exists(&self, path: &str) -> FsResult<bool> {
        self.connector.contains(path).await
    }

    /// Create a directory at `path`; the parent must already exist.
    pub async fn mkdir(&self, path: &str) -> FsResult<()> {
        if self.connector.contains(path).await? {
            return Err(FsError::already_exists(path));
        }
        tracing::debug!(path, "mkdir");
        self.connector
            .place(path, Entry::directory(EntryMeta::now()))
            .await
    }

    /// Create `path` and every missing ancestor, root to leaf.
    ///
    /// Existing directories along the way are skipped; an ancestor that is
    /// a file fails `NotADirectory`. Idempotent.
    pub async fn mkdirp(&self, path: &str) -> FsResult<()> {
        path::validate(path)?;
        for prefix in path::ancestors(path) {
            if self.connector.contains(&prefix).await? {
                if !self.connector.retrieve(&prefix).await?.is_dir() {
                    return Err(FsError::not_a_directory(prefix));
                }
            } else {
                self.connector
                    .place(&prefix, Entry::directory(EntryMeta::now()))
                    .await?;
            }
        }
        Ok(())
    }

    /// Remove the file at `path` and its inbound edge.
    pub async fn rm(&self, path: &str) -> FsResult<()> {
        if !self.connector.retrieve(path).await?.is_file() {
            return Err(FsError::not_a_file(path));
        }
        tracing::debug!(path, "rm");
        self.connector.remove(path).await
    }

    /// Remove the empty directory at `path`. Non-recursive: any child at
    /// all blocks the removal with `NotEmpty`.
    pub async fn rmdir(&self, path: &str) -> FsResult<()> {
        if !self.connector.retrieve(path).await?.is_dir() {
            return Err(FsError::not_a_directory(path));
        }
        if !self.connector.list_children(path).await?.is_empty() {
            return Err(FsError::not_empty(path));
        }
        tracing::debug!(path, "rmdir");
        self.connector.remove(path).await
    }

    /// Local names of the entries directly under the directory at `path`.
    ///
    /// Order is not guaranteed.
    pub async fn list_directory(&self, path: &str) -> FsResult<Vec<String>> {
        self.connector.list_children(path).await
    }
}
