//! Filesystem error types.

use thiserror::Error;

/// Error type for façade and connector operations.
///
/// Every variant carries the offending path so the caller can log and
/// remediate; nothing in this crate retries or silently recovers.
#[derive(Debug, Error)]
pub enum FsError {
    /// A required path (or one of its ancestors) is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation requires a file but found a directory.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// The operation requires a directory but found a file.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Creation collision.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Non-recursive directory removal blocked by children.
    #[error("directory not empty: {0}")]
    NotEmpty(String),

    /// A single-hop child scan hit its configured cap before resolving.
    ///
    /// A truncated scan is never reported as "path does not exist".
    #[error("traversal limit exceeded while scanning: {0}")]
    TraversalLimitExceeded(String),

    /// Malformed input path, or an attempt to remove a tree root.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// UTF-8 decoding was requested on contents that are not valid UTF-8.
    #[error("contents are not valid utf-8: {0}")]
    NotUtf8(String),

    /// Underlying storage fault.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl FsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: impl Into<String>) -> Self {
        Self::NotAFile(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Create a NotEmpty error.
    pub fn not_empty(path: impl Into<String>) -> Self {
        Self::NotEmpty(path.into())
    }

    /// Create a TraversalLimitExceeded error.
    pub fn traversal_limit(path: impl Into<String>) -> Self {
        Self::TraversalLimitExceeded(path.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a NotUtf8 error.
    pub fn not_utf8(path: impl Into<String>) -> Self {
        Self::NotUtf8(path.into())
    }

    /// Create a Backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Returns true for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<rusqlite::Error> for FsError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

/// Filesystem result type.
pub type FsResult<T> = Result<T, FsError>;
