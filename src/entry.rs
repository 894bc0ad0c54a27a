//! File and directory entries.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::perms::PermissionSet;

/// Advisory encoding tag for file contents.
///
/// Metadata only: reads always return the raw byte sequence, and no
/// transformation is applied based on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "binary")]
    Binary,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Binary => "binary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "utf-8" => Some(Encoding::Utf8),
            "binary" => Some(Encoding::Binary),
            _ => None,
        }
    }
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Metadata shared by files and directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    pub permissions: PermissionSet,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
    /// Last modification time, epoch milliseconds.
    pub last_modified: i64,
}

impl EntryMeta {
    /// Metadata for a freshly created entry: default permissions, both
    /// timestamps set to now.
    pub fn now() -> Self {
        let now = now_millis();
        Self {
            permissions: PermissionSet::default(),
            created_at: now,
            last_modified: now,
        }
    }
}

/// An entry in the tree: a directory or a file.
///
/// A tagged sum type, not a hierarchy — the two shapes differ in fields,
/// not behavior. Entries carry no path; addressing is the connector's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Entry {
    #[serde(rename = "DIRECTORY")]
    Directory {
        #[serde(flatten)]
        meta: EntryMeta,
    },
    #[serde(rename = "FILE")]
    File {
        #[serde(flatten)]
        meta: EntryMeta,
        contents: Vec<u8>,
        encoding: Encoding,
    },
}

impl Entry {
    /// Create a directory entry.
    pub fn directory(meta: EntryMeta) -> Self {
        Entry::Directory { meta }
    }

    /// Create a file entry.
    pub fn file(meta: EntryMeta, contents: Vec<u8>, encoding: Encoding) -> Self {
        Entry::File {
            meta,
            contents,
            encoding,
        }
    }

    pub fn meta(&self) -> &EntryMeta {
        match self {
            Entry::Directory { meta } => meta,
            Entry::File { meta, .. } => meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut EntryMeta {
        match self {
            Entry::Directory { meta } => meta,
            Entry::File { meta, .. } => meta,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File { .. })
    }
}

/// A write payload carrying its advisory encoding tag.
///
/// Text converts with a utf-8 tag, raw bytes with a binary tag, recovering
/// the string-vs-bytes write overloads shell callers expect.
#[derive(Debug, Clone)]
pub struct FileData {
    pub(crate) bytes: Vec<u8>,
    pub(crate) encoding: Encoding,
}

impl FileData {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl From<&str> for FileData {
    fn from(s: &str) -> Self {
        Self {
            bytes: s.as_bytes().to_vec(),
            encoding: Encoding::Utf8,
        }
    }
}

impl From<String> for FileData {
    fn from(s: String) -> Self {
        Self {
            bytes: s.into_bytes(),
            encoding: Encoding::Utf8,
        }
    }
}

impl From<&[u8]> for FileData {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            encoding: Encoding::Binary,
        }
    }
}

impl From<Vec<u8>> for FileData {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            encoding: Encoding::Binary,
        }
    }
}

impl<const N: usize> From<&[u8; N]> for FileData {
    fn from(bytes: &[u8; N]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            encoding: Encoding::Binary,
        }
    }
}
