//! Virtual path helpers.
//!
//! Paths are normalized absolute `/`-separated strings; `"/"` is the root.
//! Resolving `.`, `..`, and `~` is the caller's responsibility — this module
//! only validates shape and splits paths apart.

use serde::{Deserialize, Serialize};

use crate::error::{FsError, FsResult};

/// Check that a path is absolute and normalized.
pub fn validate(path: &str) -> FsResult<()> {
    if path == "/" {
        return Ok(());
    }
    if !path.starts_with('/') {
        return Err(FsError::invalid_path(format!("not absolute: {path}")));
    }
    if path.ends_with('/') {
        return Err(FsError::invalid_path(format!("trailing slash: {path}")));
    }
    for part in path[1..].split('/') {
        if part.is_empty() || part == "." || part == ".." {
            return Err(FsError::invalid_path(format!("not normalized: {path}")));
        }
    }
    Ok(())
}

/// Parent path. The parent of `"/"` is `"/"`.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "/",
    }
}

/// Final path component. The basename of `"/"` is empty.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Path components below the root, in order.
pub fn components(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/')
        .unwrap_or(path)
        .split('/')
        .filter(|c| !c.is_empty())
}

/// Absolute prefixes of a path, root to leaf, excluding `"/"` itself.
///
/// `ancestors("/a/b/c")` yields `"/a"`, `"/a/b"`, `"/a/b/c"`.
pub fn ancestors(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut prefix = String::new();
    for comp in components(path) {
        prefix.push('/');
        prefix.push_str(comp);
        out.push(prefix.clone());
    }
    out
}

/// Parsed components of a path, in the shape shell callers expect from stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPath {
    /// Directory portion (`"/home/amy"` for `"/home/amy/notes.txt"`).
    pub dir: String,
    /// Final component including any extension (`"notes.txt"`).
    pub base: String,
    /// Final component without its extension (`"notes"`).
    pub stem: String,
    /// Extension including the leading dot (`".txt"`); empty when absent.
    pub ext: String,
}

/// Split a path into its parsed components.
///
/// Dotfiles keep their full name as the stem: `".bashrc"` has no extension.
pub fn parse(path: &str) -> ParsedPath {
    let dir = dirname(path).to_string();
    let base = basename(path).to_string();
    let (stem, ext) = match base.rfind('.') {
        Some(i) if i > 0 => (base[..i].to_string(), base[i..].to_string()),
        _ => (base.clone(), String::new()),
    };
    ParsedPath {
        dir,
        base,
        stem,
        ext,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(validate("/").is_ok());
        assert!(validate("/home/amy").is_ok());
        assert!(validate("home/amy").is_err());
        assert!(validate("/home/").is_err());
        assert!(validate("/home//amy").is_err());
        assert!(validate("/home/./amy").is_err());
        assert!(validate("/home/../amy").is_err());
    }

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("/"), "/");
        assert_eq!(dirname("/home"), "/");
        assert_eq!(dirname("/home/amy"), "/home");
        assert_eq!(dirname("/home/amy/notes.txt"), "/home/amy");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/"), "");
        assert_eq!(basename("/home"), "home");
        assert_eq!(basename("/home/amy/notes.txt"), "notes.txt");
    }

    #[test]
    fn test_components_and_ancestors() {
        let comps: Vec<_> = components("/a/b/c").collect();
        assert_eq!(comps, vec!["a", "b", "c"]);
        assert_eq!(components("/").count(), 0);

        assert_eq!(ancestors("/a/b/c"), vec!["/a", "/a/b", "/a/b/c"]);
        assert!(ancestors("/").is_empty());
    }

    #[test]
    fn test_parse() {
        let parsed = parse("/home/amy/notes.txt");
        assert_eq!(parsed.dir, "/home/amy");
        assert_eq!(parsed.base, "notes.txt");
        assert_eq!(parsed.stem, "notes");
        assert_eq!(parsed.ext, ".txt");

        let noext = parse("/bin/ls");
        assert_eq!(noext.stem, "ls");
        assert_eq!(noext.ext, "");

        let dotfile = parse("/home/amy/.bashrc");
        assert_eq!(dotfile.stem, ".bashrc");
        assert_eq!(dotfile.ext, "");
    }
}
