//! Default tree seeding.
//!
//! Account creation gives every tenant the same starting shape: `/home`,
//! `/bin`, and a home directory named after the user. This is a thin caller
//! of the façade and safe to run again on an already-seeded tree.

use crate::connector::Connector;
use crate::error::FsResult;
use crate::fs::Filesystem;

/// Directories every fresh tree starts with.
const BASE_DIRS: &[&str] = &["/home", "/bin"];

/// Create the default tree shape for `username`. Idempotent.
pub async fn seed_default_tree<C: Connector>(fs: &Filesystem<C>, username: &str) -> FsResult<()> {
    for dir in BASE_DIRS {
        if !fs.exists(dir).await? {
            fs.mkdir(dir).await?;
        }
    }
    let home = format!("/home/{username}");
    if !fs.exists(&home).await? {
        fs.mkdir(&home).await?;
    }
    tracing::debug!(user = username, "seeded default tree");
    Ok(())
}
