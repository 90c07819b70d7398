// ABOUTME: Version-control access used by the hook and the executor.
// ABOUTME: Commit metadata types, the VersionControl trait, and its svn implementation.

mod commit;
mod error;
mod log;
mod svn;

pub use commit::{ChangedPath, CommitEvent, PathAction};
pub use error::VcsError;
pub use log::parse_log;
pub use svn::SvnClient;

use async_trait::async_trait;
use std::path::Path;

use crate::types::RepositoryUrl;

/// Operations the pipeline needs from the version-control system.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Fetch the single commit `revision` of `repository`, with changed paths.
    ///
    /// Returns `None` when the log query yields no entry.
    async fn log_revision(
        &self,
        repository: &RepositoryUrl,
        revision: u64,
    ) -> Result<Option<CommitEvent>, VcsError>;

    /// Succeeds only if `path` is a valid working copy.
    async fn info(&self, path: &Path) -> Result<(), VcsError>;

    /// Check out `url` into the (absent) directory `path`.
    async fn checkout(&self, url: &str, path: &Path) -> Result<(), VcsError>;

    /// Switch the working copy at `path` to `url`.
    async fn switch(&self, url: &str, path: &Path) -> Result<(), VcsError>;
}
