// ABOUTME: Brings the local working copy onto the requested tag.
// ABOUTME: Validates or recreates the replica, then switches with bounded retries.

use std::io;
use std::path::{Path, PathBuf};

use crate::diagnostics::{Diagnostics, Warning};
use crate::vcs::{VcsError, VersionControl};

/// Errors that leave the working copy unsynchronized.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to delete invalid working copy {}: {source}", .path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("could not validate working copy {}: {source}", .path.display())]
    Validate { path: PathBuf, source: VcsError },

    #[error("failed to switch working copy to new tag after {attempts} attempt(s): {source}")]
    SwitchFailed { attempts: u32, source: VcsError },
}

/// Progress of the switch loop for one tag.
#[derive(Debug)]
struct SwitchAttempt<'a> {
    url: &'a str,
    attempt: u32,
    last_error: Option<VcsError>,
}

/// Synchronizes the working copy at `root` with a tag URL.
pub struct WorkingCopySync<'a, V: ?Sized> {
    vcs: &'a V,
    root: &'a Path,
    max_attempts: u32,
}

impl<'a, V: VersionControl + ?Sized> WorkingCopySync<'a, V> {
    /// `switch_retries` is the total number of switch attempts; at least one
    /// attempt is always made.
    pub fn new(vcs: &'a V, root: &'a Path, switch_retries: u32) -> Self {
        Self {
            vcs,
            root,
            max_attempts: switch_retries.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn sync(&self, url: &str, diag: &mut Diagnostics) -> Result<(), SyncError> {
        self.discard_invalid(diag).await?;

        if !self.root.exists() {
            tracing::info!("Checking out {} into {}", url, self.root.display());
            if let Err(e) = self.vcs.checkout(url, self.root).await {
                // The switch below gets a chance to complete a partial checkout.
                diag.warn(Warning::checkout_failed(format!(
                    "Error during checkout of {}. Trying to continue: {}",
                    url, e
                )));
            }
        }

        self.switch_with_retry(url).await
    }

    /// Remove the working copy root if it is not a valid replica.
    ///
    /// Only a client that ran and rejected the directory counts as proof of an
    /// invalid replica. Any other failure leaves the directory untouched.
    async fn discard_invalid(&self, diag: &mut Diagnostics) -> Result<(), SyncError> {
        let root = self.root;
        let metadata = match tokio::fs::symlink_metadata(root).await {
            Ok(metadata) => metadata,
            Err(_) => return Ok(()),
        };

        let removal = if metadata.is_dir() {
            tracing::debug!("Checking {} is a valid working copy", root.display());
            match self.vcs.info(root).await {
                Ok(()) => return Ok(()),
                Err(e @ VcsError::Command { .. }) => {
                    diag.warn(Warning::invalid_working_copy(format!(
                        "{} is not a valid working copy ({}). Deleting and checking out again...",
                        root.display(),
                        e
                    )));
                    tokio::fs::remove_dir_all(root).await
                }
                Err(source) => {
                    return Err(SyncError::Validate {
                        path: root.to_path_buf(),
                        source,
                    });
                }
            }
        } else {
            diag.warn(Warning::invalid_working_copy(format!(
                "{} is not a directory. Deleting and checking out again...",
                root.display()
            )));
            tokio::fs::remove_file(root).await
        };

        removal.map_err(|source| SyncError::Remove {
            path: root.to_path_buf(),
            source,
        })
    }

    async fn switch_with_retry(&self, url: &str) -> Result<(), SyncError> {
        let mut state = SwitchAttempt {
            url,
            attempt: 0,
            last_error: None,
        };

        while state.attempt < self.max_attempts {
            state.attempt += 1;
            if state.last_error.is_some() {
                tracing::debug!(
                    "Switch to {} failed. Retrying ({}/{})...",
                    state.url,
                    state.attempt,
                    self.max_attempts
                );
            } else {
                tracing::info!("Switching to tag (url={})", state.url);
            }

            match self.vcs.switch(state.url, self.root).await {
                Ok(()) => return Ok(()),
                Err(e) => state.last_error = Some(e),
            }
        }

        match state.last_error {
            Some(source) => Err(SyncError::SwitchFailed {
                attempts: state.attempt,
                source,
            }),
            None => Ok(()),
        }
    }
}
