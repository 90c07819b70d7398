// ABOUTME: Error types for one deployment attempt.
// ABOUTME: Lock, sync, launch, and build failures, each short-circuiting the rest.

use super::build::BuildError;
use super::lock::LockError;
use super::sync::SyncError;
use crate::process::LaunchError;

/// Terminal failure of a deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Another live executor holds the lock.
    AlreadyRunning,
    /// Lock record could not be read, written, or probed.
    Lock,
    Sync,
    Launch,
    Build,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Lock(LockError::AlreadyRunning { .. }) => DeployErrorKind::AlreadyRunning,
            DeployError::Lock(_) => DeployErrorKind::Lock,
            DeployError::Sync(_) => DeployErrorKind::Sync,
            DeployError::Launch(_) => DeployErrorKind::Launch,
            DeployError::Build(_) => DeployErrorKind::Build,
        }
    }

    /// Pid of the running executor, if this is an `AlreadyRunning` failure.
    pub fn lock_holder(&self) -> Option<u32> {
        match self {
            DeployError::Lock(LockError::AlreadyRunning { pid }) => Some(*pid),
            _ => None,
        }
    }
}
