// ABOUTME: Application-wide error types for tagdeploy.
// ABOUTME: Every fatal condition of either subcommand ends up here and exits with status 2.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::deploy::{DeployError, DeployErrorKind};
use crate::dispatch::DispatchError;
use crate::types::RepositoryUrl;
use crate::vcs::VcsError;

/// Process exit status for any fatal error.
pub const EXIT_FATAL: u8 = 2;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("failed to read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot determine install root: {0}")]
    InstallRoot(String),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("failed to retrieve log message for {repository}:{revision}: {source}")]
    Log {
        repository: RepositoryUrl,
        revision: u64,
        source: VcsError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    AlreadyRunning,
    Lock,
    Sync,
    Launch,
    Build,
    Dispatch,
    Vcs,
    Io,
}

impl Error {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConfigNotFound(_)
            | Error::ConfigRead { .. }
            | Error::InvalidConfig(_)
            | Error::InstallRoot(_)
            | Error::Yaml(_) => ErrorKind::Config,
            Error::Deploy(e) => match e.kind() {
                DeployErrorKind::AlreadyRunning => ErrorKind::AlreadyRunning,
                DeployErrorKind::Lock => ErrorKind::Lock,
                DeployErrorKind::Sync => ErrorKind::Sync,
                DeployErrorKind::Launch => ErrorKind::Launch,
                DeployErrorKind::Build => ErrorKind::Build,
            },
            Error::Dispatch(_) => ErrorKind::Dispatch,
            Error::Log { .. } => ErrorKind::Vcs,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Every fatal error maps to the same status.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(EXIT_FATAL)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
