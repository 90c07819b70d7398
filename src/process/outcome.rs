// ABOUTME: Result of a finished child process: exit state plus an output reference.
// ABOUTME: Signals are kept distinct from exit codes for diagnostics.

use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

/// How a child process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Normal exit with this status code.
    Code(i32),
    /// Killed by this signal number.
    Signal(i32),
}

impl ExitState {
    /// Decode a POSIX-style status where negative values mean "killed by signal".
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            ExitState::Signal(-raw)
        } else {
            ExitState::Code(raw)
        }
    }

    /// Inverse of [`ExitState::from_raw`].
    pub fn raw(&self) -> i32 {
        match self {
            ExitState::Code(code) => *code,
            ExitState::Signal(signal) => -signal,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitState::Code(0))
    }
}

impl From<ExitStatus> for ExitState {
    fn from(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match (status.code(), status.signal()) {
            (Some(code), _) => ExitState::Code(code),
            (None, Some(signal)) => ExitState::Signal(signal),
            (None, None) => ExitState::Code(-1),
        }
    }
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitState::Code(code) => write!(f, "status={}", code),
            ExitState::Signal(signal) => write!(f, "signal {}", signal),
        }
    }
}

/// Where the combined output of a child ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRef {
    /// Output held in memory.
    Captured(String),
    /// Output written to a file on `host`; reported by reference only.
    File { path: PathBuf, host: String },
}

impl OutputRef {
    /// Reference a file on the local host.
    pub fn local_file(path: PathBuf) -> Self {
        OutputRef::File {
            path,
            host: gethostname::gethostname().to_string_lossy().into_owned(),
        }
    }

    /// In-memory output, if any.
    pub fn captured(&self) -> Option<&str> {
        match self {
            OutputRef::Captured(text) => Some(text),
            OutputRef::File { .. } => None,
        }
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputRef::Captured(text) => write!(f, "{}", text),
            OutputRef::File { path, host } => write!(f, "See {} on {}", path.display(), host),
        }
    }
}

/// Exit state and output of one finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit: ExitState,
    pub output: OutputRef,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit.success()
    }
}
