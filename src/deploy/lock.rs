// ABOUTME: PID-file deploy lock guaranteeing one executor per host.
// ABOUTME: Stale records naming dead processes are reclaimed via a signal-0 probe.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors from acquiring or releasing the deploy lock.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("another deployment is already running (pid={pid}). Retry later...")]
    AlreadyRunning { pid: u32 },

    #[error("lock file ({}) found but doesn't contain a valid pid ({contents})", .path.display())]
    InvalidRecord { path: PathBuf, contents: String },

    #[error("failed to check whether pid {pid} is alive: {source}")]
    Probe { pid: u32, source: io::Error },

    #[error("failed to read lock file ({}): {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write lock file ({}): {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to delete lock file ({}): {source}", .path.display())]
    Remove { path: PathBuf, source: io::Error },
}

/// A held deploy lock.
///
/// Acquisition is a two-step check-then-write: the existing record is probed
/// for liveness, then our pid is written. Two instances racing through the
/// gap can both succeed; the loser then fails on the working copy, which the
/// svn client locks during checkout and switch. Callers only see
/// [`DeployLock::acquire`] and [`DeployLock::release`], so switching to an
/// exclusive-create primitive does not affect them.
///
/// The record is removed by [`DeployLock::release`] or, failing that, on drop.
#[derive(Debug)]
pub struct DeployLock {
    path: PathBuf,
    released: bool,
}

impl DeployLock {
    /// Acquire the lock at `path` for the current process.
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let pid = parse_record(path, &contents)?;
                if process_alive(pid)? {
                    return Err(LockError::AlreadyRunning { pid });
                }
                tracing::debug!(
                    "Reclaiming stale lock file {} (pid {} is not running)",
                    path.display(),
                    pid
                );
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(LockError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        fs::write(path, std::process::id().to_string()).map_err(|source| LockError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the lock record. A record already gone is not an error.
    pub fn release(mut self) -> Result<(), LockError> {
        self.released = true;
        remove_record(&self.path)
    }
}

impl Drop for DeployLock {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_record(&self.path) {
            tracing::warn!("{}", e);
        }
    }
}

fn remove_record(path: &Path) -> Result<(), LockError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(LockError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_record(path: &Path, contents: &str) -> Result<u32, LockError> {
    let first_line = contents.lines().next().unwrap_or("").trim();
    first_line
        .parse::<u32>()
        .ok()
        .filter(|pid| *pid > 0 && i32::try_from(*pid).is_ok())
        .ok_or_else(|| LockError::InvalidRecord {
            path: path.to_path_buf(),
            contents: first_line.to_string(),
        })
}

/// Probe `pid` with signal 0.
///
/// `ESRCH` means the process is gone. Any other failure, including `EPERM`,
/// is reported rather than guessed at.
pub fn process_alive(pid: u32) -> Result<bool, LockError> {
    let raw = i32::try_from(pid).map_err(|_| LockError::Probe {
        pid,
        source: io::Error::from(io::ErrorKind::InvalidInput),
    })?;

    // SAFETY: signal 0 performs the existence and permission checks only;
    // nothing is delivered. `raw` is positive, so no process group is targeted.
    let result = unsafe { libc::kill(raw, 0) };
    if result == 0 {
        return Ok(true);
    }

    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(false)
    } else {
        Err(LockError::Probe { pid, source: err })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_process_is_alive() {
        assert!(process_alive(std::process::id()).unwrap());
    }

    #[test]
    fn pid_beyond_pid_max_is_dead() {
        // Linux caps pid_max at 2^22.
        assert!(!process_alive(99_999_999).unwrap());
    }

    #[test]
    fn record_must_hold_a_positive_pid() {
        let path = Path::new("/var/lock/tagdeploy");
        assert_eq!(parse_record(path, "1234\n").unwrap(), 1234);
        assert!(matches!(
            parse_record(path, "not-a-pid"),
            Err(LockError::InvalidRecord { .. })
        ));
        assert!(matches!(
            parse_record(path, "0"),
            Err(LockError::InvalidRecord { .. })
        ));
        assert!(matches!(
            parse_record(path, ""),
            Err(LockError::InvalidRecord { .. })
        ));
    }
}
