// ABOUTME: CommandRunner trait and the tokio-backed ProcessRunner.
// ABOUTME: Captures stdout/stderr through shared or separate file handles.

use async_trait::async_trait;
use std::ffi::CString;
use std::fs::File;
use std::io::{self, SeekFrom};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::process::Command;

use super::command::{CommandSpec, OutputCapture};
use super::outcome::{CommandOutput, ExitState, OutputRef};

/// Errors raised before or while launching a command.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not executable", .0.display())]
    NotExecutable(PathBuf),

    #[error("failed to inspect {}: {source}", .path.display())]
    Inspect { path: PathBuf, source: io::Error },

    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        source: io::Error,
    },

    #[error("failed to capture output of {program}: {source}")]
    Capture {
        program: String,
        source: io::Error,
    },
}

/// Runs a [`CommandSpec`] to completion.
///
/// Implementations block (asynchronously) until the child has exited and its
/// output is fully drained. No timeout is applied.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, LaunchError>;
}

#[async_trait]
impl<T: CommandRunner + ?Sized> CommandRunner for Arc<T> {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, LaunchError> {
        (**self).run(spec).await
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, LaunchError> {
        let program = spec.program_name();
        let capture_err = |source| LaunchError::Capture {
            program: program.clone(),
            source,
        };

        // Unless stdout is kept apart, both streams share one file so their
        // interleaving is preserved and the child can never block on a full pipe.
        let sink = match &spec.capture {
            OutputCapture::Buffered | OutputCapture::Stdout => tempfile::tempfile(),
            OutputCapture::File(path) => File::create(path),
        }
        .map_err(capture_err)?;
        let errors = match &spec.capture {
            OutputCapture::Stdout => Some(tempfile::tempfile().map_err(capture_err)?),
            OutputCapture::Buffered | OutputCapture::File(_) => None,
        };
        let stdout = sink.try_clone().map_err(capture_err)?;
        let stderr = errors
            .as_ref()
            .unwrap_or(&sink)
            .try_clone()
            .map_err(capture_err)?;

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }
        if !spec.inherit_env {
            command.env_clear();
        }
        command.envs(&spec.env);

        tracing::debug!("Executing command: '{}'", spec);
        let status = command
            .status()
            .await
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;

        let exit = ExitState::from(status);
        let output = match (&spec.capture, errors) {
            (OutputCapture::File(path), _) => OutputRef::local_file(path.clone()),
            (_, None) => OutputRef::Captured(read_back(sink).await.map_err(capture_err)?),
            (_, Some(errors)) => {
                let mut text = read_back(sink).await.map_err(capture_err)?;
                let diagnostics = read_back(errors).await.map_err(capture_err)?;
                if !diagnostics.is_empty() {
                    if exit.success() {
                        tracing::debug!("{} wrote to stderr: {}", program, diagnostics.trim_end());
                    } else {
                        text.push_str(&diagnostics);
                    }
                }
                OutputRef::Captured(text)
            }
        };

        Ok(CommandOutput { exit, output })
    }
}

/// Rewind a capture file and read it back as text.
async fn read_back(file: File) -> io::Result<String> {
    let mut file = tokio::fs::File::from_std(file);
    file.seek(SeekFrom::Start(0)).await?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Check that `path` is a regular file the current user may execute.
pub fn ensure_executable(path: &Path) -> Result<(), LaunchError> {
    let metadata = std::fs::metadata(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LaunchError::NotFound(path.to_path_buf()),
        _ => LaunchError::Inspect {
            path: path.to_path_buf(),
            source,
        },
    })?;
    if !metadata.is_file() {
        return Err(LaunchError::NotExecutable(path.to_path_buf()));
    }

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| LaunchError::NotExecutable(path.to_path_buf()))?;
    // SAFETY: c_path is a valid NUL-terminated string that outlives the call.
    if unsafe { libc::access(c_path.as_ptr(), libc::X_OK) } != 0 {
        return Err(LaunchError::NotExecutable(path.to_path_buf()));
    }
    Ok(())
}
