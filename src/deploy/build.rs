// ABOUTME: Runs the build/publish command inside the synchronized working copy.
// ABOUTME: Controlled environment, combined output capture, exit status classification.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::DeployError;
use crate::config::BuildSettings;
use crate::process::{
    CommandOutput, CommandRunner, CommandSpec, ExitState, OutputCapture, OutputRef,
    ensure_executable,
};

/// Runtime location variable handed to the build tool.
pub const RUNTIME_HOME_VAR: &str = "JAVA_HOME";
/// Optional tuning flags for the build tool.
pub const TUNING_OPTS_VAR: &str = "ANT_OPTS";

/// The build tool ran and reported failure.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("error during build command (status={status}). Command output:\n{output}")]
    Failed { status: i32, output: OutputRef },

    #[error("build command aborted by signal {signal}. Command output:\n{output}")]
    Signaled { signal: i32, output: OutputRef },
}

impl BuildError {
    pub fn exit(&self) -> ExitState {
        match self {
            BuildError::Failed { status, .. } => ExitState::Code(*status),
            BuildError::Signaled { signal, .. } => ExitState::Signal(*signal),
        }
    }

    pub fn output(&self) -> &OutputRef {
        match self {
            BuildError::Failed { output, .. } | BuildError::Signaled { output, .. } => output,
        }
    }
}

/// Map a finished build to success or [`BuildError`].
pub fn classify_exit(result: CommandOutput) -> Result<OutputRef, BuildError> {
    match result.exit {
        ExitState::Code(0) => Ok(result.output),
        ExitState::Code(status) => Err(BuildError::Failed {
            status,
            output: result.output,
        }),
        ExitState::Signal(signal) => Err(BuildError::Signaled {
            signal,
            output: result.output,
        }),
    }
}

/// Build invocation bound to one working copy.
#[derive(Debug, Clone)]
pub struct BuildRunner {
    command: PathBuf,
    target: String,
    working_copy: PathBuf,
    env: BTreeMap<String, String>,
    capture: OutputCapture,
}

impl BuildRunner {
    pub fn new(settings: &BuildSettings, working_copy: &Path) -> Self {
        let mut env = BTreeMap::new();
        env.insert(
            RUNTIME_HOME_VAR.to_string(),
            settings.java_home.display().to_string(),
        );
        if let Some(opts) = &settings.opts {
            tracing::debug!("Defining {} as \"{}\"", TUNING_OPTS_VAR, opts);
            env.insert(TUNING_OPTS_VAR.to_string(), opts.clone());
        }

        Self {
            // Absolute commands are kept; relative ones live in the working copy.
            command: working_copy.join(&settings.command),
            target: settings.target.clone(),
            working_copy: working_copy.to_path_buf(),
            env,
            capture: settings.output.capture(),
        }
    }

    pub fn command_path(&self) -> &Path {
        &self.command
    }

    pub fn spec(&self) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.command)
            .arg(&self.target)
            .current_dir(&self.working_copy)
            .clear_env()
            .capture(self.capture.clone());
        for (key, value) in &self.env {
            spec = spec.env(key, value);
        }
        spec
    }

    /// Check the command, run it to completion, and classify the outcome.
    pub async fn run<R: CommandRunner + ?Sized>(&self, runner: &R) -> Result<OutputRef, DeployError> {
        ensure_executable(&self.command)?;

        let spec = self.spec();
        tracing::info!("Executing command: '{}'", spec);
        let result = runner.run(&spec).await?;

        Ok(classify_exit(result)?)
    }
}
