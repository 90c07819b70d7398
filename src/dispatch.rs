// ABOUTME: Runs the deployment executor out of process under sudo or over ssh.
// ABOUTME: Relays the executor's exit status and combined output without interpreting them.

use crate::config::TransportConfig;
use crate::process::{CommandRunner, CommandSpec, ExitState, LaunchError, OutputRef};
use crate::types::TagName;

/// How the executor is reached from the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchMode {
    /// Local privilege elevation, e.g. `sudo -H`.
    Elevate { transport: TransportConfig },
    /// Remote shell to `user@host`.
    RemoteShell {
        transport: TransportConfig,
        destination: String,
    },
}

impl DispatchMode {
    pub fn transport(&self) -> &TransportConfig {
        match self {
            DispatchMode::Elevate { transport } | DispatchMode::RemoteShell { transport, .. } => {
                transport
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to launch deployment of tag {tag}: {source}")]
    Launch { tag: TagName, source: LaunchError },

    #[error("deployment of tag {tag} failed with {exit}:\n{output}")]
    Failed {
        tag: TagName,
        exit: ExitState,
        output: OutputRef,
    },
}

impl DispatchError {
    /// Output relayed from the executor, when it ran at all.
    pub fn output(&self) -> Option<&OutputRef> {
        match self {
            DispatchError::Launch { .. } => None,
            DispatchError::Failed { output, .. } => Some(output),
        }
    }
}

/// Builds and runs the executor invocation for one tag.
#[derive(Debug)]
pub struct Dispatcher<R> {
    mode: DispatchMode,
    deploy_command: String,
    deploy_args: Vec<String>,
    runner: R,
}

impl<R: CommandRunner> Dispatcher<R> {
    pub fn new(
        mode: DispatchMode,
        deploy_command: impl Into<String>,
        deploy_args: Vec<String>,
        runner: R,
    ) -> Self {
        Self {
            mode,
            deploy_command: deploy_command.into(),
            deploy_args,
            runner,
        }
    }

    pub fn mode(&self) -> &DispatchMode {
        &self.mode
    }

    /// `transport [destination] options... deploy_command deploy_args... TAG`
    pub fn command_for(&self, tag: &TagName) -> CommandSpec {
        let transport = self.mode.transport();
        let mut spec = CommandSpec::new(&transport.command);
        if let DispatchMode::RemoteShell { destination, .. } = &self.mode {
            spec = spec.arg(destination);
        }

        spec.args(&transport.options)
            .arg(&self.deploy_command)
            .args(&self.deploy_args)
            .arg(tag.as_str())
    }

    /// Run the executor for `tag` and wait for it.
    ///
    /// # Errors
    ///
    /// `DispatchError::Failed` carries the executor's exit state and output
    /// verbatim when it exits non-zero or is killed.
    pub async fn dispatch(&self, tag: &TagName) -> Result<OutputRef, DispatchError> {
        let spec = self.command_for(tag);
        let result = self
            .runner
            .run(&spec)
            .await
            .map_err(|source| DispatchError::Launch {
                tag: tag.clone(),
                source,
            })?;

        if !result.success() {
            return Err(DispatchError::Failed {
                tag: tag.clone(),
                exit: result.exit,
                output: result.output,
            });
        }

        tracing::debug!("Tag {} deployed. Executor output:\n{}", tag, result.output);
        Ok(result.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessRunner;

    fn tag(name: &str) -> TagName {
        TagName::new(name).unwrap()
    }

    #[test]
    fn elevation_command_line() {
        let dispatcher = Dispatcher::new(
            DispatchMode::Elevate {
                transport: TransportConfig::sudo(),
            },
            "/usr/bin/tagdeploy",
            vec!["build-tag".to_string()],
            ProcessRunner,
        );

        let spec = dispatcher.command_for(&tag("2.0-1/"));
        assert_eq!(spec.program, std::path::PathBuf::from("/usr/bin/sudo"));
        assert_eq!(spec.args, ["-H", "/usr/bin/tagdeploy", "build-tag", "2.0-1/"]);
    }

    #[test]
    fn remote_shell_puts_destination_first() {
        let dispatcher = Dispatcher::new(
            DispatchMode::RemoteShell {
                transport: TransportConfig::ssh(),
                destination: "root@deploy.example.org".to_string(),
            },
            "/usr/bin/tagdeploy",
            vec!["build-tag".to_string()],
            ProcessRunner,
        );

        let spec = dispatcher.command_for(&tag("1.2.3"));
        assert_eq!(
            spec.args,
            [
                "root@deploy.example.org",
                "-o",
                "PasswordAuthentication=no",
                "/usr/bin/tagdeploy",
                "build-tag",
                "1.2.3"
            ]
        );
    }

    #[tokio::test]
    async fn failure_relays_status_and_output() {
        let transport = TransportConfig {
            command: "/bin/sh".into(),
            options: vec!["-c".to_string()],
        };
        let dispatcher = Dispatcher::new(
            DispatchMode::Elevate { transport },
            "echo \"cannot build $0\"; exit 3",
            vec![],
            ProcessRunner,
        );

        let err = dispatcher.dispatch(&tag("1.0")).await.unwrap_err();
        match err {
            DispatchError::Failed { exit, output, .. } => {
                assert_eq!(exit, ExitState::Code(3));
                assert_eq!(output.captured(), Some("cannot build 1.0\n"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
