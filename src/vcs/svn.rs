// ABOUTME: VersionControl implementation driving the `svn` command-line client.
// ABOUTME: Every call goes through a CommandRunner with --non-interactive.

use async_trait::async_trait;
use snafu::{ResultExt, ensure};
use std::path::{Path, PathBuf};

use super::commit::CommitEvent;
use super::error::{CommandSnafu, LaunchSnafu, VcsError};
use super::log::parse_log;
use super::VersionControl;
use crate::process::{CommandOutput, CommandRunner, CommandSpec, OutputCapture, OutputRef};
use crate::types::RepositoryUrl;

/// Subversion client backed by the `svn` binary.
#[derive(Debug, Clone)]
pub struct SvnClient<R> {
    program: PathBuf,
    runner: R,
}

impl<R: CommandRunner> SvnClient<R> {
    pub fn new(program: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    fn command(&self, subcommand: &str) -> CommandSpec {
        CommandSpec::new(&self.program)
            .arg(subcommand)
            .arg("--non-interactive")
    }

    async fn run(
        &self,
        operation: &'static str,
        spec: CommandSpec,
    ) -> Result<CommandOutput, VcsError> {
        let result = self
            .runner
            .run(&spec)
            .await
            .context(LaunchSnafu { operation })?;

        ensure!(
            result.success(),
            CommandSnafu {
                operation,
                exit: result.exit,
                output: result.output.clone(),
            }
        );
        Ok(result)
    }
}

#[async_trait]
impl<R: CommandRunner> VersionControl for SvnClient<R> {
    async fn log_revision(
        &self,
        repository: &RepositoryUrl,
        revision: u64,
    ) -> Result<Option<CommitEvent>, VcsError> {
        let spec = self
            .command("log")
            .args(["--xml", "--verbose", "--revision"])
            .arg(revision.to_string())
            .arg(repository.as_str())
            .capture(OutputCapture::Stdout);
        let result = self.run("log", spec).await?;

        match &result.output {
            OutputRef::Captured(xml) => parse_log(xml, repository),
            OutputRef::File { .. } => Ok(None),
        }
    }

    async fn info(&self, path: &Path) -> Result<(), VcsError> {
        let spec = self.command("info").arg(path.display().to_string());
        self.run("info", spec).await.map(|_| ())
    }

    async fn checkout(&self, url: &str, path: &Path) -> Result<(), VcsError> {
        let spec = self
            .command("checkout")
            .arg(url)
            .arg(path.display().to_string());
        self.run("checkout", spec).await.map(|_| ())
    }

    async fn switch(&self, url: &str, path: &Path) -> Result<(), VcsError> {
        let spec = self
            .command("switch")
            .arg(url)
            .arg(path.display().to_string());
        self.run("switch", spec).await.map(|_| ())
    }
}
