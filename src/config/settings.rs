// ABOUTME: Validated runtime settings resolved once from the configuration file.
// ABOUTME: Passed by reference into every component instead of process-wide state.

use std::path::{Path, PathBuf};

use super::build_output::BuildOutput;
use super::hook::NotifyConfig;
use super::repository::TagLayout;
use super::Config;
use crate::dispatch::DispatchMode;
use crate::error::{Error, Result};
use crate::logging::{LogRotation, LogSettings};
use crate::types::TagName;

/// Root for runtime homes given as relative paths.
pub const JAVA_ROOT: &str = "/usr/java";

/// Parent of the directory holding the running executable.
pub fn install_root() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| Error::InstallRoot(format!("cannot locate running executable: {e}")))?;
    install_root_of(&exe)
}

/// Install root for an executable at `exe`, e.g. `/opt/tagdeploy` for
/// `/opt/tagdeploy/bin/tagdeploy`.
pub fn install_root_of(exe: &Path) -> Result<PathBuf> {
    exe.parent()
        .and_then(Path::parent)
        .filter(|root| !root.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            Error::InstallRoot(format!(
                "{} has no grandparent directory",
                exe.display()
            ))
        })
}

/// How the build command is invoked.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Absolute, or relative to the working copy.
    pub command: PathBuf,
    pub target: String,
    pub java_home: PathBuf,
    pub opts: Option<String>,
    pub output: BuildOutput,
}

/// Everything the deployment executor needs.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub repository_url: String,
    pub layout: TagLayout,
    pub build: BuildSettings,
    pub working_copy: PathBuf,
    pub switch_retries: u32,
    pub lock_file: PathBuf,
    pub svn: PathBuf,
    pub log: LogSettings,
}

impl ExecutorSettings {
    pub fn resolve(config: &Config, install_root: &Path, cli_verbosity: u8) -> Result<Self> {
        let repository_url = config.repository.root_url().ok_or_else(|| {
            Error::InvalidConfig(
                "option 'url' (section repository) is required but not defined".to_string(),
            )
        })?;

        let build = &config.build;
        if build.target.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "option 'target' (section build) cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            repository_url,
            layout: config.repository.layout(),
            build: BuildSettings {
                command: build.command.clone(),
                target: build.target.clone(),
                java_home: Path::new(JAVA_ROOT).join(&build.java_home),
                opts: build.opts.clone().filter(|opts| !opts.trim().is_empty()),
                output: build.output.clone(),
            },
            working_copy: install_root.join(&build.working_copy),
            switch_retries: build.switch_retries,
            lock_file: build.lock_file.clone(),
            svn: build.svn.clone(),
            log: LogSettings {
                verbosity: cli_verbosity.max(build.verbose),
                terminal: true,
                strip_angles: false,
                log_file: build.log_file.clone(),
                rotation: LogRotation {
                    max_bytes: build.log_max_bytes,
                    backups: build.log_backups,
                },
            },
        })
    }

    /// Fail early when the configured runtime home does not exist.
    pub fn check_runtime(&self) -> Result<()> {
        if !self.build.java_home.exists() {
            return Err(Error::InvalidConfig(format!(
                "specified Java version ({}) does not exist. Use 'java_home' to specify another version",
                self.build.java_home.display()
            )));
        }
        Ok(())
    }

    pub fn tag_url(&self, tag: &TagName) -> String {
        tag.url(&self.repository_url, &self.layout.tags_branch)
    }
}

/// Everything the post-commit hook needs.
#[derive(Debug, Clone)]
pub struct TriggerSettings {
    pub layout: TagLayout,
    pub dispatch: DispatchMode,
    pub deploy_command: PathBuf,
    pub deploy_args: Vec<String>,
    pub notify: NotifyConfig,
    pub svn: PathBuf,
    pub log: LogSettings,
}

impl TriggerSettings {
    pub fn resolve(config: &Config, cli_verbosity: u8) -> Result<Self> {
        let hook = &config.hook;

        let dispatch = if hook.use_sudo {
            DispatchMode::Elevate {
                transport: config.sudo.clone(),
            }
        } else {
            let server = hook
                .deploy_server
                .as_deref()
                .filter(|server| !server.trim().is_empty())
                .ok_or_else(|| {
                    Error::InvalidConfig(
                        "option 'deploy_server' (section hook) is required when use_sudo is false"
                            .to_string(),
                    )
                })?;
            DispatchMode::RemoteShell {
                transport: config.ssh.clone(),
                destination: format!("{}@{}", hook.deploy_user, server),
            }
        };

        let verbosity = cli_verbosity.max(hook.verbose);

        Ok(Self {
            layout: config.repository.layout(),
            dispatch,
            deploy_command: hook.deploy_command.clone(),
            deploy_args: hook.deploy_args.clone(),
            notify: hook.notify.clone(),
            svn: hook.svn.clone(),
            log: LogSettings {
                verbosity,
                terminal: hook.report_errors || verbosity > 0,
                strip_angles: true,
                log_file: hook.log_file.clone(),
                rotation: LogRotation {
                    max_bytes: hook.log_max_bytes,
                    backups: hook.log_backups,
                },
            },
        })
    }
}
