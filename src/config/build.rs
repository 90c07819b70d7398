// ABOUTME: Executor options: build command, runtime home, working copy, lock, retries.
// ABOUTME: Relative paths are resolved later against fixed roots.

use serde::Deserialize;
use std::path::PathBuf;

use super::build_output::BuildOutput;
use crate::logging::{DEFAULT_LOG_BACKUPS, DEFAULT_LOG_MAX_BYTES};

pub const DEFAULT_LOCK_FILE: &str = "/var/lock/tagdeploy";
pub const DEFAULT_EXECUTOR_LOG: &str = "/var/log/tagdeploy.log";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build tool, absolute or relative to the working copy.
    pub command: PathBuf,
    pub target: String,
    /// Extra tuning flags exported as `ANT_OPTS`.
    pub opts: Option<String>,
    pub output: BuildOutput,
    /// Runtime home, absolute or relative to `/usr/java`.
    pub java_home: PathBuf,
    /// Working copy root, absolute or relative to the install root.
    pub working_copy: PathBuf,
    pub switch_retries: u32,
    pub lock_file: PathBuf,
    /// Durable executor log; `null` disables it.
    pub log_file: Option<PathBuf>,
    pub log_max_bytes: u64,
    pub log_backups: usize,
    pub svn: PathBuf,
    pub verbose: u8,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from("external/ant/bin/ant"),
            target: "deploy.and.notify".to_string(),
            opts: None,
            output: BuildOutput::default(),
            java_home: PathBuf::from("latest"),
            working_copy: PathBuf::from("svncache"),
            switch_retries: 1,
            lock_file: PathBuf::from(DEFAULT_LOCK_FILE),
            log_file: Some(PathBuf::from(DEFAULT_EXECUTOR_LOG)),
            log_max_bytes: DEFAULT_LOG_MAX_BYTES,
            log_backups: DEFAULT_LOG_BACKUPS,
            svn: PathBuf::from("svn"),
            verbose: 0,
        }
    }
}
