// ABOUTME: Post-commit hook options: what to dispatch, how, and who to notify.
// ABOUTME: Mail notification stays disabled unless both sender and recipient are set.

use serde::Deserialize;
use std::path::PathBuf;

use crate::logging::{DEFAULT_LOG_BACKUPS, DEFAULT_LOG_MAX_BYTES};

pub const DEFAULT_HOOK_LOG: &str = "/tmp/tagdeploy-post-commit.log";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Program that runs the executor on the deployment host.
    pub deploy_command: PathBuf,
    /// Arguments placed between the program and the tag.
    pub deploy_args: Vec<String>,
    pub deploy_user: String,
    /// Required when `use_sudo` is false.
    pub deploy_server: Option<String>,
    pub use_sudo: bool,
    /// Echo failures back to the committing client.
    pub report_errors: bool,
    pub log_file: Option<PathBuf>,
    /// `log_file` is rotated once it reaches this size.
    pub log_max_bytes: u64,
    pub log_backups: usize,
    pub svn: PathBuf,
    pub verbose: u8,
    pub notify: NotifyConfig,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            deploy_command: PathBuf::from("/usr/bin/tagdeploy"),
            deploy_args: vec!["build-tag".to_string()],
            deploy_user: "root".to_string(),
            deploy_server: None,
            use_sudo: true,
            report_errors: true,
            log_file: Some(PathBuf::from(DEFAULT_HOOK_LOG)),
            log_max_bytes: DEFAULT_LOG_MAX_BYTES,
            log_backups: DEFAULT_LOG_BACKUPS,
            svn: PathBuf::from("svn"),
            verbose: 0,
            notify: NotifyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// SMTP relay, `host` or `host:port`.
    pub mailer: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub subject_prefix: String,
    /// `{revision}` is replaced by the committed revision.
    pub subject: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            mailer: "localhost".to_string(),
            from: None,
            to: None,
            subject_prefix: "[Tag-Deploy]".to_string(),
            subject: "Failed to deploy revision {revision} of the configuration".to_string(),
        }
    }
}

impl NotifyConfig {
    pub fn enabled(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    pub fn subject_for(&self, revision: u64) -> String {
        let subject = self.subject.replace("{revision}", &revision.to_string());
        if self.subject_prefix.is_empty() {
            subject
        } else {
            format!("{} {}", self.subject_prefix, subject)
        }
    }
}

/// A privilege-elevation or remote-shell program with its fixed options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransportConfig {
    pub command: PathBuf,
    #[serde(default)]
    pub options: Vec<String>,
}

impl TransportConfig {
    pub fn ssh() -> Self {
        Self {
            command: PathBuf::from("/usr/bin/ssh"),
            options: vec!["-o".to_string(), "PasswordAuthentication=no".to_string()],
        }
    }

    pub fn sudo() -> Self {
        Self {
            command: PathBuf::from("/usr/bin/sudo"),
            options: vec!["-H".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_disabled_without_addresses() {
        let notify = NotifyConfig::default();
        assert!(!notify.enabled());

        let notify = NotifyConfig {
            from: Some("deploy@example.org".to_string()),
            ..Default::default()
        };
        assert!(!notify.enabled());
    }

    #[test]
    fn subject_substitutes_revision() {
        let notify = NotifyConfig::default();
        assert_eq!(
            notify.subject_for(100),
            "[Tag-Deploy] Failed to deploy revision 100 of the configuration"
        );
    }

    #[test]
    fn empty_prefix_is_omitted() {
        let notify = NotifyConfig {
            subject_prefix: String::new(),
            subject: "r{revision} failed".to_string(),
            ..Default::default()
        };
        assert_eq!(notify.subject_for(7), "r7 failed");
    }
}
