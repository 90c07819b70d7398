// ABOUTME: Configuration file types and loading for tagdeploy.yml.
// ABOUTME: One YAML file shared by the post-commit hook and the build executor.

mod build;
mod build_output;
mod hook;
mod repository;
mod settings;

pub use build::{BuildConfig, DEFAULT_EXECUTOR_LOG, DEFAULT_LOCK_FILE};
pub use build_output::{BuildOutput, DEFAULT_BUILD_LOG};
pub use hook::{DEFAULT_HOOK_LOG, HookConfig, NotifyConfig, TransportConfig};
pub use repository::{DEFAULT_TAG_MESSAGE, RepositoryConfig, TagLayout, normalize_branch};
pub use settings::{BuildSettings, ExecutorSettings, JAVA_ROOT, TriggerSettings, install_root, install_root_of};

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/tagdeploy.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub build: BuildConfig,
    pub hook: HookConfig,
    pub ssh: TransportConfig,
    pub sudo: TransportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repository: RepositoryConfig::default(),
            build: BuildConfig::default(),
            hook: HookConfig::default(),
            ssh: TransportConfig::ssh(),
            sudo: TransportConfig::sudo(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<Config> = serde_yaml::from_str(yaml)?;
        Ok(config.unwrap_or_default())
    }

    /// Load a configuration file that must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::ConfigNotFound(path.to_path_buf())
            } else {
                Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_yaml(&content)
    }

    /// Load a configuration file, falling back to defaults when it is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(Error::ConfigNotFound(path)) => {
                tracing::debug!(
                    "Configuration file ({}) is missing. Using default values.",
                    path.display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }
}
