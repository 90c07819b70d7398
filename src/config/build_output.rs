// ABOUTME: Destination of the build command's combined output.
// ABOUTME: Either `pipe` (kept in memory) or a file path reported by reference.

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::process::OutputCapture;

pub const DEFAULT_BUILD_LOG: &str = "/tmp/tagdeploy-build.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutput {
    Pipe,
    File(PathBuf),
}

impl Default for BuildOutput {
    fn default() -> Self {
        // Large build logs are better left on disk than buffered.
        BuildOutput::File(PathBuf::from(DEFAULT_BUILD_LOG))
    }
}

impl BuildOutput {
    pub fn capture(&self) -> OutputCapture {
        match self {
            BuildOutput::Pipe => OutputCapture::Buffered,
            BuildOutput::File(path) => OutputCapture::File(path.clone()),
        }
    }
}

impl FromStr for BuildOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("build output cannot be empty".to_string()),
            s if s.eq_ignore_ascii_case("pipe") => Ok(BuildOutput::Pipe),
            s if s.starts_with('/') => Ok(BuildOutput::File(PathBuf::from(s))),
            s => Err(format!("build output must be 'pipe' or an absolute path: {}", s)),
        }
    }
}

impl fmt::Display for BuildOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutput::Pipe => write!(f, "pipe"),
            BuildOutput::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl<'de> Deserialize<'de> for BuildOutput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
