// ABOUTME: Command descriptor: program, arguments, directory, environment, capture mode.
// ABOUTME: Built with chained setters and executed by a CommandRunner.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the stdout/stderr of a child goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputCapture {
    /// Keep the output in memory and return it.
    #[default]
    Buffered,
    /// Write the output to this file and return only its location.
    File(PathBuf),
    /// Keep stdout in memory and hold stderr apart. Stderr is appended to the
    /// returned output only when the command fails.
    Stdout,
}

/// Description of one external command invocation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    /// When false the child starts from an empty environment plus `env`.
    pub inherit_env: bool,
    pub capture: OutputCapture,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: BTreeMap::new(),
            inherit_env: true,
            capture: OutputCapture::Buffered,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn clear_env(mut self) -> Self {
        self.inherit_env = false;
        self
    }

    pub fn capture(mut self, capture: OutputCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
