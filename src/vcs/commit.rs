// ABOUTME: Metadata of a single commit as read from the repository log.
// ABOUTME: Read once per hook invocation and never persisted.

use std::fmt;

use crate::types::RepositoryUrl;

/// What a commit did to one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAction {
    Added,
    Modified,
    Deleted,
    Replaced,
}

impl PathAction {
    /// Parse the single-letter action code used by `svn log`.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" => Some(PathAction::Added),
            "M" => Some(PathAction::Modified),
            "D" => Some(PathAction::Deleted),
            "R" => Some(PathAction::Replaced),
            _ => None,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            PathAction::Added => "A",
            PathAction::Modified => "M",
            PathAction::Deleted => "D",
            PathAction::Replaced => "R",
        }
    }
}

impl fmt::Display for PathAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One entry of a commit's changed-path list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedPath {
    pub path: String,
    pub action: PathAction,
    pub copy_from: Option<String>,
}

impl ChangedPath {
    pub fn new(path: impl Into<String>, action: PathAction) -> Self {
        Self {
            path: path.into(),
            action,
            copy_from: None,
        }
    }

    pub fn copied_from(mut self, source: impl Into<String>) -> Self {
        self.copy_from = Some(source.into());
        self
    }
}

/// A single commit: where, which revision, what message, which paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEvent {
    pub repository: RepositoryUrl,
    pub revision: u64,
    pub message: String,
    pub changed_paths: Vec<ChangedPath>,
}
