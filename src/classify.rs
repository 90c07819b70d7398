// ABOUTME: Decides whether a single commit is a deployment tag creation.
// ABOUTME: Negative results are ordinary values carrying the reason, never errors.

use std::fmt;

use crate::config::TagLayout;
use crate::types::{TagName, TagNameError};
use crate::vcs::{CommitEvent, PathAction};

/// Why a commit does not trigger a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Commit message is not the tag sentinel.
    Message(String),
    /// A tag is one atomic copy; anything else touched more or fewer paths.
    PathCount(usize),
    Action(PathAction),
    /// Copied from somewhere other than trunk, or not a copy at all.
    CopySource(Option<String>),
    /// Destination is not `<tags>/<digits, dots, hyphens>`.
    TagFormat { path: String, reason: TagFormatError },
}

/// Why a destination path was rejected as a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFormatError {
    OutsideTags,
    Name(TagNameError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Message(message) => {
                write!(f, "Not a deployment tag (commit message: {:?})", message)
            }
            SkipReason::PathCount(count) => {
                write!(f, "Not a deployment tag ({} paths changed)", count)
            }
            SkipReason::Action(action) => {
                write!(f, "Not a deployment tag (action {} instead of A)", action)
            }
            SkipReason::CopySource(Some(source)) => {
                write!(f, "Not a deployment tag (copied from {})", source)
            }
            SkipReason::CopySource(None) => {
                write!(f, "Not a deployment tag (not a copy)")
            }
            SkipReason::TagFormat {
                path,
                reason: TagFormatError::OutsideTags,
            } => write!(f, "Not a deployment tag ({} is outside the tags branch)", path),
            SkipReason::TagFormat {
                path,
                reason: TagFormatError::Name(e),
            } => write!(f, "Not a deployment tag ({}: {})", path, e),
        }
    }
}

/// Result of classifying one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Triggered(TagName),
    NotTriggered(SkipReason),
}

impl Classification {
    pub fn tag(&self) -> Option<&TagName> {
        match self {
            Classification::Triggered(tag) => Some(tag),
            Classification::NotTriggered(_) => None,
        }
    }
}

/// Applies the tag-commit rule against a repository layout.
#[derive(Debug, Clone)]
pub struct CommitClassifier<'a> {
    layout: &'a TagLayout,
}

impl<'a> CommitClassifier<'a> {
    pub fn new(layout: &'a TagLayout) -> Self {
        Self { layout }
    }

    /// Check, in order: message, path count, action, copy source, destination.
    ///
    /// The first failing condition decides the reason.
    pub fn classify(&self, commit: &CommitEvent) -> Classification {
        match self.check(commit) {
            Ok(tag) => Classification::Triggered(tag),
            Err(reason) => Classification::NotTriggered(reason),
        }
    }

    fn check(&self, commit: &CommitEvent) -> Result<TagName, SkipReason> {
        if commit.message != self.layout.tag_message {
            return Err(SkipReason::Message(commit.message.clone()));
        }

        let [changed] = commit.changed_paths.as_slice() else {
            return Err(SkipReason::PathCount(commit.changed_paths.len()));
        };

        if changed.action != PathAction::Added {
            return Err(SkipReason::Action(changed.action));
        }

        if changed.copy_from.as_deref() != Some(self.layout.trunk_branch.as_str()) {
            return Err(SkipReason::CopySource(changed.copy_from.clone()));
        }

        self.tag_name(&changed.path)
    }

    fn tag_name(&self, path: &str) -> Result<TagName, SkipReason> {
        let name = path
            .strip_prefix(self.layout.tags_branch.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| SkipReason::TagFormat {
                path: path.to_string(),
                reason: TagFormatError::OutsideTags,
            })?;

        TagName::new(name).map_err(|e| SkipReason::TagFormat {
            path: path.to_string(),
            reason: TagFormatError::Name(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepositoryUrl;
    use crate::vcs::ChangedPath;

    fn commit(message: &str, paths: Vec<ChangedPath>) -> CommitEvent {
        CommitEvent {
            repository: RepositoryUrl::from_hook_arg("/srv/svn/scdb"),
            revision: 100,
            message: message.to_string(),
            changed_paths: paths,
        }
    }

    fn tag_copy(path: &str) -> ChangedPath {
        ChangedPath::new(path, PathAction::Added).copied_from("/trunk")
    }

    #[test]
    fn tag_copy_from_trunk_triggers() {
        let layout = TagLayout::default();
        let result = CommitClassifier::new(&layout).classify(&commit("ant tag", vec![tag_copy("/tags/1.2.3")]));
        assert_eq!(result.tag().map(TagName::as_str), Some("1.2.3"));
    }

    #[test]
    fn trailing_separator_is_part_of_the_tag() {
        let layout = TagLayout::default();
        let result = CommitClassifier::new(&layout).classify(&commit("ant tag", vec![tag_copy("/tags/2.0-1/")]));
        assert_eq!(result.tag().map(TagName::as_str), Some("2.0-1/"));
    }

    #[test]
    fn message_is_checked_first() {
        let layout = TagLayout::default();
        let result = CommitClassifier::new(&layout).classify(&commit("fix typo", vec![]));
        assert_eq!(
            result,
            Classification::NotTriggered(SkipReason::Message("fix typo".to_string()))
        );
    }

    #[test]
    fn multiple_paths_do_not_trigger() {
        let layout = TagLayout::default();
        let result = CommitClassifier::new(&layout).classify(&commit(
            "ant tag",
            vec![tag_copy("/tags/1.0"), tag_copy("/tags/1.1")],
        ));
        assert_eq!(result, Classification::NotTriggered(SkipReason::PathCount(2)));
    }

    #[test]
    fn plain_add_is_not_a_copy() {
        let layout = TagLayout::default();
        let result = CommitClassifier::new(&layout).classify(&commit(
            "ant tag",
            vec![ChangedPath::new("/tags/1.0", PathAction::Added)],
        ));
        assert_eq!(result, Classification::NotTriggered(SkipReason::CopySource(None)));
    }

    #[test]
    fn sibling_of_tags_branch_is_outside() {
        let layout = TagLayout::default();
        let result = CommitClassifier::new(&layout).classify(&commit("ant tag", vec![tag_copy("/tagsold/1.0")]));
        assert!(matches!(
            result,
            Classification::NotTriggered(SkipReason::TagFormat {
                reason: TagFormatError::OutsideTags,
                ..
            })
        ));
    }

    #[test]
    fn custom_layout_is_honoured() {
        let layout = TagLayout {
            tags_branch: "/releases".to_string(),
            trunk_branch: "/main".to_string(),
            tag_message: "release".to_string(),
        };
        let event = commit(
            "release",
            vec![ChangedPath::new("/releases/3.1", PathAction::Added).copied_from("/main")],
        );
        let result = CommitClassifier::new(&layout).classify(&event);
        assert_eq!(result.tag().map(TagName::as_str), Some("3.1"));
    }

    #[test]
    fn reasons_render_for_logs() {
        let reason = SkipReason::CopySource(Some("/branches/x".to_string()));
        assert_eq!(reason.to_string(), "Not a deployment tag (copied from /branches/x)");
    }
}
