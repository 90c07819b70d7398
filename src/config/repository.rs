// ABOUTME: Repository layout: root URL, tags branch, trunk branch, tag commit message.
// ABOUTME: Normalizes branch paths to a leading '/' and no trailing '/'.

use serde::Deserialize;

/// Commit message that marks a tag-creation commit.
pub const DEFAULT_TAG_MESSAGE: &str = "ant tag";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository root URL; required by the executor.
    pub url: Option<String>,
    pub tags_branch: String,
    pub trunk_branch: String,
    pub tag_message: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            url: None,
            tags_branch: "/tags".to_string(),
            trunk_branch: "/trunk".to_string(),
            tag_message: DEFAULT_TAG_MESSAGE.to_string(),
        }
    }
}

impl RepositoryConfig {
    /// Normalized branch layout used to recognize and locate tags.
    pub fn layout(&self) -> TagLayout {
        TagLayout {
            tags_branch: normalize_branch(&self.tags_branch),
            trunk_branch: normalize_branch(&self.trunk_branch),
            tag_message: self.tag_message.clone(),
        }
    }

    /// Repository root without trailing separators, if configured.
    pub fn root_url(&self) -> Option<String> {
        self.url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
    }
}

/// Where tags live, where they may be cut from, and how tag commits are labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLayout {
    pub tags_branch: String,
    pub trunk_branch: String,
    pub tag_message: String,
}

impl Default for TagLayout {
    fn default() -> Self {
        RepositoryConfig::default().layout()
    }
}

/// Force a leading '/' and strip trailing ones.
pub fn normalize_branch(branch: &str) -> String {
    let trimmed = branch.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_gets_leading_separator() {
        assert_eq!(normalize_branch("tags"), "/tags");
    }

    #[test]
    fn branch_loses_trailing_separators() {
        assert_eq!(normalize_branch("/trunk//"), "/trunk");
        assert_eq!(normalize_branch("deploy/tags/"), "/deploy/tags");
    }

    #[test]
    fn root_url_strips_trailing_separator() {
        let config = RepositoryConfig {
            url: Some("http://svn.example.com/scdb/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.root_url().as_deref(),
            Some("http://svn.example.com/scdb")
        );
    }

    #[test]
    fn missing_url_is_none() {
        assert!(RepositoryConfig::default().root_url().is_none());
    }
}
