// ABOUTME: Validated deployment tag name as found under the tags branch.
// ABOUTME: Accepts digit/dot/hyphen segments separated by single slashes.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagNameError {
    #[error("tag name cannot be empty")]
    Empty,

    #[error("tag name cannot start with '/'")]
    LeadingSeparator,

    #[error("tag name contains an empty path segment")]
    EmptySegment,

    #[error("invalid character in tag name: '{0}'")]
    InvalidChar(char),
}

/// Name of a deployment tag, relative to the tags branch.
///
/// The grammar is one or more runs of `[0-9.-]`, each optionally followed by a
/// single `/`. A trailing separator is part of the name and is kept verbatim,
/// so `2.0-1/` and `2.0-1` are distinct names that resolve to the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    pub fn new(value: &str) -> Result<Self, TagNameError> {
        if value.is_empty() {
            return Err(TagNameError::Empty);
        }

        if value.starts_with('/') {
            return Err(TagNameError::LeadingSeparator);
        }

        if value.contains("//") {
            return Err(TagNameError::EmptySegment);
        }

        for c in value.chars() {
            if !c.is_ascii_digit() && c != '.' && c != '-' && c != '/' {
                return Err(TagNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute location of the tag: repository root + tags branch + name.
    pub fn url(&self, repository_url: &str, tags_branch: &str) -> String {
        format!("{}{}/{}", repository_url, tags_branch, self.0)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
