// ABOUTME: Repository location passed to the post-commit hook.
// ABOUTME: Bare filesystem paths are normalized to file:// URLs.

use std::fmt;

/// Repository URL, always carrying a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryUrl(String);

impl RepositoryUrl {
    /// Normalize the first hook argument.
    ///
    /// Subversion hands hooks the repository's filesystem path; anything that
    /// already looks like `scheme://...` with a lowercase scheme is kept as is.
    pub fn from_hook_arg(value: &str) -> Self {
        if has_scheme(value) {
            Self(value.to_string())
        } else {
            Self(format!("file://{}", value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn has_scheme(value: &str) -> bool {
    let Some(pos) = value.find("://") else {
        return false;
    };
    let mut chars = value[..pos].chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => chars
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

impl fmt::Display for RepositoryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
