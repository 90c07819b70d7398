// ABOUTME: Parser for `svn log --xml -v` output.
// ABOUTME: Maps the first log entry to a CommitEvent.

use serde::Deserialize;
use snafu::ResultExt;

use super::commit::{ChangedPath, CommitEvent, PathAction};
use super::error::{ParseSnafu, UnknownActionSnafu, VcsError};
use crate::types::RepositoryUrl;

#[derive(Debug, Deserialize)]
struct LogXml {
    #[serde(rename = "logentry", default)]
    entries: Vec<LogEntryXml>,
}

#[derive(Debug, Deserialize)]
struct LogEntryXml {
    #[serde(rename = "@revision")]
    revision: u64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    paths: Option<PathsXml>,
}

#[derive(Debug, Deserialize)]
struct PathsXml {
    #[serde(rename = "path", default)]
    entries: Vec<PathXml>,
}

#[derive(Debug, Deserialize)]
struct PathXml {
    #[serde(rename = "@action")]
    action: String,
    #[serde(rename = "@copyfrom-path", default)]
    copyfrom_path: Option<String>,
    #[serde(rename = "$text")]
    path: String,
}

/// Parse the XML log of a single-revision query.
///
/// Only the first entry is considered; an empty log yields `None`.
pub fn parse_log(xml: &str, repository: &RepositoryUrl) -> Result<Option<CommitEvent>, VcsError> {
    let log: LogXml = quick_xml::de::from_str(xml).context(ParseSnafu)?;

    let Some(entry) = log.entries.into_iter().next() else {
        return Ok(None);
    };

    let changed_paths = entry
        .paths
        .map(|paths| paths.entries)
        .unwrap_or_default()
        .into_iter()
        .map(|p| {
            let action = PathAction::from_letter(&p.action).ok_or_else(|| {
                UnknownActionSnafu {
                    action: p.action.clone(),
                    path: p.path.clone(),
                }
                .build()
            })?;
            Ok(ChangedPath {
                path: p.path,
                action,
                copy_from: p.copyfrom_path,
            })
        })
        .collect::<Result<Vec<_>, VcsError>>()?;

    Ok(Some(CommitEvent {
        repository: repository.clone(),
        revision: entry.revision,
        message: entry.msg.unwrap_or_default(),
        changed_paths,
    }))
}
