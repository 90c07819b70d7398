// ABOUTME: Post-commit entry point: fetch one revision, classify it, dispatch on a tag.
// ABOUTME: Non-tag commits and empty logs are successful no-ops.

use crate::classify::{Classification, CommitClassifier, SkipReason};
use crate::config::TriggerSettings;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::process::{CommandRunner, OutputRef};
use crate::types::{RepositoryUrl, TagName};
use crate::vcs::VersionControl;

/// What the hook did with a revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The log query returned no entry for the revision.
    NoCommit,
    NotTriggered(SkipReason),
    Deployed { tag: TagName, output: OutputRef },
}

/// Handle revision `revision` of `repository`.
///
/// # Errors
///
/// `Error::Log` if the revision cannot be read, `Error::Dispatch` if the
/// executor could not be run or reported failure.
pub async fn handle<V, R>(
    settings: &TriggerSettings,
    repository: &RepositoryUrl,
    revision: u64,
    vcs: &V,
    dispatcher: &Dispatcher<R>,
) -> Result<TriggerOutcome>
where
    V: VersionControl + ?Sized,
    R: CommandRunner,
{
    tracing::debug!("Processing revision {} of {}", revision, repository);

    let commit = vcs
        .log_revision(repository, revision)
        .await
        .map_err(|source| Error::Log {
            repository: repository.clone(),
            revision,
            source,
        })?;

    let Some(commit) = commit else {
        tracing::debug!("No log entry for revision {}", revision);
        return Ok(TriggerOutcome::NoCommit);
    };

    let tag = match CommitClassifier::new(&settings.layout).classify(&commit) {
        Classification::Triggered(tag) => tag,
        Classification::NotTriggered(reason) => {
            tracing::debug!("{}", reason);
            return Ok(TriggerOutcome::NotTriggered(reason));
        }
    };

    tracing::debug!("Deploying tag {} (revision {})", tag, revision);
    let output = dispatcher.dispatch(&tag).await?;

    Ok(TriggerOutcome::Deployed { tag, output })
}
