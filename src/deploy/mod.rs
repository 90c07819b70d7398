// ABOUTME: Locked deployment of one tag: lock, sync the working copy, build, release.
// ABOUTME: Uses the type state pattern so steps can only run in order.

mod build;
mod deployment;
mod error;
mod lock;
mod state;
mod sync;
mod transitions;

pub use build::{BuildError, BuildRunner, RUNTIME_HOME_VAR, TUNING_OPTS_VAR, classify_exit};
pub use deployment::{DeployReport, Deployment};
pub use error::{DeployError, DeployErrorKind};
pub use lock::{DeployLock, LockError, process_alive};
pub use state::{Built, Locked, Synced};
pub use sync::{SyncError, WorkingCopySync};

use crate::config::ExecutorSettings;
use crate::process::CommandRunner;
use crate::types::TagName;
use crate::vcs::VersionControl;

/// Deploy `tag`: lock, sync, build, release.
///
/// Any failure short-circuits the remaining steps. The lock is released on
/// every path that acquired it.
pub async fn run<V, R>(
    settings: &ExecutorSettings,
    tag: TagName,
    vcs: &V,
    runner: &R,
) -> Result<DeployReport, DeployError>
where
    V: VersionControl + ?Sized,
    R: CommandRunner + ?Sized,
{
    let deployment = Deployment::start(settings, tag)?;
    tracing::info!("Processing tag {}...", deployment.tag_url());
    tracing::info!("Working copy: {}", settings.working_copy.display());

    let deployment = deployment.sync(vcs).await?;
    let deployment = deployment.build(runner).await?;

    Ok(deployment.finish())
}
