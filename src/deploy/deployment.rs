// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: Owns the deploy lock for its whole lifetime.

use chrono::{DateTime, Utc};

use super::error::DeployError;
use super::lock::DeployLock;
use super::state::Locked;
use crate::config::ExecutorSettings;
use crate::diagnostics::{Diagnostics, Warning};
use crate::process::OutputRef;
use crate::types::TagName;

/// A deployment in progress, parameterized by its current state.
///
/// The lock is acquired when the deployment is created and released by
/// `finish()`. If a transition fails, the deployment is dropped and the lock
/// guard removes the record on the way out.
#[derive(Debug)]
pub struct Deployment<'a, S> {
    pub(crate) settings: &'a ExecutorSettings,
    pub(crate) tag: TagName,
    pub(crate) tag_url: String,
    pub(crate) lock: DeployLock,
    pub(crate) diag: Diagnostics,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) state: S,
}

impl<'a> Deployment<'a, Locked> {
    /// Take the deploy lock for `tag`.
    pub fn start(settings: &'a ExecutorSettings, tag: TagName) -> Result<Self, DeployError> {
        let lock = DeployLock::acquire(&settings.lock_file)?;
        let tag_url = settings.tag_url(&tag);

        Ok(Deployment {
            settings,
            tag,
            tag_url,
            lock,
            diag: Diagnostics::default(),
            started_at: Utc::now(),
            state: Locked,
        })
    }
}

impl<S> Deployment<'_, S> {
    pub fn tag(&self) -> &TagName {
        &self.tag
    }

    /// Absolute location of the tag being deployed.
    pub fn tag_url(&self) -> &str {
        &self.tag_url
    }

    pub fn settings(&self) -> &ExecutorSettings {
        self.settings
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }
}

/// Summary of a successful deployment.
#[derive(Debug)]
pub struct DeployReport {
    pub tag: TagName,
    pub output: OutputRef,
    pub warnings: Vec<Warning>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeployReport {
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
