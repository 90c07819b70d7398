// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use chrono::Utc;

use super::build::BuildRunner;
use super::deployment::{DeployReport, Deployment};
use super::error::DeployError;
use super::state::{Built, Locked, Synced};
use super::sync::WorkingCopySync;
use crate::diagnostics::Warning;
use crate::process::CommandRunner;
use crate::vcs::VersionControl;

impl<'a, S> Deployment<'a, S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self, state: T) -> Deployment<'a, T> {
        Deployment {
            settings: self.settings,
            tag: self.tag,
            tag_url: self.tag_url,
            lock: self.lock,
            diag: self.diag,
            started_at: self.started_at,
            state,
        }
    }
}

// =============================================================================
// Locked -> Synced
// =============================================================================

impl<'a> Deployment<'a, Locked> {
    /// Switch the working copy to the tag, recreating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Sync` once every switch attempt has failed.
    pub async fn sync<V: VersionControl + ?Sized>(
        mut self,
        vcs: &V,
    ) -> Result<Deployment<'a, Synced>, DeployError> {
        let settings = self.settings;
        let sync = WorkingCopySync::new(vcs, &settings.working_copy, settings.switch_retries);
        sync.sync(&self.tag_url, &mut self.diag).await?;

        Ok(self.transition(Synced))
    }
}

// =============================================================================
// Synced -> Built
// =============================================================================

impl<'a> Deployment<'a, Synced> {
    /// Run the build command against the synchronized working copy.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Launch` if the command cannot be started and
    /// `DeployError::Build` if it exits non-zero or is killed.
    pub async fn build<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
    ) -> Result<Deployment<'a, Built>, DeployError> {
        let settings = self.settings;
        let build = BuildRunner::new(&settings.build, &settings.working_copy);
        let output = build.run(runner).await?;

        tracing::debug!(
            "Tag {} deployed successfully. Command output:\n{}",
            self.tag,
            output
        );
        Ok(self.transition(Built { output }))
    }
}

// =============================================================================
// Built -> report
// =============================================================================

impl Deployment<'_, Built> {
    /// Release the lock and summarize the deployment.
    ///
    /// A failure to delete the lock record is downgraded to a warning; the
    /// next run reclaims a record whose process is gone.
    pub fn finish(self) -> DeployReport {
        let Deployment {
            tag,
            lock,
            mut diag,
            started_at,
            state,
            ..
        } = self;

        if let Err(e) = lock.release() {
            diag.warn(Warning::lock_release(e.to_string()));
        }

        DeployReport {
            tag,
            output: state.output,
            warnings: diag.into_warnings(),
            started_at,
            finished_at: Utc::now(),
        }
    }
}
