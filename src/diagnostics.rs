// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects conditions that are repaired or tolerated but worth reporting.

/// Collects non-fatal warnings during a deployment.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The working copy was not valid and has been deleted.
    pub fn invalid_working_copy(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::InvalidWorkingCopy,
            message: message.into(),
        }
    }

    /// Initial checkout failed; the switch step will try to repair it.
    pub fn checkout_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CheckoutFailed,
            message: message.into(),
        }
    }

    /// Failed to release deploy lock (lock file may remain).
    pub fn lock_release(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LockRelease,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    InvalidWorkingCopy,
    CheckoutFailed,
    /// Lock record could not be removed; the next run reclaims it.
    LockRelease,
}
