// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each marker names what has been achieved so far.

use crate::process::OutputRef;

/// Lock held, working copy untouched.
/// Available actions: `sync()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Locked;

/// Working copy switched to the tag.
/// Available actions: `build()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Synced;

/// Build command succeeded; carries its output reference.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Built {
    pub(crate) output: OutputRef,
}

impl Built {
    pub fn output(&self) -> &OutputRef {
        &self.output
    }
}
