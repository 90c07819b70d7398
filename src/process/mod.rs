// ABOUTME: Typed external-process execution shared by every subprocess call.
// ABOUTME: One command descriptor, one runner trait, one production runner.

mod command;
mod outcome;
mod runner;

pub use command::{CommandSpec, OutputCapture};
pub use outcome::{CommandOutput, ExitState, OutputRef};
pub use runner::{CommandRunner, LaunchError, ProcessRunner, ensure_executable};
