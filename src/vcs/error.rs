// ABOUTME: Version-control error types with SNAFU context selectors.
// ABOUTME: Separates launch failures, failed client commands, and unparsable output.

use snafu::Snafu;

use crate::process::{ExitState, LaunchError, OutputRef};

/// Errors from version-control operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VcsError {
    #[snafu(display("could not run svn {operation}: {source}"))]
    Launch {
        operation: &'static str,
        source: LaunchError,
    },

    #[snafu(display("svn {operation} failed ({exit}):\n{output}"))]
    Command {
        operation: &'static str,
        exit: ExitState,
        output: OutputRef,
    },

    #[snafu(display("failed to parse svn log output: {source}"))]
    Parse { source: quick_xml::DeError },

    #[snafu(display("unknown changed-path action '{action}' for {path}"))]
    UnknownAction { action: String, path: String },
}
