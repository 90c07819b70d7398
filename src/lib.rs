// ABOUTME: Library root for tagdeploy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod classify;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod process;
pub mod report;
pub mod trigger;
pub mod types;
pub mod vcs;
