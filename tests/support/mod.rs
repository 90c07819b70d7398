// ABOUTME: Test support utilities.
// ABOUTME: Scripted version-control fake, executable script fixtures, and settings builders.

#![allow(dead_code)]

use async_trait::async_trait;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, Once};
use tagdeploy::config::{BuildOutput, BuildSettings, ExecutorSettings, TagLayout};
use tagdeploy::logging::LogSettings;
use tagdeploy::process::{ExitState, OutputRef};
use tagdeploy::types::RepositoryUrl;
use tagdeploy::vcs::{CommitEvent, VcsError, VersionControl};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("tagdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Marker directory that makes a directory count as a working copy.
pub const ADMIN_DIR: &str = ".svn";

/// In-memory stand-in for the svn client.
///
/// `checkout` creates the target with an admin directory, `info` succeeds
/// only if that directory exists, and `switch` fails a scripted number of
/// times before succeeding.
#[derive(Debug, Default)]
pub struct FakeVcs {
    commit: Option<CommitEvent>,
    log_fails: bool,
    checkout_fails: bool,
    switch_failures: AtomicU32,
    calls: Mutex<Vec<String>>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commit(mut self, commit: CommitEvent) -> Self {
        self.commit = Some(commit);
        self
    }

    pub fn failing_log(mut self) -> Self {
        self.log_fails = true;
        self
    }

    pub fn failing_checkout(mut self) -> Self {
        self.checkout_fails = true;
        self
    }

    /// Fail the next `count` switch calls.
    pub fn failing_switches(self, count: u32) -> Self {
        self.switch_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn switch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with("switch"))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn failure(operation: &'static str, message: &str) -> VcsError {
    VcsError::Command {
        operation,
        exit: ExitState::Code(1),
        output: OutputRef::Captured(message.to_string()),
    }
}

#[async_trait]
impl VersionControl for FakeVcs {
    async fn log_revision(
        &self,
        repository: &RepositoryUrl,
        revision: u64,
    ) -> Result<Option<CommitEvent>, VcsError> {
        self.record(format!("log {} {}", repository, revision));
        if self.log_fails {
            return Err(failure("log", "svn: E160006: No such revision"));
        }
        Ok(self.commit.clone())
    }

    async fn info(&self, path: &Path) -> Result<(), VcsError> {
        self.record(format!("info {}", path.display()));
        if path.join(ADMIN_DIR).is_dir() {
            Ok(())
        } else {
            Err(failure("info", "svn: E155007: not a working copy"))
        }
    }

    async fn checkout(&self, url: &str, path: &Path) -> Result<(), VcsError> {
        self.record(format!("checkout {} {}", url, path.display()));
        if self.checkout_fails {
            return Err(failure("checkout", "svn: E170013: Unable to connect"));
        }
        std::fs::create_dir_all(path.join(ADMIN_DIR)).unwrap();
        Ok(())
    }

    async fn switch(&self, url: &str, path: &Path) -> Result<(), VcsError> {
        self.record(format!("switch {} {}", url, path.display()));
        let remaining = self.switch_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.switch_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(failure("switch", "svn: E155004: Working copy locked"));
        }
        if !path.exists() {
            std::fs::create_dir_all(path.join(ADMIN_DIR)).unwrap();
        }
        Ok(())
    }
}

/// Write an executable `/bin/sh` script.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Executor settings rooted in `dir`, building with `command`.
pub fn executor_settings(dir: &Path, command: &Path) -> ExecutorSettings {
    ExecutorSettings {
        repository_url: "http://svn.example.com/scdb".to_string(),
        layout: TagLayout::default(),
        build: BuildSettings {
            command: command.to_path_buf(),
            target: "deploy.and.notify".to_string(),
            java_home: PathBuf::from("/usr/java/latest"),
            opts: None,
            output: BuildOutput::Pipe,
        },
        working_copy: dir.join("svncache"),
        switch_retries: 1,
        lock_file: dir.join("tagdeploy.lock"),
        svn: PathBuf::from("svn"),
        log: LogSettings::terminal_only(0),
    }
}
