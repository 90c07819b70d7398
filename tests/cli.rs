// ABOUTME: Integration tests for the tagdeploy CLI surface.
// ABOUTME: Validates help, version, usage errors, and fatal exit status.

use assert_cmd::Command;
use predicates::prelude::*;

fn tagdeploy_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tagdeploy"))
}

#[test]
fn help_shows_commands() {
    tagdeploy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("post-commit"))
        .stdout(predicate::str::contains("build-tag"));
}

#[test]
fn version_exits_cleanly() {
    tagdeploy_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_revision_is_a_usage_error() {
    tagdeploy_cmd()
        .args(["post-commit", "/srv/svn/scdb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("REV"));
}

#[test]
fn non_numeric_tag_is_rejected_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tagdeploy.yml");
    let lock = dir.path().join("tagdeploy.lock");
    std::fs::write(
        &config,
        format!(
            "repository:\n  url: http://svn.example.com/scdb\nbuild:\n  lock_file: {}\n",
            lock.display()
        ),
    )
    .unwrap();

    tagdeploy_cmd()
        .arg("--config")
        .arg(&config)
        .args(["build-tag", "release-abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid character"));

    assert!(!lock.exists());
}

#[test]
fn missing_config_is_fatal_for_build_tag() {
    let dir = tempfile::tempdir().unwrap();

    tagdeploy_cmd()
        .arg("--config")
        .arg(dir.path().join("absent.yml"))
        .args(["build-tag", "1.0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn missing_runtime_home_fails_before_locking() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tagdeploy.yml");
    let lock = dir.path().join("tagdeploy.lock");
    let log = dir.path().join("tagdeploy.log");
    std::fs::write(
        &config,
        format!(
            "repository:\n  url: http://svn.example.com/scdb\nbuild:\n  java_home: {}\n  lock_file: {}\n  log_file: {}\n",
            dir.path().join("no-jdk").display(),
            lock.display(),
            log.display()
        ),
    )
    .unwrap();

    tagdeploy_cmd()
        .arg("--config")
        .arg(&config)
        .args(["build-tag", "1.0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));

    assert!(!lock.exists());
    let logged = std::fs::read_to_string(&log).unwrap();
    assert!(logged.contains("ERROR"));
    assert!(logged.contains("does not exist"));
}

#[test]
fn post_commit_echo_carries_no_angle_brackets() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let svn = dir.path().join("svn");
    std::fs::write(
        &svn,
        "#!/bin/sh\necho '<?xml version=\"1.0\"?><log>'\necho 'svn: E160006: No such revision <99>' >&2\nexit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&svn, std::fs::Permissions::from_mode(0o755)).unwrap();
    let log = dir.path().join("post-commit.log");
    let config = dir.path().join("tagdeploy.yml");
    std::fs::write(
        &config,
        format!(
            "hook:\n  svn: {}\n  log_file: {}\n",
            svn.display(),
            log.display()
        ),
    )
    .unwrap();

    tagdeploy_cmd()
        .arg("--config")
        .arg(&config)
        .args(["post-commit", "/srv/svn/scdb", "99"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No such revision 99"))
        .stderr(predicate::str::contains("<").not())
        .stderr(predicate::str::contains(">").not());

    let logged = std::fs::read_to_string(&log).unwrap();
    assert!(logged.contains("No such revision <99>"));
}
