// ABOUTME: Integration tests for the PID-file deploy lock.
// ABOUTME: Tests acquisition, live holder detection, stale reclamation, and release.

use tagdeploy::deploy::{DeployLock, LockError, process_alive};

#[test]
fn acquire_writes_own_pid_and_release_removes_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tagdeploy.lock");

    let lock = DeployLock::acquire(&path).expect("lock should succeed");
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        std::process::id().to_string()
    );
    assert_eq!(lock.path(), path);

    lock.release().expect("release should succeed");
    assert!(!path.exists());
}

#[test]
fn live_holder_is_reported_and_record_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tagdeploy.lock");
    let _held = DeployLock::acquire(&path).unwrap();

    let err = DeployLock::acquire(&path).unwrap_err();
    assert!(
        matches!(err, LockError::AlreadyRunning { pid } if pid == std::process::id()),
        "unexpected error: {err}"
    );
    assert!(path.exists());
}

#[test]
fn dead_holder_is_reclaimed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tagdeploy.lock");
    std::fs::write(&path, "99999999").unwrap();

    let lock = DeployLock::acquire(&path).expect("stale lock should be reclaimed");
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        std::process::id().to_string()
    );
    drop(lock);
    assert!(!path.exists(), "drop should remove the record");
}

#[test]
fn garbage_record_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tagdeploy.lock");
    std::fs::write(&path, "not-a-pid").unwrap();

    let err = DeployLock::acquire(&path).unwrap_err();
    assert!(matches!(err, LockError::InvalidRecord { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not-a-pid");
}

#[test]
fn unwritable_location_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tagdeploy.lock");

    let err = DeployLock::acquire(&path).unwrap_err();
    assert!(matches!(err, LockError::Write { .. }));
}

#[test]
fn probe_sees_current_process() {
    assert!(process_alive(std::process::id()).unwrap());
}
