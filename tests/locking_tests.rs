use daybook::storage::SessionLock;
use predicates::prelude::*;
use tempfile::tempdir;

mod test_helpers;
use test_helpers::base_daybook_command;

#[test]
fn test_second_session_is_refused() {
    let dir = tempdir().unwrap();
    let _held = SessionLock::acquire(dir.path()).unwrap();

    base_daybook_command(dir.path())
        .write_stdin("should not land\n:quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("open in another daybook session"));

    assert!(!dir.path().join("journalEntries.json").exists());
}

#[test]
fn test_settings_change_is_refused_while_session_open() {
    let dir = tempdir().unwrap();
    let _held = SessionLock::acquire(dir.path()).unwrap();

    base_daybook_command(dir.path())
        .args(["threshold", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session locking error"));
}

#[test]
fn test_reads_do_not_need_the_lock() {
    let dir = tempdir().unwrap();
    let _held = SessionLock::acquire(dir.path()).unwrap();

    base_daybook_command(dir.path())
        .arg("list")
        .assert()
        .success();
}

#[test]
fn test_lock_released_after_session() {
    let dir = tempdir().unwrap();
    base_daybook_command(dir.path())
        .write_stdin(":quit\n")
        .assert()
        .success();

    assert!(SessionLock::acquire(dir.path()).is_ok());
}
