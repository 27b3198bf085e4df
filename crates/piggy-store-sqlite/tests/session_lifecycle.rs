// crates/piggy-store-sqlite/tests/session_lifecycle.rs
// ============================================================================
// Module: Session Lifecycle Tests
// Description: Validate acquisition, bootstrap, and release of the handle.
// Purpose: Ensure startup fails closed and release happens exactly once.
// Dependencies: piggy-store-sqlite, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Exercises the `uninitialized -> active -> closed` lifecycle against
//! scratch exports, including every fatal startup path.

#![allow(
    clippy::panic,
    clippy::missing_docs_in_private_items,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use piggy_store_sqlite::SessionError;
use piggy_store_sqlite::SessionState;
use piggy_store_sqlite::SqliteSession;
use rusqlite::Connection;
use tempfile::TempDir;

use crate::common::fixture;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn acquire_provisions_view_and_activates() {
    let temp = TempDir::new().unwrap();
    let session = SqliteSession::acquire(fixture(&temp)).expect("acquire");
    assert_eq!(session.state(), SessionState::Active);
    let definition = session.view_definition().unwrap().expect("view definition");
    assert!(definition.starts_with("CREATE VIEW expenses"), "unexpected: {definition}");
}

#[test]
fn bootstrap_view_persists_in_the_file() {
    let temp = TempDir::new().unwrap();
    let config = fixture(&temp);
    let session = SqliteSession::acquire(config.clone()).unwrap();
    session.release().unwrap();
    let connection = Connection::open(&config.path).unwrap();
    let count: i64 = connection
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'view' AND name = 'expenses'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn missing_database_fails_without_creating_file() {
    let temp = TempDir::new().unwrap();
    let mut config = fixture(&temp);
    config.path = temp.path().join("absent.sqlite");
    let session = SqliteSession::new(config.clone());
    let err = session.open().unwrap_err();
    assert!(matches!(err, SessionError::MissingDatabase(_)));
    assert_eq!(err.to_string(), format!("{} does not exist.", config.path.display()));
    assert_eq!(session.state(), SessionState::Closed);
    assert!(!config.path.exists());
    session.release().unwrap();
}

#[test]
fn missing_view_script_is_fatal() {
    let temp = TempDir::new().unwrap();
    let mut config = fixture(&temp);
    config.view_script = temp.path().join("missing.sql");
    let err = SqliteSession::acquire(config).err().expect("script error");
    assert!(matches!(err, SessionError::Script { .. }));
}

#[test]
fn failing_bootstrap_script_is_fatal_and_rolled_back() {
    let temp = TempDir::new().unwrap();
    let config = fixture(&temp);
    fs::write(&config.view_script, "CREATE VIEW expenses AS SELECT 1; THIS IS NOT SQL;").unwrap();
    let session = SqliteSession::new(config.clone());
    let err = session.open().unwrap_err();
    assert!(matches!(err, SessionError::Bootstrap(_)), "unexpected: {err}");
    assert_eq!(session.state(), SessionState::Closed);
    let connection = Connection::open(&config.path).unwrap();
    let views: i64 = connection
        .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'view'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(views, 0);
}

#[test]
fn script_without_named_view_is_fatal() {
    let temp = TempDir::new().unwrap();
    let config = fixture(&temp);
    fs::write(&config.view_script, "CREATE VIEW spending AS SELECT * FROM ZINOUTCOME;").unwrap();
    let err = SqliteSession::acquire(config).err().expect("view missing");
    assert!(matches!(err, SessionError::ViewMissing(ref name) if name == "expenses"));
}

#[test]
fn release_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let session = SqliteSession::acquire(fixture(&temp)).unwrap();
    session.release().unwrap();
    session.release().unwrap();
    session.release().unwrap();
    assert_eq!(session.state(), SessionState::Closed);
    assert!(matches!(session.view_definition(), Err(SessionError::Closed)));
}

#[test]
fn active_session_rejects_second_open() {
    let temp = TempDir::new().unwrap();
    let session = SqliteSession::acquire(fixture(&temp)).unwrap();
    assert!(matches!(session.open(), Err(SessionError::AlreadyActive)));
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn drop_releases_handle_for_reacquisition() {
    let temp = TempDir::new().unwrap();
    let config = fixture(&temp);
    {
        let _session = SqliteSession::acquire(config.clone()).unwrap();
    }
    let session = SqliteSession::acquire(config).expect("reacquire after drop");
    assert_eq!(session.state(), SessionState::Active);
}
