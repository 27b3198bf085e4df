// crates/piggy-store-sqlite/tests/backup_discovery.rs
// ============================================================================
// Module: Backup Discovery Tests
// Description: Validate newest-backup selection and staging.
// Purpose: Ensure the alternate acquisition path fails closed.
// Dependencies: piggy-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Covers newest-export selection, extension matching, and staging a backup
//! into the session path.

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

use std::fs;
use std::thread;
use std::time::Duration;

use piggy_store_sqlite::BackupSource;
use piggy_store_sqlite::SessionError;
use piggy_store_sqlite::SessionState;
use piggy_store_sqlite::SqliteSession;
use piggy_store_sqlite::discover_latest_backup;
use piggy_store_sqlite::stage_latest_backup;
use tempfile::TempDir;

use crate::common::fixture;
use crate::common::write_export;

#[test]
fn empty_directory_reports_backup_not_found() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), "not a backup").unwrap();
    let err = discover_latest_backup(&BackupSource::new(temp.path())).unwrap_err();
    assert!(matches!(err, SessionError::BackupNotFound { .. }));
}

#[test]
fn missing_directory_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let err = discover_latest_backup(&BackupSource::new(temp.path().join("nope"))).unwrap_err();
    assert!(matches!(err, SessionError::Io(_)));
}

#[test]
fn newest_backup_wins() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("older.mmbak"), "old").unwrap();
    thread::sleep(Duration::from_millis(50));
    fs::write(temp.path().join("newer.MMBAK"), "new").unwrap();
    let latest = discover_latest_backup(&BackupSource::new(temp.path())).unwrap();
    assert_eq!(latest.file_name().unwrap(), "newer.MMBAK");
}

#[test]
fn custom_extension_is_honored() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.mmbak"), "x").unwrap();
    fs::write(temp.path().join("b.sqlite"), "y").unwrap();
    let source = BackupSource {
        dir: temp.path().to_path_buf(),
        extension: ".sqlite".to_string(),
    };
    let latest = discover_latest_backup(&source).unwrap();
    assert_eq!(latest.file_name().unwrap(), "b.sqlite");
}

#[test]
fn staged_backup_opens_as_session() {
    let temp = TempDir::new().unwrap();
    let backups = temp.path().join("backups");
    fs::create_dir_all(&backups).unwrap();
    write_export(&backups.join("2024-05-01.mmbak"));
    let mut config = fixture(&temp);
    config.path = temp.path().join("work").join("piggy.sqlite");
    let staged = stage_latest_backup(&BackupSource::new(&backups), &config.path).unwrap();
    assert_eq!(staged.file_name().unwrap(), "2024-05-01.mmbak");
    let session = SqliteSession::acquire(config).unwrap();
    assert_eq!(session.state(), SessionState::Active);
}
