// crates/piggy-store-sqlite/tests/common/mod.rs
// ============================================================================
// Module: Session Test Fixtures
// Description: Scratch finance exports and bootstrap scripts for tests.
// Purpose: Build realistic databases without touching the working directory.
// Dependencies: rusqlite, tempfile
// ============================================================================

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared fixtures; not every test binary uses every helper."
)]

use std::fs;
use std::path::Path;

use piggy_store_sqlite::SessionConfig;
use rusqlite::Connection;
use tempfile::TempDir;

/// Bootstrap script mirroring the shipped expenses view.
pub const VIEW_SCRIPT: &str = "DROP VIEW IF EXISTS expenses;
CREATE VIEW expenses AS
SELECT t.Z_PK AS id, t.ZAMOUNT AS amount, c.ZNAME AS category, t.ZCONTENT AS note
FROM ZINOUTCOME AS t
LEFT JOIN ZCATEGORY AS c ON c.Z_PK = t.ZCATEGORY
WHERE t.ZDO_TYPE = 1;";

/// Creates a small Money Manager style export at `path`.
pub fn write_export(path: &Path) {
    let connection = Connection::open(path).expect("create export");
    connection
        .execute_batch(
            "CREATE TABLE ZCATEGORY (Z_PK INTEGER PRIMARY KEY, ZNAME TEXT);
             CREATE TABLE ZINOUTCOME (
                 Z_PK INTEGER PRIMARY KEY,
                 ZDATE REAL,
                 ZAMOUNT REAL,
                 ZCATEGORY INTEGER,
                 ZCONTENT TEXT,
                 ZDO_TYPE INTEGER
             );
             INSERT INTO ZCATEGORY VALUES (1, 'Food'), (2, 'Rent'), (3, 'Salary');
             INSERT INTO ZINOUTCOME VALUES
                 (1, 700000000, 12.5, 1, 'Lunch', 1),
                 (2, 700086400, 950.0, 2, NULL, 1),
                 (3, 700172800, 3000.0, 3, 'Payday', 0),
                 (4, 700259200, 4.25, 1, 'Joe''s Cafe', 1);",
        )
        .expect("seed export");
    connection.close().expect("close export");
}

/// Writes an export plus bootstrap script and returns a matching config.
pub fn fixture(temp: &TempDir) -> SessionConfig {
    let path = temp.path().join("piggy.sqlite");
    write_export(&path);
    let view_script = temp.path().join("expenses.view.sql");
    fs::write(&view_script, VIEW_SCRIPT).expect("write view script");
    SessionConfig {
        path,
        view_script,
        view_name: "expenses".to_string(),
        busy_timeout_ms: 1_000,
    }
}
