// crates/piggy-mcp/tests/tool_router.rs
// ============================================================================
// Module: Tool Router Tests
// Description: Validate tool and resource routing through the public API.
// Purpose: Ensure query faults stay textual and arguments are strict.
// Dependencies: piggy-mcp, rusqlite, tempfile
// ============================================================================

//! ## Overview
//! Builds a [`ToolRouter`] over a scratch export and checks tool payloads,
//! argument validation, and resource reads.

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

use std::fs;
use std::sync::Arc;

use piggy_gate::VerdictKind;
use piggy_mcp::ToolError;
use piggy_mcp::ToolRouter;
use piggy_store_sqlite::SessionConfig;
use piggy_store_sqlite::SqliteSession;
use rusqlite::Connection;
use serde_json::json;
use tempfile::TempDir;

fn router_for(temp: &TempDir) -> ToolRouter {
    let path = temp.path().join("piggy.sqlite");
    let connection = Connection::open(&path).unwrap();
    connection
        .execute_batch(
            "CREATE TABLE ZINOUTCOME (Z_PK INTEGER PRIMARY KEY, ZAMOUNT REAL, ZCONTENT TEXT, ZDO_TYPE INTEGER);
             INSERT INTO ZINOUTCOME VALUES (1, 3.5, 'Coffee', 1), (2, 1200.0, 'Rent', 1), (3, 5.0, NULL, 0);",
        )
        .unwrap();
    connection.close().unwrap();
    let view_script = temp.path().join("expenses.view.sql");
    fs::write(
        &view_script,
        "DROP VIEW IF EXISTS expenses;
         CREATE VIEW expenses AS SELECT Z_PK AS id, ZAMOUNT AS amount, ZCONTENT AS note
         FROM ZINOUTCOME WHERE ZDO_TYPE = 1;",
    )
    .unwrap();
    let session = SqliteSession::acquire(SessionConfig {
        path,
        view_script,
        view_name: "expenses".to_string(),
        busy_timeout_ms: 1_000,
    })
    .unwrap();
    ToolRouter::new(Arc::new(session))
}

#[test]
fn query_data_renders_rows() {
    let temp = TempDir::new().unwrap();
    let router = router_for(&temp);
    let outcome = router
        .handle_tool_call("query_data", json!({"sql": "SELECT id, note FROM expenses ORDER BY id"}))
        .unwrap();
    assert_eq!(outcome.text, "(1, 'Coffee')\n(2, 'Rent')");
    assert_eq!(outcome.verdict, VerdictKind::Admitted);
}

#[test]
fn query_data_reports_rejection_as_text() {
    let temp = TempDir::new().unwrap();
    let router = router_for(&temp);
    let outcome = router
        .handle_tool_call("query_data", json!({"sql": "select price_update from x"}))
        .unwrap();
    assert_eq!(outcome.text, "Error: Only SELECT queries are allowed");
    assert_eq!(outcome.verdict, VerdictKind::Rejected);
    assert_eq!(outcome.query_bytes, "select price_update from x".len());
}

#[test]
fn query_data_requires_string_sql() {
    let temp = TempDir::new().unwrap();
    let router = router_for(&temp);
    for payload in [json!({}), json!({"sql": 5}), json!({"sql": "SELECT 1", "limit": 10}), json!(null)]
    {
        let err = router.handle_tool_call("query_data", payload).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)), "unexpected: {err}");
    }
}

#[test]
fn unknown_tool_is_rejected() {
    let temp = TempDir::new().unwrap();
    let router = router_for(&temp);
    let err = router.handle_tool_call("execute_sql", json!({"sql": "SELECT 1"})).unwrap_err();
    assert!(matches!(err, ToolError::UnknownTool));
    assert_eq!(err.kind(), "unknown_tool");
}

#[test]
fn explain_view_tracks_live_definition() {
    let temp = TempDir::new().unwrap();
    let router = router_for(&temp);
    let contents = router.read_resource("schema://explain-expenses-view").unwrap();
    assert_eq!(contents.mime_type, "text/plain");
    assert!(contents.text.contains("FROM ZINOUTCOME WHERE ZDO_TYPE = 1"), "{}", contents.text);
}

#[test]
fn explain_view_after_release_is_internal_error() {
    let temp = TempDir::new().unwrap();
    let router = router_for(&temp);
    router.session().release().unwrap();
    let err = router.read_resource("schema://explain-expenses-view").unwrap_err();
    assert!(matches!(err, ToolError::Internal(ref message) if message == "session is closed"));
    let intro = router.read_resource("intro://readme").unwrap();
    assert!(intro.text.starts_with("This MCP server allows reading"));
}
