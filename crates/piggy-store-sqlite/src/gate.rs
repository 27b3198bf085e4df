// crates/piggy-store-sqlite/src/gate.rs
// ============================================================================
// Module: Query Gate
// Description: Gated execution of caller SQL against the session handle.
// Purpose: Admit read-only text, execute it, and always return a payload.
// Dependencies: piggy-gate, rusqlite, thiserror
// ============================================================================

//! ## Overview
//! [`QueryGate`] classifies caller text with [`piggy_gate::evaluate`] and only
//! touches the session handle for admitted text. Execution faults are
//! returned as [`QueryError`] from [`QueryGate::run`] and converted to an
//! `Error: <message>` payload by [`QueryGate::execute`], so no fault from a
//! query ever reaches the transport layer.
//!
//! ## Invariants
//! - Rejected text never reaches the handle.
//! - The original, unfolded text is what executes.
//! - Result sets are fetched eagerly; there is no pagination or streaming.
//! - No transaction wraps execution; multi-statement behavior is the engine's.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use piggy_gate::Rejection;
use piggy_gate::Verdict;
use rusqlite::Connection;
use thiserror::Error;

use crate::render::render_row;
use crate::session::SessionError;
use crate::session::SqliteSession;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Rendered result rows, one line per row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedRows(Vec<String>);

impl RenderedRows {
    /// Returns the rendered lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the result set was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins the rows into the success payload.
    #[must_use]
    pub fn into_payload(self) -> String {
        self.0.join("\n")
    }
}

/// Per-query failures. None of these are fatal to the session.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Text contained a denylisted token.
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// The engine faulted while running admitted text.
    #[error("{0}")]
    Engine(String),
    /// The session has no live handle.
    #[error("session is closed")]
    Closed,
}

impl QueryError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "rejected",
            Self::Engine(_) => "engine",
            Self::Closed => "closed",
        }
    }
}

impl From<SessionError> for QueryError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Closed => Self::Closed,
            other => Self::Engine(other.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Classifies and executes caller SQL against one session.
#[derive(Clone)]
pub struct QueryGate {
    /// Session providing the handle.
    session: Arc<SqliteSession>,
}

impl QueryGate {
    /// Creates a gate over the provided session.
    #[must_use]
    pub const fn new(session: Arc<SqliteSession>) -> Self {
        Self {
            session,
        }
    }

    /// Returns the session this gate executes against.
    #[must_use]
    pub const fn session(&self) -> &Arc<SqliteSession> {
        &self.session
    }

    /// Classifies query text without executing it.
    #[must_use]
    pub fn evaluate(&self, text: &str) -> Verdict {
        piggy_gate::evaluate(text)
    }

    /// Classifies and, when admitted, executes query text.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the text is rejected, the session is
    /// closed, or the engine faults.
    pub fn run(&self, text: &str) -> Result<RenderedRows, QueryError> {
        if let Verdict::Rejected(rejection) = self.evaluate(text) {
            return Err(QueryError::Rejected(rejection));
        }
        self.session
            .with_connection(|connection| fetch_rendered(connection, text))?
            .map_err(|err| QueryError::Engine(err.to_string()))
    }

    /// Classifies and executes query text, rendering any failure as text.
    #[must_use]
    pub fn execute(&self, text: &str) -> String {
        render_outcome(self.run(text))
    }
}

/// Converts a query outcome into the caller-facing payload.
#[must_use]
pub fn render_outcome(outcome: Result<RenderedRows, QueryError>) -> String {
    match outcome {
        Ok(rows) => rows.into_payload(),
        Err(err) => format!("Error: {err}"),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs the statement and renders every result row.
fn fetch_rendered(connection: &Connection, text: &str) -> Result<RenderedRows, rusqlite::Error> {
    if is_blank_statement(text) {
        return Ok(RenderedRows(Vec::new()));
    }
    let mut statement = connection.prepare(text)?;
    let columns = statement.column_count();
    let mut rows = statement.query([])?;
    let mut lines = Vec::new();
    while let Some(row) = rows.next()? {
        lines.push(render_row(row, columns)?);
    }
    Ok(RenderedRows(lines))
}

/// Returns true when `text` holds no statement: only whitespace, `;`, and
/// `--` or `/* */` comments. `SQLite` prepares such text to a null statement.
fn is_blank_statement(text: &str) -> bool {
    let mut rest = text;
    loop {
        rest = rest.trim_start_matches(|ch: char| ch.is_whitespace() || ch == ';');
        if rest.is_empty() {
            return true;
        }
        if let Some(comment) = rest.strip_prefix("--") {
            rest = comment.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(comment) = rest.strip_prefix("/*") {
            rest = comment.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            return false;
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
