// crates/piggy-store-sqlite/src/render.rs
// ============================================================================
// Module: Row Rendering
// Description: Deterministic text rendering for SQLite result values.
// Purpose: Turn result rows into one human-readable line each.
// Dependencies: rusqlite
// ============================================================================

//! ## Overview
//! Rows render as a parenthesized, comma-separated list of values. Text is
//! single-quoted with embedded quotes doubled, blobs render as `X'..'` hex,
//! and reals always carry a fractional part so they stay distinct from
//! integers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use rusqlite::Row;
use rusqlite::types::ValueRef;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the first `columns` values of a row as one line.
///
/// # Errors
///
/// Returns [`rusqlite::Error`] when a column cannot be read.
pub fn render_row(row: &Row<'_>, columns: usize) -> Result<String, rusqlite::Error> {
    let mut line = String::from("(");
    for index in 0 .. columns {
        if index > 0 {
            line.push_str(", ");
        }
        render_value(&mut line, row.get_ref(index)?);
    }
    line.push(')');
    Ok(line)
}

/// Appends the textual form of one value.
pub fn render_value(out: &mut String, value: ValueRef<'_>) {
    match value {
        ValueRef::Null => out.push_str("NULL"),
        ValueRef::Integer(value) => {
            let _ = write!(out, "{value}");
        }
        ValueRef::Real(value) => render_real(out, value),
        ValueRef::Text(bytes) => {
            out.push('\'');
            out.push_str(&String::from_utf8_lossy(bytes).replace('\'', "''"));
            out.push('\'');
        }
        ValueRef::Blob(bytes) => {
            out.push_str("X'");
            for byte in bytes {
                let _ = write!(out, "{byte:02X}");
            }
            out.push('\'');
        }
    }
}

/// Appends a real, keeping a fractional part for whole numbers.
fn render_real(out: &mut String, value: f64) {
    if value.is_finite() && value.fract() == 0.0 {
        let _ = write!(out, "{value:.1}");
    } else {
        let _ = write!(out, "{value}");
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
