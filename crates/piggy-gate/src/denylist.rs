// crates/piggy-gate/src/denylist.rs
// ============================================================================
// Module: Query Denylist
// Description: Keyword denylist used to classify caller-supplied SQL.
// Purpose: Keep data, schema, and connection settings out of caller reach.
// Dependencies: crate::verdict
// ============================================================================

//! ## Overview
//! The denylist is a bounded, explicit policy rather than a SQL parser. Any
//! occurrence of a reserved token anywhere in the lowercased text rejects the
//! query, including occurrences inside identifiers such as `price_update`.
//! That precision loss is accepted in exchange for never admitting a write.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::verdict::Rejection;
use crate::verdict::Verdict;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reserved tokens that force rejection when found as substrings.
pub const DENYLIST: &[&str] =
    &["insert", "update", "delete", "drop", "alter", "create", "pragma", "attach"];

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Classifies query text against the denylist.
///
/// The text is lowercased for matching only. The first token in
/// [`DENYLIST`] order that occurs in the text is reported in the rejection.
#[must_use]
pub fn evaluate(text: &str) -> Verdict {
    let folded = text.to_lowercase();
    DENYLIST
        .iter()
        .find(|token| folded.contains(*token))
        .map_or(Verdict::Admitted, |token| Verdict::Rejected(Rejection::new(token)))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::missing_docs_in_private_items,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions."
    )]

    use super::evaluate;
    use crate::verdict::Verdict;

    #[test]
    fn reports_first_token_in_denylist_order() {
        let verdict = evaluate("DROP TABLE t; INSERT INTO t VALUES (1)");
        assert_eq!(verdict.rejection().map(|rejection| rejection.token()), Some("insert"));
    }

    #[test]
    fn admits_plain_select() {
        assert_eq!(evaluate("SELECT 1"), Verdict::Admitted);
    }

    #[test]
    fn empty_text_is_admitted() {
        assert!(evaluate("").is_admitted());
    }
}
