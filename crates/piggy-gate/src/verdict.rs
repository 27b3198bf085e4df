// crates/piggy-gate/src/verdict.rs
// ============================================================================
// Module: Query Verdicts
// Description: Admit/reject outcomes produced by the query denylist.
// Purpose: Carry the gate decision and its fixed rejection reason.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Verdict`] is derived entirely from query text and has no identity of
//! its own. Rejections carry the denylisted token that triggered them for
//! audit labeling, but always render the same caller-facing reason.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Caller-facing reason attached to every rejection.
pub const REJECTION_REASON: &str = "Only SELECT queries are allowed";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Policy rejection for a query that contains a denylisted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("Only SELECT queries are allowed")]
pub struct Rejection {
    /// Denylisted token that matched first.
    token: &'static str,
}

impl Rejection {
    /// Creates a rejection for the matched token.
    #[must_use]
    pub const fn new(token: &'static str) -> Self {
        Self {
            token,
        }
    }

    /// Returns the denylisted token that caused the rejection.
    #[must_use]
    pub const fn token(&self) -> &'static str {
        self.token
    }

    /// Returns the fixed caller-facing reason.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        REJECTION_REASON
    }
}

/// Gate decision for one query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// No denylisted token is present; forward to execution.
    Admitted,
    /// A denylisted token is present; never touch the handle.
    Rejected(Rejection),
}

impl Verdict {
    /// Returns true when the query may be executed.
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }

    /// Returns the rejection when the query was refused.
    #[must_use]
    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Admitted => None,
            Self::Rejected(rejection) => Some(*rejection),
        }
    }

    /// Returns the label-only classification of this verdict.
    #[must_use]
    pub const fn kind(&self) -> VerdictKind {
        match self {
            Self::Admitted => VerdictKind::Admitted,
            Self::Rejected(_) => VerdictKind::Rejected,
        }
    }
}

/// Verdict classification without payload, for logging labels.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// Query was admitted.
    Admitted,
    /// Query was rejected by policy.
    Rejected,
}

impl VerdictKind {
    /// Returns a stable label for the verdict.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admitted => "admitted",
            Self::Rejected => "rejected",
        }
    }
}
