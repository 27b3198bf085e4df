// crates/piggy-gate/src/lib.rs
// ============================================================================
// Module: Piggy Gate
// Description: Read-only classification for caller-supplied SQL text.
// Purpose: Decide admit/reject before any query reaches the database handle.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! `piggy-gate` classifies an arbitrary SQL string as admitted or rejected
//! using a fixed keyword denylist. It performs no I/O and never parses SQL:
//! the whole text is one classifiable unit. Execution of admitted text lives
//! in `piggy-store-sqlite`.
//!
//! ## Invariants
//! - Classification is deterministic for identical input text.
//! - Matching is case-insensitive substring matching, not word matching.
//! - Only a lowercase copy is inspected; callers execute the original text.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod denylist;
pub mod verdict;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use denylist::DENYLIST;
pub use denylist::evaluate;
pub use verdict::REJECTION_REASON;
pub use verdict::Rejection;
pub use verdict::Verdict;
pub use verdict::VerdictKind;
