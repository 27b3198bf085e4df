// crates/piggy-cli/src/lib.rs
// ============================================================================
// Module: Piggy Explorer CLI Library
// Description: Shared helpers for the Piggy Explorer command-line interface.
// Purpose: Provide the message catalog to the binary and its tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! Houses the message catalog used by `src/main.rs` so every user-facing line
//! goes through the same lookup.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and the `t!` macro.
pub mod i18n;
