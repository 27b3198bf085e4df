// crates/piggy-cli/tests/i18n.rs
// ============================================================================
// Module: CLI Message Catalog Tests
// Description: Validate catalog lookups and placeholder substitution.
// Purpose: Keep printed wording stable for scripts that match on it.
// Dependencies: piggy-cli
// ============================================================================

//! ## Overview
//! Exercises the [`piggy_cli::t`] macro against the static catalog.

#![allow(
    clippy::panic,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use piggy_cli::i18n::MessageArg;
use piggy_cli::i18n::translate;
use piggy_cli::t;

#[test]
fn view_confirmation_matches_startup_line() {
    assert_eq!(t!("serve.view.created", view = "Expenses"), "Expenses view created successfully");
}

#[test]
fn error_prefix_wraps_message() {
    let message = t!("main.error", error = "piggy.sqlite does not exist.");
    assert_eq!(message, "Error: piggy.sqlite does not exist.");
}

#[test]
fn missing_key_falls_back_to_key() {
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}

#[test]
fn unknown_placeholders_are_left_intact() {
    let message = translate("serve.backup.staged", vec![MessageArg::new("backup", "a.mmbak")]);
    assert_eq!(message, "Staged backup a.mmbak to {path}");
}

#[test]
fn every_placeholder_is_substituted() {
    let message = t!("output.write_failed", stream = "stdout", error = "broken pipe");
    assert_eq!(message, "Failed to write to stdout: broken pipe");
    assert!(!message.contains('{'));
}
