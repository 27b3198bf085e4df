// crates/piggy-config/src/lib.rs
// ============================================================================
// Module: Piggy Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for piggy-explorer.toml semantics.
// Dependencies: piggy-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `piggy-config` defines the configuration model for Piggy Explorer: the
//! MCP transport, the database session, optional backup discovery, and audit
//! logging. Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
