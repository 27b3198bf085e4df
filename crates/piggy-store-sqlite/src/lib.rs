// crates/piggy-store-sqlite/src/lib.rs
// ============================================================================
// Module: Piggy SQLite Session
// Description: Session lifecycle and gated query execution over SQLite.
// Purpose: Own the single database handle for a serving session.
// Dependencies: piggy-gate, rusqlite
// ============================================================================

//! ## Overview
//! This crate owns the one `SQLite` handle a Piggy Explorer session serves
//! from. [`SqliteSession`] opens an existing finance export, provisions the
//! bootstrap view, and releases the handle exactly once. [`QueryGate`] runs
//! caller SQL against that handle after classification by `piggy-gate`, and
//! always resolves to a text payload. Backup discovery stages the newest
//! export into place before a session opens.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod backup;
pub mod gate;
pub mod render;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use backup::BackupSource;
pub use backup::discover_latest_backup;
pub use backup::stage_latest_backup;
pub use gate::QueryError;
pub use gate::QueryGate;
pub use gate::RenderedRows;
pub use gate::render_outcome;
pub use session::SessionConfig;
pub use session::SessionError;
pub use session::SessionState;
pub use session::SqliteSession;
