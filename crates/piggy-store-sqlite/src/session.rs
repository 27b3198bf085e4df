// crates/piggy-store-sqlite/src/session.rs
// ============================================================================
// Module: SQLite Session Lifecycle
// Description: Acquisition, view bootstrap, and release of the database handle.
// Purpose: Hand exactly one provisioned handle to the query layer per session.
// Dependencies: rusqlite, thiserror
// ============================================================================

//! ## Overview
//! A [`SqliteSession`] moves through `uninitialized -> active -> closed`.
//! Opening requires an existing database file, runs the bootstrap script as a
//! single transactional batch, and verifies the bootstrap view exists before
//! the session becomes active. Any startup failure leaves the session closed
//! with no handle. Release is idempotent and also runs on drop.
//!
//! The handle never leaves this module: callers borrow it for the duration of
//! a closure through [`SqliteSession::with_connection`], serialized by a mutex.

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use thiserror::Error;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "./piggy.sqlite";
/// Default bootstrap script location.
pub const DEFAULT_VIEW_SCRIPT_PATH: &str = "./sqls/expenses.view.sql";
/// Default bootstrap view name.
pub const DEFAULT_VIEW_NAME: &str = "expenses";
/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum bootstrap script size accepted at startup.
pub const MAX_VIEW_SCRIPT_BYTES: usize = 1024 * 1024;

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// Configuration for a `SQLite` session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Path to the existing `SQLite` database file.
    pub path: PathBuf,
    /// Path to the trusted bootstrap script.
    pub view_script: PathBuf,
    /// Name of the view the bootstrap script must create.
    pub view_name: String,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            view_script: PathBuf::from(DEFAULT_VIEW_SCRIPT_PATH),
            view_name: DEFAULT_VIEW_NAME.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Returns true when `name` is a non-empty `[A-Za-z0-9_]` identifier.
#[must_use]
pub fn is_view_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// Session lifecycle errors.
///
/// Every variant except [`SessionError::Closed`] is fatal at startup.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The database file does not exist.
    #[error("{} does not exist.", .0.display())]
    MissingDatabase(PathBuf),
    /// The bootstrap script could not be read.
    #[error("bootstrap script unreadable ({}): {message}", .path.display())]
    Script {
        /// Script path.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },
    /// The bootstrap script failed to execute.
    #[error("bootstrap script failed: {0}")]
    Bootstrap(String),
    /// The bootstrap view is missing after the script ran.
    #[error("bootstrap view {0} was not created")]
    ViewMissing(String),
    /// `SQLite` engine error outside query execution.
    #[error("sqlite session db error: {0}")]
    Db(String),
    /// The session has no live handle.
    #[error("session is closed")]
    Closed,
    /// The session is already active.
    #[error("session is already active")]
    AlreadyActive,
    /// File system error during backup staging.
    #[error("sqlite session io error: {0}")]
    Io(String),
    /// Invalid session input.
    #[error("sqlite session invalid data: {0}")]
    Invalid(String),
    /// No backup export was found.
    #[error("no backup file with extension .{extension} found in {}", .dir.display())]
    BackupNotFound {
        /// Directory searched.
        dir: PathBuf,
        /// Extension searched for.
        extension: String,
    },
}

// ============================================================================//
// SECTION: Session
// ============================================================================//

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed; no handle has been opened.
    Uninitialized,
    /// Handle is open and the bootstrap view exists.
    Active,
    /// Handle released, or startup failed. Terminal.
    Closed,
}

impl SessionState {
    /// Returns a stable label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

/// Mutable session internals guarded by the session mutex.
struct SessionInner {
    /// Lifecycle state.
    state: SessionState,
    /// Live handle; present only while active.
    connection: Option<Connection>,
}

/// Exclusive owner of one `SQLite` handle for a serving session.
pub struct SqliteSession {
    /// Session configuration.
    config: SessionConfig,
    /// Handle and lifecycle state, one in-flight user at a time.
    inner: Mutex<SessionInner>,
}

impl SqliteSession {
    /// Creates an uninitialized session. No file system access happens here.
    #[must_use]
    pub const fn new(config: SessionConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(SessionInner {
                state: SessionState::Uninitialized,
                connection: None,
            }),
        }
    }

    /// Creates and opens a session in one step.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the database is missing or the bootstrap
    /// view cannot be provisioned.
    pub fn acquire(config: SessionConfig) -> Result<Self, SessionError> {
        let session = Self::new(config);
        session.open()?;
        Ok(session)
    }

    /// Opens the handle and provisions the bootstrap view.
    ///
    /// On failure the session transitions to [`SessionState::Closed`] and no
    /// handle is retained.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is not uninitialized, the
    /// database file is missing, or bootstrap fails.
    pub fn open(&self) -> Result<(), SessionError> {
        let mut inner = self.lock_inner();
        match inner.state {
            SessionState::Uninitialized => {}
            SessionState::Active => return Err(SessionError::AlreadyActive),
            SessionState::Closed => return Err(SessionError::Closed),
        }
        match open_connection(&self.config) {
            Ok(connection) => {
                inner.connection = Some(connection);
                inner.state = SessionState::Active;
                Ok(())
            }
            Err(err) => {
                inner.state = SessionState::Closed;
                Err(err)
            }
        }
    }

    /// Releases the handle. Safe to call any number of times.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Db`] when `SQLite` reports a failure while
    /// closing. The session is closed and the handle dropped regardless.
    pub fn release(&self) -> Result<(), SessionError> {
        let connection = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.state = SessionState::Closed;
            inner.connection.take()
        };
        match connection {
            Some(connection) => {
                connection.close().map_err(|(_, err)| SessionError::Db(err.to_string()))
            }
            None => Ok(()),
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).state
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Runs `f` against the live handle while holding the session lock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] when the session is not active and
    /// [`SessionError::Db`] when the lock is poisoned.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> T) -> Result<T, SessionError> {
        let guard =
            self.inner.lock().map_err(|_| SessionError::Db("mutex poisoned".to_string()))?;
        let connection = guard.connection.as_ref().ok_or(SessionError::Closed)?;
        let output = f(connection);
        drop(guard);
        Ok(output)
    }

    /// Returns the stored definition of the bootstrap view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session is closed or the catalog
    /// query fails.
    pub fn view_definition(&self) -> Result<Option<String>, SessionError> {
        let view_name = self.config.view_name.as_str();
        self.with_connection(|connection| {
            connection
                .query_row(
                    "SELECT sql FROM sqlite_master WHERE name = ?1",
                    params![view_name],
                    |row| row.get::<_, Option<String>>(0),
                )
                .optional()
                .map(Option::flatten)
                .map_err(|err| SessionError::Db(err.to_string()))
        })?
    }

    /// Locks the session internals, recovering from poisoning.
    fn lock_inner(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        inner.state = SessionState::Closed;
        if let Some(connection) = inner.connection.take() {
            let _ = connection.close();
        }
    }
}

// ============================================================================//
// SECTION: Helpers
// ============================================================================//

/// Opens the database and provisions the bootstrap view.
fn open_connection(config: &SessionConfig) -> Result<Connection, SessionError> {
    validate_view_name(&config.view_name)?;
    if !config.path.is_file() {
        return Err(SessionError::MissingDatabase(config.path.clone()));
    }
    let script = read_view_script(&config.view_script)?;
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let mut connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SessionError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SessionError::Db(err.to_string()))?;
    run_bootstrap(&mut connection, &script)?;
    if !view_exists(&connection, &config.view_name)? {
        return Err(SessionError::ViewMissing(config.view_name.clone()));
    }
    Ok(connection)
}

/// Reads the bootstrap script verbatim.
fn read_view_script(path: &Path) -> Result<String, SessionError> {
    let script_error = |message: String| SessionError::Script {
        path: path.to_path_buf(),
        message,
    };
    let bytes = fs::read(path).map_err(|err| script_error(err.to_string()))?;
    if bytes.len() > MAX_VIEW_SCRIPT_BYTES {
        return Err(script_error(format!(
            "script exceeds size limit: {} bytes (max {MAX_VIEW_SCRIPT_BYTES})",
            bytes.len()
        )));
    }
    String::from_utf8(bytes).map_err(|_| script_error("script must be utf-8".to_string()))
}

/// Executes the bootstrap script as one transactional batch.
fn run_bootstrap(connection: &mut Connection, script: &str) -> Result<(), SessionError> {
    let tx = connection.transaction().map_err(|err| SessionError::Bootstrap(err.to_string()))?;
    tx.execute_batch(script).map_err(|err| SessionError::Bootstrap(err.to_string()))?;
    tx.commit().map_err(|err| SessionError::Bootstrap(err.to_string()))
}

/// Returns true when the named view is present in the catalog.
fn view_exists(connection: &Connection, view_name: &str) -> Result<bool, SessionError> {
    let count: i64 = connection
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'view' AND name = ?1",
            params![view_name],
            |row| row.get(0),
        )
        .map_err(|err| SessionError::Db(err.to_string()))?;
    Ok(count > 0)
}

/// Validates the bootstrap view identifier.
fn validate_view_name(view_name: &str) -> Result<(), SessionError> {
    if !is_view_identifier(view_name) {
        return Err(SessionError::Invalid(format!("invalid view name: '{view_name}'")));
    }
    Ok(())
}

// ============================================================================//
// SECTION: Tests
// ============================================================================//
