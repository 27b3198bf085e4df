// crates/piggy-config/src/config.rs
// ============================================================================
// Module: Piggy Explorer Configuration
// Description: Configuration loading and validation for Piggy Explorer.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: piggy-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! When no path is given and neither the environment override nor the
//! default file exists, built-in defaults apply. A path that was named
//! explicitly must exist.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use piggy_store_sqlite::BackupSource;
use piggy_store_sqlite::SessionConfig;
use piggy_store_sqlite::session::DEFAULT_BUSY_TIMEOUT_MS;
use piggy_store_sqlite::session::DEFAULT_DATABASE_PATH;
use piggy_store_sqlite::session::DEFAULT_VIEW_NAME;
use piggy_store_sqlite::session::DEFAULT_VIEW_SCRIPT_PATH;
use piggy_store_sqlite::session::is_view_identifier;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "piggy-explorer.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PIGGY_EXPLORER_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum allowed request body size in bytes.
pub(crate) const MAX_BODY_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Maximum allowed busy timeout in milliseconds.
pub(crate) const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Piggy Explorer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PiggyConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database session configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl PiggyConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        Self::load_resolved(&resolved)
    }

    /// Loads configuration from an already resolved source.
    fn load_resolved(resolved: &ResolvedPath) -> Result<Self, ConfigError> {
        validate_path(&resolved.path)?;
        if !resolved.required && !resolved.path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved.path).map_err(|err| {
            ConfigError::Io(format!("{}: {err}", resolved.path.display()))
        })?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line overrides, then re-validates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the overridden configuration is invalid.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(path) = overrides.db_path {
            self.database.path = path;
        }
        if let Some(view_script) = overrides.view_script {
            self.database.view_script = view_script;
        }
        if let Some(dir) = overrides.backup_dir {
            let extension = self
                .database
                .backup
                .take()
                .map_or_else(|| BackupSource::new(&dir).extension, |backup| backup.extension);
            self.database.backup = Some(BackupSource {
                dir,
                extension,
            });
        }
        self.validate()
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        Ok(())
    }

    /// Projects the database section into a session configuration.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            path: self.database.path.clone(),
            view_script: self.database.view_script.clone(),
            view_name: self.database.view_name.clone(),
            busy_timeout_ms: self.database.busy_timeout_ms,
        }
    }
}

/// Command-line overrides for configuration values.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Database file path override.
    pub db_path: Option<PathBuf>,
    /// Bootstrap script path override.
    pub view_script: Option<PathBuf>,
    /// Backup directory override.
    pub backup_dir: Option<PathBuf>,
}

/// MCP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Transport type for MCP.
    #[serde(default)]
    pub transport: ServerTransport,
    /// Bind address for the HTTP transport.
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            bind: None,
            max_body_bytes: default_max_body_bytes(),
            audit: ServerAuditConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validates server transport configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_body_bytes exceeds limit ({MAX_BODY_BYTES_LIMIT})"
            )));
        }
        match self.transport {
            ServerTransport::Stdio => {}
            ServerTransport::Http => {
                let bind = self.bind.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("http transport requires bind address".to_string())
                })?;
                bind.parse::<SocketAddr>().map_err(|_| {
                    ConfigError::Invalid(format!("invalid bind address: {bind}"))
                })?;
            }
        }
        self.audit.validate()
    }

    /// Returns the parsed bind address for the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no valid bind address is configured.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let bind = self
            .bind
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("bind address required".to_string()))?;
        bind.parse().map_err(|_| ConfigError::Invalid(format!("invalid bind address: {bind}")))
    }
}

/// Supported MCP transport types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// Use stdin/stdout transport.
    #[default]
    Stdio,
    /// Use HTTP JSON-RPC transport.
    Http,
}

impl ServerTransport {
    /// Returns a stable label for the transport.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

/// Audit logging configuration for MCP server requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerAuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for ServerAuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl ServerAuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("server.audit.path", path)?;
        }
        Ok(())
    }
}

/// Database session configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the `SQLite` export.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    /// Path to the bootstrap view script.
    #[serde(default = "default_view_script")]
    pub view_script: PathBuf,
    /// Name of the bootstrap view.
    #[serde(default = "default_view_name")]
    pub view_name: String,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// Optional backup discovery; stages the newest export onto `path`.
    #[serde(default)]
    pub backup: Option<BackupSource>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            view_script: default_view_script(),
            view_name: default_view_name(),
            busy_timeout_ms: default_busy_timeout_ms(),
            backup: None,
        }
    }
}

impl DatabaseConfig {
    /// Validates database configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("database.path", &self.path.to_string_lossy())?;
        validate_path_string("database.view_script", &self.view_script.to_string_lossy())?;
        if !is_view_identifier(&self.view_name) {
            return Err(ConfigError::Invalid(
                "database.view_name must be a non-empty identifier ([A-Za-z0-9_])".to_string(),
            ));
        }
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "database.busy_timeout_ms exceeds limit ({MAX_BUSY_TIMEOUT_MS})"
            )));
        }
        if let Some(backup) = &self.backup {
            validate_path_string("database.backup.dir", &backup.dir.to_string_lossy())?;
            let extension = backup.extension.trim().trim_start_matches('.');
            if extension.is_empty() || extension.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(
                    "database.backup.extension must be a plain file extension".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading the config file.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolved config path and whether it must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedPath {
    /// Config file path.
    path: PathBuf,
    /// True when the path was named explicitly (CLI or environment).
    required: bool,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>, env_path: Option<String>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            required: true,
        });
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            required: true,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        required: false,
    })
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Default maximum request body size.
pub(crate) const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Audit logging is on unless disabled.
const fn default_audit_enabled() -> bool {
    true
}

/// Default database path.
fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

/// Default bootstrap script path.
fn default_view_script() -> PathBuf {
    PathBuf::from(DEFAULT_VIEW_SCRIPT_PATH)
}

/// Default bootstrap view name.
fn default_view_name() -> String {
    DEFAULT_VIEW_NAME.to_string()
}

/// Default busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Tests
// ============================================================================
