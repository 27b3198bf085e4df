// crates/piggy-store-sqlite/src/backup.rs
// ============================================================================
// Module: Backup Discovery
// Description: Locate and stage the newest finance export backup.
// Purpose: Alternate session acquisition from an export directory.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Money Manager writes periodic backup exports into a directory. Backup
//! discovery picks the most recently created file with the configured
//! extension and copies it onto the session's database path before the
//! session opens. Failing to find a backup is a fatal startup error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use serde::Deserialize;

use crate::session::SessionError;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Default backup export extension.
pub const DEFAULT_BACKUP_EXTENSION: &str = "mmbak";

/// Directory and extension to search for backup exports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackupSource {
    /// Directory containing backup exports.
    pub dir: PathBuf,
    /// File extension without the leading dot.
    #[serde(default = "default_backup_extension")]
    pub extension: String,
}

impl BackupSource {
    /// Creates a backup source using the default extension.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: default_backup_extension(),
        }
    }

    /// Returns the extension normalized for comparison.
    fn normalized_extension(&self) -> String {
        self.extension.trim().trim_start_matches('.').to_ascii_lowercase()
    }
}

/// Returns the default backup extension.
fn default_backup_extension() -> String {
    DEFAULT_BACKUP_EXTENSION.to_string()
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Returns the most recently created backup export in the source directory.
///
/// Creation time falls back to modification time on platforms that do not
/// record it. Equal timestamps are broken by file name.
///
/// # Errors
///
/// Returns [`SessionError::BackupNotFound`] when no matching file exists and
/// [`SessionError::Io`] when the directory cannot be read.
pub fn discover_latest_backup(source: &BackupSource) -> Result<PathBuf, SessionError> {
    let extension = source.normalized_extension();
    if extension.is_empty() {
        return Err(SessionError::Invalid("backup extension must be non-empty".to_string()));
    }
    let entries = fs::read_dir(&source.dir).map_err(|err| {
        SessionError::Io(format!("cannot read backup dir {}: {err}", source.dir.display()))
    })?;
    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|err| SessionError::Io(err.to_string()))?;
        let path = entry.path();
        if !has_extension(&path, &extension) {
            continue;
        }
        let metadata = entry.metadata().map_err(|err| SessionError::Io(err.to_string()))?;
        if !metadata.is_file() {
            continue;
        }
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map_err(|err| SessionError::Io(err.to_string()))?;
        let newer = latest.as_ref().is_none_or(|(best_time, best_path)| {
            (created, &path) > (*best_time, best_path)
        });
        if newer {
            latest = Some((created, path));
        }
    }
    latest.map(|(_, path)| path).ok_or_else(|| SessionError::BackupNotFound {
        dir: source.dir.clone(),
        extension,
    })
}

/// Copies the newest backup export onto `target`, replacing any prior copy.
///
/// Returns the backup path that was staged.
///
/// # Errors
///
/// Returns [`SessionError`] when discovery or the copy fails.
pub fn stage_latest_backup(source: &BackupSource, target: &Path) -> Result<PathBuf, SessionError> {
    let backup = discover_latest_backup(source)?;
    if let Some(parent) = target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| SessionError::Io(err.to_string()))?;
    }
    fs::copy(&backup, target).map_err(|err| {
        SessionError::Io(format!(
            "cannot copy {} to {}: {err}",
            backup.display(),
            target.display()
        ))
    })?;
    Ok(backup)
}

/// Returns true when the path has the (lowercase) extension.
fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .is_some_and(|value| value.eq_ignore_ascii_case(extension))
}
