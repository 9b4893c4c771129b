//! Snapshot file naming and extension checks.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{PersistenceError, Result};
use crate::types::{DEFAULT_SNAPSHOT_NAME, SESSION_EXTENSION};

/// File name for a snapshot saved at `at`: `{name}-{unix_millis}.federationworkbench`.
///
/// A missing or blank name falls back to `Workbench`.
pub fn snapshot_file_name(name: Option<&str>, at: DateTime<Utc>) -> String {
    let stem = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_SNAPSHOT_NAME);
    format!("{stem}-{}.{SESSION_EXTENSION}", at.timestamp_millis())
}

/// Whether `path` carries the session extension (case-insensitive).
pub fn has_session_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SESSION_EXTENSION))
}

pub(crate) fn ensure_session_extension(path: &Path) -> Result<()> {
    if has_session_extension(path) {
        Ok(())
    } else {
        Err(PersistenceError::UnsupportedExtension {
            path: path.to_path_buf(),
        })
    }
}
