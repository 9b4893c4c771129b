//! Snapshot saving operations.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, Result};
use crate::io::codec::encode_snapshot;
use crate::types::{CURRENT_FORMAT_VERSION, SESSION_EXTENSION, SessionSnapshot};

/// Save a snapshot to a .federationworkbench file.
///
/// Stamps the format version and save time, then writes atomically.
pub fn save_snapshot(snapshot: &mut SessionSnapshot, path: &Path) -> Result<()> {
    snapshot.version = CURRENT_FORMAT_VERSION;
    snapshot.touch();

    let blob = encode_snapshot(snapshot)?;
    write_atomic(path, blob.as_bytes())?;

    tracing::info!(
        services = snapshot.services.len(),
        "Saved workbench to {}",
        path.display()
    );
    Ok(())
}

/// Save a snapshot asynchronously.
///
/// Spawns the save operation on a blocking thread pool to avoid
/// blocking the async runtime.
pub async fn save_snapshot_async(snapshot: SessionSnapshot, path: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut snapshot = snapshot;
        save_snapshot(&mut snapshot, &path)
    })
    .await
    .map_err(|e| PersistenceError::Serialization {
        source: Box::new(e),
    })?
}

/// Write `bytes` to `path` via a temp file and rename, so readers never see
/// a half-written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension(format!("{SESSION_EXTENSION}.tmp"));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shop.federationworkbench");

        let mut snapshot = SessionSnapshot::new();
        snapshot
            .services
            .insert("products".to_string(), "type Query { a: Int }".to_string());

        save_snapshot(&mut snapshot, &path).unwrap();

        assert!(path.exists());
        assert!(snapshot.saved_at().is_some());
        assert!(!dir.path().join("shop.federationworkbench.tmp").exists());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with('{'));
        assert!(text.contains("\"products\""));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/w.federationworkbench");

        save_snapshot(&mut SessionSnapshot::new(), &path).unwrap();
        assert!(path.exists());
    }
}
