//! Snapshot loading operations.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, Result};
use crate::io::codec::decode_snapshot;
use crate::io::naming::ensure_session_extension;
use crate::types::SessionSnapshot;

/// Read the raw blob of a .federationworkbench file.
///
/// Paths with any other extension are rejected before touching the disk.
pub fn read_snapshot_blob(path: &Path) -> Result<String> {
    ensure_session_extension(path)?;

    fs::read_to_string(path).map_err(|e| PersistenceError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate a snapshot from a .federationworkbench file.
pub fn load_snapshot(path: &Path) -> Result<SessionSnapshot> {
    let blob = read_snapshot_blob(path)?;
    let snapshot = decode_snapshot(&blob)?;

    tracing::info!(
        services = snapshot.services.len(),
        "Loaded workbench from {}",
        path.display()
    );
    Ok(snapshot)
}

/// Load a snapshot asynchronously.
///
/// Spawns the load operation on a blocking thread pool to avoid
/// blocking the async runtime.
pub async fn load_snapshot_async(path: PathBuf) -> Result<SessionSnapshot> {
    tokio::task::spawn_blocking(move || load_snapshot(&path))
        .await
        .map_err(|e| PersistenceError::Deserialization {
            source: Box::new(e),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save::save_snapshot;
    use tempfile::tempdir;

    #[test]
    fn test_load_snapshot_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.federationworkbench");

        let mut snapshot = SessionSnapshot::new();
        snapshot
            .services
            .insert("reviews".to_string(), "type Review { body: String }".to_string());
        snapshot.selected_service = Some("reviews".to_string());
        snapshot.query = "{ me }".to_string();

        save_snapshot(&mut snapshot, &path).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_rejects_other_extensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();

        assert!(matches!(
            load_snapshot(&path),
            Err(PersistenceError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.federationworkbench");

        assert!(matches!(
            load_snapshot(&path),
            Err(PersistenceError::Io {
                operation: "read",
                ..
            })
        ));
    }

    #[test]
    fn test_load_invalid_blob() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.federationworkbench");
        fs::write(&path, "NOT A SNAPSHOT").unwrap();

        assert!(matches!(
            load_snapshot(&path),
            Err(PersistenceError::InvalidFormat { .. })
        ));
    }
}
