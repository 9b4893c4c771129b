//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::SESSION_EXTENSION;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path does not carry the session file extension.
    #[error("Unsupported file extension: {path}")]
    UnsupportedExtension { path: PathBuf },

    /// Blob is not a structured snapshot record.
    #[error("Invalid workbench snapshot: {reason}")]
    InvalidFormat { reason: String },

    /// Snapshot format version newer than this build understands.
    #[error("Workbench snapshot version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion { found: u32, max_supported: u32 },

    /// Serialization error.
    #[error("Failed to serialize workbench snapshot")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A known field holds a value of the wrong shape.
    #[error("Failed to deserialize workbench snapshot")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::UnsupportedExtension { path } => {
                format!(
                    "The file at {} is not a workbench file (expected a .{} extension).",
                    path.display(),
                    SESSION_EXTENSION
                )
            }
            Self::InvalidFormat { reason } => {
                format!("The file is not a valid workbench snapshot: {reason}")
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
            } => {
                format!(
                    "This workbench was saved by a newer version of Federation Workbench \
                    (file version {found}, your version supports up to {max_supported}). \
                    Please update the application."
                )
            }
            Self::Serialization { .. } => {
                "An error occurred while saving the workbench.".to_string()
            }
            Self::Deserialization { source } => {
                format!("The workbench file contains an unexpected value: {source}")
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::UnsupportedExtension { .. } | Self::InvalidFormat { .. } => Some(format!(
                "Make sure you selected a .{SESSION_EXTENSION} file."
            )),
            Self::UnsupportedVersion { .. } => {
                Some("Install the latest Federation Workbench release.".into())
            }
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } => Some("Try opening a backup if you have one.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_message() {
        let err = PersistenceError::UnsupportedVersion {
            found: 7,
            max_supported: 1,
        };
        assert!(err.user_message().contains("file version 7"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_extension_hint_names_extension() {
        let err = PersistenceError::UnsupportedExtension {
            path: PathBuf::from("notes.txt"),
        };
        assert_eq!(
            err.suggestion().as_deref(),
            Some("Make sure you selected a .federationworkbench file.")
        );
    }
}
