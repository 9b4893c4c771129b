//! Persistence types for session snapshots.
//!
//! These mirror the session state but keep only what a user authored plus
//! the last rendered text of the derived artifacts.

mod snapshot;

pub use snapshot::{CompositionSnapshot, SessionSnapshot};

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
/// The loader will reject files with version > CURRENT_FORMAT_VERSION.
/// Files without a `version` field are read as the current version.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// File extension of session snapshots, without the leading dot.
pub const SESSION_EXTENSION: &str = "federationworkbench";

/// File name stem used when the user supplies no name.
pub const DEFAULT_SNAPSHOT_NAME: &str = "Workbench";
