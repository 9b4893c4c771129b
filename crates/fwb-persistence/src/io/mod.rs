//! File I/O operations for snapshot persistence.
//!
//! This module handles:
//! - Encoding and validating snapshot blobs
//! - Snapshot file naming and extension checks
//! - Saving snapshots with atomic writes
//! - Loading snapshots with format validation

mod codec;
mod load;
mod naming;
mod save;

pub use codec::{decode_snapshot, encode_snapshot};
pub use load::{load_snapshot, load_snapshot_async, read_snapshot_blob};
pub use naming::{has_session_extension, snapshot_file_name};
pub use save::{save_snapshot, save_snapshot_async, write_atomic};
