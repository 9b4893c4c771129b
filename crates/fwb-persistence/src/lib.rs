//! Snapshot files for Federation Workbench sessions.
//!
//! This crate saves and loads `.federationworkbench` files: one portable
//! snapshot of the whole session.
//!
//! # Features
//!
//! - **Forward-compatible decoding**: missing fields default, unknown fields
//!   are ignored
//! - **Atomic writes** to prevent data corruption
//! - **Async variants** that run on the blocking thread pool
//!
//! # File Format
//!
//! A UTF-8 JSON object:
//!
//! ```text
//! {
//!   "version": 1,
//!   "savedAt": "2024-05-01T12:00:00+00:00",
//!   "services": { "products": "type Query { ... }" },
//!   "selectedService": "products",
//!   "composition": { "printed": "type Query { ... }" },
//!   "query": "{ topProducts { name } }",
//!   "queryPlan": "QueryPlan { ... }"
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fwb_persistence::{SessionSnapshot, save_snapshot, load_snapshot};
//!
//! let mut snapshot = SessionSnapshot::new();
//! save_snapshot(&mut snapshot, Path::new("shop.federationworkbench"))?;
//!
//! let loaded = load_snapshot(Path::new("shop.federationworkbench"))?;
//! ```
//!
//! # Architecture
//!
//! - `types/` - Snapshot types and format constants
//! - `io/` - Codec, naming, save and load
//! - `convert.rs` - Conversion between session state and snapshots
//! - `error.rs` - Error types with user-friendly messages

mod convert;
mod error;
mod io;
mod types;

pub use convert::{FromSnapshot, ToSnapshot};
pub use error::{PersistenceError, Result};
pub use io::{
    decode_snapshot, encode_snapshot, has_session_extension, load_snapshot, load_snapshot_async,
    read_snapshot_blob, save_snapshot, save_snapshot_async, snapshot_file_name, write_atomic,
};
pub use types::{
    CURRENT_FORMAT_VERSION, CompositionSnapshot, DEFAULT_SNAPSHOT_NAME, SESSION_EXTENSION,
    SessionSnapshot,
};
