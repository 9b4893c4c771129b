//! Error types for the session and the workbench driver.
//!
//! Transform failures never show up here: the pipelines turn them into
//! diagnostics stored in the session. These errors cover the load and save
//! notices and the composition worker going away.

use fwb_persistence::PersistenceError;
use thiserror::Error;

/// Failure of a session intent. The session state is unchanged.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Snapshot could not be decoded or encoded.
    #[error(transparent)]
    Snapshot(#[from] PersistenceError),
}

impl SessionError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Snapshot(e) => e.user_message(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Snapshot(e) => e.suggestion(),
        }
    }
}

/// Failure while driving a workbench.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The composition worker task has stopped.
    #[error("Composition worker stopped")]
    WorkerStopped,
}
