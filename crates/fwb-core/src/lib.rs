//! Orchestration engine for Federation Workbench.
//!
//! - [`debounce`] - coalescing bursts of triggers into throttled calls
//! - [`pipeline`] - composition and query-plan recomputation, fault-tolerant
//! - [`worker`] - composition offload with sequence-tagged messages
//! - [`session`] - the state machine that owns all session state
//! - [`workbench`] - driver wiring debounce and offload to a session
//!
//! The compose and plan algorithms themselves are supplied through the
//! [`Composer`](fwb_model::Composer) and [`Planner`](fwb_model::Planner)
//! traits.

pub mod debounce;
mod error;
pub mod pipeline;
pub mod session;
pub mod worker;
pub mod workbench;

pub use debounce::{Debounced, Debouncer};
pub use error::{SessionError, WorkbenchError};
pub use session::{Intent, Outcome, SavedWorkbench, Session};
pub use worker::{CompositionRequest, CompositionResponse, CompositionWorker};
pub use workbench::{Workbench, WorkbenchConfig};
