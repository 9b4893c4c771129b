//! Session data model for Federation Workbench.
//!
//! This crate holds the plain data that a workbench session is made of,
//! plus the interfaces of the two external transforms the engine drives:
//!
//! - [`DocumentSet`] - named service documents, insertion ordered
//! - [`Selection`] - display cursor over the document set
//! - [`CompositionArtifact`] / [`PlanArtifact`] - derived artifacts
//! - [`SessionState`] - the full session tuple
//! - [`Composer`] / [`Planner`] - the black-box compose and plan transforms
//!
//! Nothing here performs recomputation; see `fwb-core` for the pipelines
//! and the session state machine.

mod artifact;
mod diagnostic;
mod document;
mod selection;
mod state;
mod transform;

pub use artifact::{CompositionArtifact, PlanArtifact};
pub use diagnostic::{Diagnostic, Location};
pub use document::DocumentSet;
pub use selection::{COMPOSED_SENTINEL, Selection};
pub use state::{QueryState, SessionState};
pub use transform::{Composed, Composer, Planner, ServiceDefinition, TransformFault};
