//! Recomputation pipelines for the two derived artifacts.
//!
//! Both pipelines are plain functions from read-only inputs to a freshly
//! built artifact. Every failure of the external transforms, returned or
//! panicked, is converted to [`Diagnostic`](fwb_model::Diagnostic) data here
//! and never escapes.

mod compose;
mod plan;

pub use compose::recompose;
pub use plan::replan;

use std::any::Any;

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "transform panicked".to_string()
    }
}
