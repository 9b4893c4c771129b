//! Command-line front end for Federation Workbench.
//!
//! The binary lives in `main.rs`; the pieces below are shared with the
//! integration tests.

pub mod commands;
pub mod inputs;
pub mod logging;
pub mod report;
pub mod settings;
