//! Intents accepted by the session.
//!
//! The wire form is `{ "type": "...", "payload": ... }` so that a recorded
//! action log replays unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A discrete user intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Intent {
    /// Add an empty document; selects it when nothing is selected.
    AddService { name: String },

    /// Point the selection at a service name or `"composed"`.
    SelectService(String),

    /// Replace a document's text. Does not recompose.
    UpdateService { name: String, value: String },

    /// Recompose from the current document set.
    RefreshComposition,

    /// Replace the query text and replan.
    UpdateQuery(String),

    /// Replace the session with a decoded snapshot blob.
    LoadWorkbench(String),

    /// Encode the session; the payload is the user-supplied file name.
    SaveWorkbench(String),

    /// Replace the document set with services fetched elsewhere.
    #[serde(alias = "loadFromAGM")]
    LoadFromRemote { services: IndexMap<String, String> },
}

impl Intent {
    /// Wire name of the intent.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddService { .. } => "addService",
            Self::SelectService(_) => "selectService",
            Self::UpdateService { .. } => "updateService",
            Self::RefreshComposition => "refreshComposition",
            Self::UpdateQuery(_) => "updateQuery",
            Self::LoadWorkbench(_) => "loadWorkbench",
            Self::SaveWorkbench(_) => "saveWorkbench",
            Self::LoadFromRemote { .. } => "loadFromRemote",
        }
    }
}

/// An encoded snapshot ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedWorkbench {
    pub file_name: String,
    pub blob: String,
}

/// What a dispatched intent produced besides the state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Saved(SavedWorkbench),
}
