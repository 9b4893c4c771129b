//! Root snapshot type.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::CURRENT_FORMAT_VERSION;

/// Root snapshot structure, serialized as one JSON object.
///
/// Every field is optional on read and falls back to its default, so older
/// snapshots that lack newer fields still load. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Format version (for future migrations).
    pub version: u32,

    /// When the snapshot was last written (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,

    /// Service name -> document text, in display order.
    pub services: IndexMap<String, String>,

    /// Selected service name or the composed-view sentinel.
    pub selected_service: Option<String>,

    /// Last printed composition.
    pub composition: CompositionSnapshot,

    /// Last query text.
    pub query: String,

    /// Last serialized query plan.
    pub query_plan: String,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            version: CURRENT_FORMAT_VERSION,
            saved_at: None,
            services: IndexMap::new(),
            selected_service: None,
            composition: CompositionSnapshot::default(),
            query: String::new(),
            query_plan: String::new(),
        }
    }
}

impl SessionSnapshot {
    /// Create an empty snapshot at the current format version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the snapshot with the current time and return that time.
    pub fn touch(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        self.saved_at = Some(now.to_rfc3339());
        now
    }

    /// Parse the saved_at timestamp.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// The composition part of a snapshot.
///
/// Only the printed text is kept; the schema handle is rebuilt by
/// recomposing after load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionSnapshot {
    pub printed: String,
}
