//! Display cursor over the document set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire name of the composed-schema view.
pub const COMPOSED_SENTINEL: &str = "composed";

/// What the user is looking at.
///
/// A selection is never validated against the document set; it may name a
/// service that has since been replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    /// A service document, by name.
    Service(String),
    /// The composed schema view.
    Composed,
}

impl Selection {
    pub fn service(name: impl Into<String>) -> Self {
        Self::Service(name.into())
    }

    /// The selected service name, if a service is selected.
    pub fn service_name(&self) -> Option<&str> {
        match self {
            Self::Service(name) => Some(name),
            Self::Composed => None,
        }
    }

    pub fn is_composed(&self) -> bool {
        matches!(self, Self::Composed)
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == COMPOSED_SENTINEL {
            Self::Composed
        } else {
            Self::Service(value)
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Selection> for String {
    fn from(value: Selection) -> Self {
        match value {
            Selection::Service(name) => name,
            Selection::Composed => COMPOSED_SENTINEL.to_string(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(name) => f.write_str(name),
            Self::Composed => f.write_str(COMPOSED_SENTINEL),
        }
    }
}
