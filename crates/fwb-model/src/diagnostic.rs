//! Error entries surfaced to the user.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position inside a document, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One entry in the session's error list.
///
/// Parse errors, composition structural errors, and transform faults all
/// normalize to this shape so that display code never has to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a diagnostic without a location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Create a diagnostic pointing at a line and column.
    pub fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            location: Some(Location::new(line, column)),
        }
    }

    /// Attach a location, replacing any existing one.
    #[must_use]
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{} ({})", self.message, location),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_location() {
        let diagnostic = Diagnostic::at("Unknown type \"Foo\"", 3, 7);
        assert_eq!(diagnostic.to_string(), "Unknown type \"Foo\" (3:7)");
    }

    #[test]
    fn test_display_without_location() {
        let diagnostic = Diagnostic::new("composition failed");
        assert_eq!(diagnostic.to_string(), "composition failed");
    }

    #[test]
    fn test_location_omitted_when_serialized() {
        let json = serde_json::to_string(&Diagnostic::new("boom")).unwrap();
        assert_eq!(json, r#"{"message":"boom"}"#);
    }
}
