//! Derived artifacts: the composed schema and the query plan.

use std::fmt;
use std::sync::Arc;

use crate::Diagnostic;

// =============================================================================
// COMPOSITION
// =============================================================================

/// Result of composing the document set.
///
/// Composition is all-or-nothing: when `errors` is non-empty the schema is
/// absent and `printed` is empty. The constructors are the only way to build
/// one, so the invariant holds for every value.
pub struct CompositionArtifact<S> {
    schema: Option<Arc<S>>,
    printed: String,
    errors: Vec<Diagnostic>,
}

impl<S> CompositionArtifact<S> {
    /// Nothing composed yet.
    pub fn empty() -> Self {
        Self {
            schema: None,
            printed: String::new(),
            errors: Vec::new(),
        }
    }

    /// A clean composition.
    pub fn composed(schema: Arc<S>, printed: impl Into<String>) -> Self {
        Self {
            schema: Some(schema),
            printed: printed.into(),
            errors: Vec::new(),
        }
    }

    /// A failed composition. An empty error list still yields no schema.
    pub fn failed(errors: Vec<Diagnostic>) -> Self {
        Self {
            schema: None,
            printed: String::new(),
            errors,
        }
    }

    pub fn schema(&self) -> Option<&Arc<S>> {
        self.schema.as_ref()
    }

    pub fn printed(&self) -> &str {
        &self.printed
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    pub fn is_failed(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl<S> Default for CompositionArtifact<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S> Clone for CompositionArtifact<S> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            printed: self.printed.clone(),
            errors: self.errors.clone(),
        }
    }
}

/// Two artifacts are equal when they show the same text and errors and
/// hold the very same schema handle.
impl<S> PartialEq for CompositionArtifact<S> {
    fn eq(&self, other: &Self) -> bool {
        let same_schema = match (&self.schema, &other.schema) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_schema && self.printed == other.printed && self.errors == other.errors
    }
}

impl<S> fmt::Debug for CompositionArtifact<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositionArtifact")
            .field("schema", &self.schema.as_ref().map(|_| "<schema>"))
            .field("printed_len", &self.printed.len())
            .field("errors", &self.errors)
            .finish()
    }
}

// =============================================================================
// QUERY PLAN
// =============================================================================

/// Result of planning the current query against the current schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanArtifact {
    pub text: String,
    pub errors: Vec<Diagnostic>,
}

impl PlanArtifact {
    pub fn planned(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            errors: Vec::new(),
        }
    }

    /// No plan and no fault, e.g. while the schema or the query is missing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn failed(errors: Vec<Diagnostic>) -> Self {
        Self {
            text: String::new(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_composition_has_no_schema_or_text() {
        let artifact: CompositionArtifact<()> =
            CompositionArtifact::failed(vec![Diagnostic::new("bad")]);
        assert!(artifact.schema().is_none());
        assert!(artifact.printed().is_empty());
        assert!(artifact.is_failed());
    }

    #[test]
    fn test_equality_tracks_schema_identity() {
        let schema = Arc::new(1u8);
        let a = CompositionArtifact::composed(Arc::clone(&schema), "type Query");
        let b = a.clone();
        let c = CompositionArtifact::composed(Arc::new(1u8), "type Query");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
