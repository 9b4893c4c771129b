//! The full session tuple.

use std::fmt;

use crate::{CompositionArtifact, Diagnostic, DocumentSet, PlanArtifact, Selection};

/// Query text and the plan derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub text: String,
    pub plan: PlanArtifact,
}

/// Everything a session holds at one instant; the unit of save and load.
///
/// The session state machine in `fwb-core` is the only writer.
pub struct SessionState<S> {
    pub documents: DocumentSet,
    pub selection: Option<Selection>,
    pub composition: CompositionArtifact<S>,
    pub query: QueryState,
}

impl<S> SessionState<S> {
    /// The initial state: no documents, no selection, nothing derived.
    pub fn new() -> Self {
        Self {
            documents: DocumentSet::new(),
            selection: None,
            composition: CompositionArtifact::empty(),
            query: QueryState::default(),
        }
    }

    /// Aggregated error list: composition errors, then plan errors.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.composition
            .errors()
            .iter()
            .chain(self.query.plan.errors.iter())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// The selected service name, if a service (not the composed view) is selected.
    pub fn selected_service(&self) -> Option<&str> {
        self.selection.as_ref().and_then(Selection::service_name)
    }
}

impl<S> Default for SessionState<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for SessionState<S> {
    fn clone(&self) -> Self {
        Self {
            documents: self.documents.clone(),
            selection: self.selection.clone(),
            composition: self.composition.clone(),
            query: self.query.clone(),
        }
    }
}

impl<S> PartialEq for SessionState<S> {
    fn eq(&self, other: &Self) -> bool {
        self.documents == other.documents
            && self.selection == other.selection
            && self.composition == other.composition
            && self.query == other.query
    }
}

impl<S> fmt::Debug for SessionState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("documents", &self.documents)
            .field("selection", &self.selection)
            .field("composition", &self.composition)
            .field("query", &self.query)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_empty() {
        let state: SessionState<()> = SessionState::new();
        assert!(state.documents.is_empty());
        assert!(state.selection.is_none());
        assert!(!state.composition.has_schema());
        assert!(state.query.text.is_empty());
        assert!(!state.has_errors());
    }

    #[test]
    fn test_errors_lists_composition_before_plan() {
        let mut state: SessionState<()> = SessionState::new();
        state.composition = CompositionArtifact::failed(vec![Diagnostic::new("compose")]);
        state.query.plan = PlanArtifact::failed(vec![Diagnostic::new("plan")]);

        let messages: Vec<_> = state.errors().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["compose", "plan"]);
    }
}
