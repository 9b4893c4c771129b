//! Conversion traits between session state and persistence types.
//!
//! The conversion is lossy in one direction on purpose: a snapshot keeps
//! the printed composition and plan text, but the schema handle cannot be
//! stored. Restoring a snapshot therefore yields the authored parts only
//! (documents, selection, query text) with empty derived artifacts, and
//! the caller recomposes.

use fwb_model::{DocumentSet, QueryState, Selection, SessionState};

use crate::types::{CURRENT_FORMAT_VERSION, CompositionSnapshot, SessionSnapshot};

/// Trait for types that can be converted to a persistence snapshot.
pub trait ToSnapshot {
    /// The snapshot type.
    type Snapshot;

    /// Convert to a snapshot for persistence.
    fn to_snapshot(&self) -> Self::Snapshot;
}

/// Trait for types that can be created from a persistence snapshot.
pub trait FromSnapshot: Sized {
    /// The snapshot type.
    type Snapshot;

    /// Create from a snapshot.
    fn from_snapshot(snapshot: Self::Snapshot) -> Self;
}

impl<S> ToSnapshot for SessionState<S> {
    type Snapshot = SessionSnapshot;

    fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: CURRENT_FORMAT_VERSION,
            saved_at: None,
            services: self
                .documents
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
            selected_service: self.selection.clone().map(String::from),
            composition: CompositionSnapshot {
                printed: self.composition.printed().to_string(),
            },
            query: self.query.text.clone(),
            query_plan: self.query.plan.text.clone(),
        }
    }
}

impl<S> FromSnapshot for SessionState<S> {
    type Snapshot = SessionSnapshot;

    fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let documents: DocumentSet = snapshot.services.into_iter().collect();
        let selection = snapshot
            .selected_service
            .filter(|s| !s.trim().is_empty())
            .map(Selection::from);

        Self {
            documents,
            selection,
            query: QueryState {
                text: snapshot.query,
                ..QueryState::default()
            },
            ..Self::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fwb_model::{CompositionArtifact, PlanArtifact};
    use std::sync::Arc;

    fn sample_state() -> SessionState<()> {
        let mut state = SessionState::new();
        state.documents.update("products", "type Query { a: Int }");
        state.documents.update("reviews", "type Review { b: Int }");
        state.selection = Some(Selection::Composed);
        state.composition = CompositionArtifact::composed(Arc::new(()), "type Query {\n  a: Int\n}\n");
        state.query.text = "{ a }".to_string();
        state.query.plan = PlanArtifact::planned("QueryPlan {}");
        state
    }

    #[test]
    fn test_to_snapshot_copies_text() {
        let snapshot = sample_state().to_snapshot();
        assert_eq!(
            snapshot.services.keys().collect::<Vec<_>>(),
            vec!["products", "reviews"]
        );
        assert_eq!(snapshot.selected_service.as_deref(), Some("composed"));
        assert_eq!(snapshot.composition.printed, "type Query {\n  a: Int\n}\n");
        assert_eq!(snapshot.query, "{ a }");
        assert_eq!(snapshot.query_plan, "QueryPlan {}");
    }

    #[test]
    fn test_from_snapshot_restores_authored_parts() {
        let original = sample_state();
        let restored: SessionState<()> = SessionState::from_snapshot(original.to_snapshot());

        assert_eq!(restored.documents, original.documents);
        assert_eq!(restored.selection, original.selection);
        assert_eq!(restored.query.text, original.query.text);
        assert!(!restored.composition.has_schema());
        assert!(restored.query.plan.text.is_empty());
    }

    #[test]
    fn test_blank_selection_reads_as_none() {
        let snapshot = SessionSnapshot {
            selected_service: Some(String::new()),
            ..SessionSnapshot::default()
        };
        let state: SessionState<()> = SessionState::from_snapshot(snapshot);
        assert!(state.selection.is_none());
    }
}
