//! Composition pipeline: document set -> composition artifact.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use fwb_model::{Composer, CompositionArtifact, Diagnostic, DocumentSet, ServiceDefinition};

use super::panic_message;

/// Recompute the composition artifact from the full document set.
///
/// All-or-nothing: one unparsable document fails the whole batch, and a
/// structural error, returned fault, or panic in the transform yields an
/// artifact with errors, no schema, and empty printed text. An empty
/// document set yields the empty artifact without calling the transform.
pub fn recompose<C: Composer>(
    composer: &C,
    documents: &DocumentSet,
) -> CompositionArtifact<C::Schema> {
    if documents.is_empty() {
        return CompositionArtifact::empty();
    }

    tracing::debug!(documents = documents.len(), "Recomposing");

    match panic::catch_unwind(AssertUnwindSafe(|| compose_documents(composer, documents))) {
        Ok(artifact) => {
            if artifact.is_failed() {
                tracing::debug!(errors = artifact.errors().len(), "Composition failed");
            }
            artifact
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(%message, "Compose transform panicked");
            CompositionArtifact::failed(vec![Diagnostic::new(message)])
        }
    }
}

fn compose_documents<C: Composer>(
    composer: &C,
    documents: &DocumentSet,
) -> CompositionArtifact<C::Schema> {
    let mut definitions = Vec::with_capacity(documents.len());
    let mut parse_errors = Vec::new();

    for (name, text) in documents.iter() {
        match composer.parse_document(name, text) {
            Ok(document) => definitions.push(ServiceDefinition {
                name: name.to_string(),
                document,
            }),
            Err(diagnostic) => parse_errors.push(diagnostic),
        }
    }

    if !parse_errors.is_empty() {
        return CompositionArtifact::failed(parse_errors);
    }

    let composed = match composer.compose(definitions) {
        Ok(composed) => composed,
        Err(fault) => {
            tracing::warn!(fault = fault.message(), "Compose transform faulted");
            return CompositionArtifact::failed(vec![fault.into()]);
        }
    };

    if !composed.errors.is_empty() {
        return CompositionArtifact::failed(composed.errors);
    }

    match composed.schema {
        Some(schema) => {
            let printed = composer.print_schema(&schema);
            CompositionArtifact::composed(Arc::new(schema), printed)
        }
        None => CompositionArtifact::failed(vec![Diagnostic::new(
            "Composition produced no schema.",
        )]),
    }
}
