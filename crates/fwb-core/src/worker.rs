//! Composition offload.
//!
//! Composition runs on a tokio task so a slow merge never blocks editing.
//! Requests carry the document set by value and responses carry the whole
//! artifact by value; the two sides share nothing else. Each request is
//! tagged with a sequence number that the response echoes, and the session
//! ignores any response that is not for the latest issued request.

use std::fmt;
use std::sync::Arc;

use fwb_model::{Composer, CompositionArtifact, Diagnostic, DocumentSet};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::WorkbenchError;
use crate::pipeline::recompose;

/// Request to recompose a document set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRequest {
    pub seq: u64,
    pub documents: DocumentSet,
}

/// Result of a [`CompositionRequest`], tagged with the request's `seq`.
pub struct CompositionResponse<S> {
    pub seq: u64,
    pub artifact: CompositionArtifact<S>,
}

impl<S> CompositionResponse<S> {
    /// Run the composition pipeline for `request` on the current thread.
    pub fn compute<C>(composer: &C, request: &CompositionRequest) -> Self
    where
        C: Composer<Schema = S>,
    {
        Self {
            seq: request.seq,
            artifact: recompose(composer, &request.documents),
        }
    }
}

impl<S> fmt::Debug for CompositionResponse<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositionResponse")
            .field("seq", &self.seq)
            .field("artifact", &self.artifact)
            .finish()
    }
}

/// Handle to a background composition task.
///
/// Dropping the handle closes the request channel and the task exits after
/// finishing any composition in progress.
pub struct CompositionWorker<C: Composer> {
    requests: mpsc::UnboundedSender<CompositionRequest>,
    responses: mpsc::UnboundedReceiver<CompositionResponse<C::Schema>>,
}

impl<C: Composer> CompositionWorker<C> {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(composer: Arc<C>) -> Self {
        Self::spawn_on(&Handle::current(), composer)
    }

    /// Spawn the worker on the given runtime.
    pub fn spawn_on(handle: &Handle, composer: Arc<C>) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        handle.spawn(run(composer, request_rx, response_tx));

        Self {
            requests: request_tx,
            responses: response_rx,
        }
    }

    /// Queue a request. Fails only if the worker task has stopped.
    pub fn submit(&self, request: CompositionRequest) -> Result<(), WorkbenchError> {
        self.requests
            .send(request)
            .map_err(|_| WorkbenchError::WorkerStopped)
    }

    /// Take a finished response without waiting.
    pub fn try_recv(&mut self) -> Option<CompositionResponse<C::Schema>> {
        self.responses.try_recv().ok()
    }

    /// Wait for the next response. `None` once the worker has stopped.
    pub async fn recv(&mut self) -> Option<CompositionResponse<C::Schema>> {
        self.responses.recv().await
    }
}

async fn run<C: Composer>(
    composer: Arc<C>,
    mut requests: mpsc::UnboundedReceiver<CompositionRequest>,
    responses: mpsc::UnboundedSender<CompositionResponse<C::Schema>>,
) {
    while let Some(mut request) = requests.recv().await {
        // Only the newest queued request can still be current.
        while let Ok(newer) = requests.try_recv() {
            tracing::debug!(
                skipped = request.seq,
                seq = newer.seq,
                "Coalescing composition requests"
            );
            request = newer;
        }

        let seq = request.seq;
        let composer = Arc::clone(&composer);
        let artifact = tokio::task::spawn_blocking(move || {
            recompose(composer.as_ref(), &request.documents)
        })
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(seq, error = %e, "Composition task failed");
            CompositionArtifact::failed(vec![Diagnostic::new(format!(
                "Composition task failed: {e}"
            ))])
        });

        if responses.send(CompositionResponse { seq, artifact }).is_err() {
            break;
        }
    }

    tracing::debug!("Composition worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use fwb_model::{Composed, ServiceDefinition, TransformFault};

    struct Names;

    impl Composer for Names {
        type Document = String;
        type Schema = Vec<String>;

        fn parse_document(&self, name: &str, _text: &str) -> Result<String, Diagnostic> {
            Ok(name.to_string())
        }

        fn compose(
            &self,
            definitions: Vec<ServiceDefinition<String>>,
        ) -> Result<Composed<Vec<String>>, TransformFault> {
            Ok(Composed::ok(
                definitions.into_iter().map(|d| d.document).collect(),
            ))
        }

        fn print_schema(&self, schema: &Vec<String>) -> String {
            schema.join(",")
        }
    }

    fn request(seq: u64, names: &[&str]) -> CompositionRequest {
        CompositionRequest {
            seq,
            documents: names.iter().map(|n| (*n, "")).collect(),
        }
    }

    #[tokio::test]
    async fn test_worker_answers_with_seq() {
        let mut worker = CompositionWorker::spawn(Arc::new(Names));
        worker.submit(request(7, &["a", "b"])).unwrap();

        let response = worker.recv().await.unwrap();
        assert_eq!(response.seq, 7);
        assert_eq!(response.artifact.printed(), "a,b");
    }

    #[tokio::test]
    async fn test_every_response_echoes_a_submitted_seq() {
        let mut worker = CompositionWorker::spawn(Arc::new(Names));
        for seq in 1..=5 {
            worker.submit(request(seq, &["a"])).unwrap();
        }

        // Bursts may be coalesced, but the newest request is always answered last.
        let mut seen = Vec::new();
        while seen.last() != Some(&5) {
            seen.push(worker.recv().await.unwrap().seq);
        }
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_compute_runs_inline() {
        let response = CompositionResponse::compute(&Names, &request(3, &["x"]));
        assert_eq!(response.seq, 3);
        assert_eq!(response.artifact.printed(), "x");
    }
}
