//! Interactive driver: debounced, offloaded recomposition over a session.
//!
//! Document edits are recorded at once and feed a debounced composition
//! request; requests that fire go to the [`CompositionWorker`] (or run
//! inline when offload is off) and responses are applied when the owner
//! drains them. Query edits stay synchronous.

use std::sync::Arc;
use std::time::Duration;

use fwb_model::{Composer, Planner, SessionState};
use tokio::runtime::Handle;

use crate::debounce::{DEFAULT_WAIT, Debouncer};
use crate::error::WorkbenchError;
use crate::session::{Intent, Outcome, Session};
use crate::worker::{CompositionRequest, CompositionResponse, CompositionWorker};

/// Driver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkbenchConfig {
    /// Trailing delay for document-triggered recomposition.
    pub debounce: Duration,
    /// Run composition on the worker task instead of inline.
    pub offload: bool,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_WAIT,
            offload: true,
        }
    }
}

/// A session plus the machinery that keeps its composition current.
pub struct Workbench<C, P>
where
    C: Composer,
    P: Planner<C::Schema>,
{
    session: Session<C, P>,
    debouncer: Debouncer<CompositionRequest>,
    worker: Option<CompositionWorker<C>>,
    /// Sequence number of the newest request handed to the worker.
    in_flight: Option<u64>,
}

impl<C, P> Workbench<C, P>
where
    C: Composer,
    P: Planner<C::Schema>,
{
    /// Create a workbench.
    ///
    /// With offload enabled the worker is spawned on the current tokio
    /// runtime; outside a runtime composition falls back to running inline.
    pub fn new(composer: Arc<C>, planner: Arc<P>, config: WorkbenchConfig) -> Self {
        let worker = if config.offload {
            match Handle::try_current() {
                Ok(handle) => Some(CompositionWorker::spawn_on(&handle, Arc::clone(&composer))),
                Err(_) => {
                    tracing::warn!("No async runtime available; composing inline");
                    None
                }
            }
        } else {
            None
        };

        Self {
            session: Session::new(composer, planner),
            debouncer: Debouncer::new(config.debounce),
            worker,
            in_flight: None,
        }
    }

    pub fn session(&self) -> &Session<C, P> {
        &self.session
    }

    pub fn state(&self) -> &SessionState<C::Schema> {
        self.session.state()
    }

    pub fn is_offloaded(&self) -> bool {
        self.worker.is_some()
    }

    /// Whether a composition is scheduled or running.
    pub fn is_busy(&self) -> bool {
        self.debouncer.is_pending() || self.in_flight.is_some()
    }

    /// Apply one intent, routing recomposition through debounce and offload.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome, WorkbenchError> {
        match intent {
            Intent::UpdateService { name, value } => {
                self.edit_document(&name, value)?;
                Ok(Outcome::Applied)
            }
            Intent::RefreshComposition => {
                self.refresh()?;
                Ok(Outcome::Applied)
            }
            intent @ (Intent::LoadWorkbench(_) | Intent::LoadFromRemote { .. }) => {
                let outcome = self.session.dispatch(intent)?;
                // Whatever was scheduled describes documents that are gone.
                self.debouncer.cancel();
                Ok(outcome)
            }
            intent => Ok(self.session.dispatch(intent)?),
        }
    }

    /// Record a document edit and schedule recomposition.
    ///
    /// An edit under a blank name stores nothing and schedules nothing.
    pub fn edit_document(
        &mut self,
        name: &str,
        text: impl Into<String>,
    ) -> Result<(), WorkbenchError> {
        if !self.session.update_service(name, text) {
            return Ok(());
        }
        let request = self.session.begin_recomposition();
        match self.debouncer.call(request) {
            Some(request) => self.submit(request),
            None => Ok(()),
        }
    }

    /// Recompose now, skipping the debounce window.
    pub fn refresh(&mut self) -> Result<(), WorkbenchError> {
        self.debouncer.cancel();
        let request = self.session.begin_recomposition();
        self.submit(request)
    }

    pub fn update_query(&mut self, text: impl Into<String>) {
        self.session.update_query(text);
    }

    /// Submit the trailing request if its delay has passed.
    pub fn tick(&mut self) -> Result<bool, WorkbenchError> {
        match self.debouncer.poll() {
            Some(request) => self.submit(request).map(|()| true),
            None => Ok(false),
        }
    }

    /// Apply finished worker responses without waiting. Returns how many
    /// were current.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(response) = self.worker.as_mut().and_then(CompositionWorker::try_recv) {
            if self.receive(response) {
                applied += 1;
            }
        }
        applied
    }

    /// Flush the debounce window and wait until the newest request has been
    /// answered.
    pub async fn settle(&mut self) -> Result<(), WorkbenchError> {
        if let Some(request) = self.debouncer.flush() {
            self.submit(request)?;
        }

        while self.in_flight.is_some() {
            let Some(worker) = self.worker.as_mut() else {
                break;
            };
            let response = worker.recv().await.ok_or(WorkbenchError::WorkerStopped)?;
            self.receive(response);
        }
        Ok(())
    }

    fn submit(&mut self, request: CompositionRequest) -> Result<(), WorkbenchError> {
        match &self.worker {
            Some(worker) => {
                self.in_flight = Some(request.seq);
                worker.submit(request)
            }
            None => {
                let response =
                    CompositionResponse::compute(self.session.composer().as_ref(), &request);
                self.session.apply_composition(response);
                Ok(())
            }
        }
    }

    fn receive(&mut self, response: CompositionResponse<C::Schema>) -> bool {
        if self.in_flight.is_some_and(|seq| response.seq >= seq) {
            self.in_flight = None;
        }
        self.session.apply_composition(response)
    }
}
