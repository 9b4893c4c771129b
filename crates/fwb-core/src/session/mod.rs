//! The session state machine.
//!
//! [`Session`] owns the whole [`SessionState`] and is its only writer.
//! Intents are applied one at a time; each one computes any replacement
//! artifacts first and then installs them, so no reader ever sees a state
//! where the composition and the plan disagree.

mod intent;

pub use intent::{Intent, Outcome, SavedWorkbench};

use std::sync::Arc;

use fwb_model::{
    Composer, CompositionArtifact, DocumentSet, PlanArtifact, Planner, QueryState, Selection,
    SessionState,
};
use fwb_persistence::{
    FromSnapshot, ToSnapshot, decode_snapshot, encode_snapshot, snapshot_file_name,
};
use indexmap::IndexMap;

use crate::error::SessionError;
use crate::pipeline::{recompose, replan};
use crate::worker::{CompositionRequest, CompositionResponse};

/// A workbench session over a compose transform `C` and plan transform `P`.
pub struct Session<C, P>
where
    C: Composer,
    P: Planner<C::Schema>,
{
    composer: Arc<C>,
    planner: Arc<P>,
    state: SessionState<C::Schema>,
    /// Latest issued composition sequence number.
    seq: u64,
}

impl<C, P> Session<C, P>
where
    C: Composer,
    P: Planner<C::Schema>,
{
    /// Start in the initial state: nothing authored, nothing derived.
    pub fn new(composer: Arc<C>, planner: Arc<P>) -> Self {
        Self {
            composer,
            planner,
            state: SessionState::new(),
            seq: 0,
        }
    }

    pub fn state(&self) -> &SessionState<C::Schema> {
        &self.state
    }

    pub fn composer(&self) -> &Arc<C> {
        &self.composer
    }

    /// Latest issued composition sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Apply one intent.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome, SessionError> {
        tracing::trace!(intent = intent.kind(), "Dispatching");
        match intent {
            Intent::AddService { name } => {
                self.add_service(&name);
            }
            Intent::SelectService(key) => self.select(Selection::from(key)),
            Intent::UpdateService { name, value } => {
                self.update_service(&name, value);
            }
            Intent::RefreshComposition => self.refresh_composition(),
            Intent::UpdateQuery(text) => self.update_query(text),
            Intent::LoadWorkbench(blob) => self.load_workbench(&blob)?,
            Intent::SaveWorkbench(name) => {
                return self.save_workbench(Some(&name)).map(Outcome::Saved);
            }
            Intent::LoadFromRemote { services } => self.load_from_remote(services),
        }
        Ok(Outcome::Applied)
    }

    // ===== DOCUMENTS =====

    /// Add an empty document under the trimmed name.
    ///
    /// Blank names are ignored. The first document added to a session with
    /// no selection becomes selected. Returns the stored key.
    pub fn add_service(&mut self, name: &str) -> Option<String> {
        let key = self.state.documents.add(name)?;
        if self.state.selection.is_none() {
            self.state.selection = Some(Selection::service(key.clone()));
        }
        Some(key)
    }

    /// Move the display cursor. The key is not checked against the documents.
    pub fn select(&mut self, selection: Selection) {
        self.state.selection = Some(selection);
    }

    /// Replace a document's text. Recomposition is the caller's call.
    ///
    /// Returns `false` when the name is blank and nothing was stored.
    pub fn update_service(&mut self, name: &str, text: impl Into<String>) -> bool {
        let stored = self.state.documents.update(name, text);
        if !stored {
            tracing::debug!("Ignoring update for blank service name");
        }
        stored
    }

    // ===== COMPOSITION =====

    /// Recompose synchronously from the current documents.
    ///
    /// Any response to an earlier offloaded request becomes stale.
    pub fn refresh_composition(&mut self) {
        self.seq += 1;
        let artifact = recompose(self.composer.as_ref(), &self.state.documents);
        self.install_composition(artifact);
    }

    /// Issue a request for offloaded recomposition of the current documents.
    pub fn begin_recomposition(&mut self) -> CompositionRequest {
        self.seq += 1;
        tracing::debug!(
            seq = self.seq,
            documents = self.state.documents.len(),
            "Issuing composition request"
        );
        CompositionRequest {
            seq: self.seq,
            documents: self.state.documents.clone(),
        }
    }

    /// Install an offloaded result if it answers the latest request.
    ///
    /// Returns `false` and leaves the state untouched for stale responses.
    pub fn apply_composition(&mut self, response: CompositionResponse<C::Schema>) -> bool {
        if response.seq != self.seq {
            tracing::debug!(
                seq = response.seq,
                latest = self.seq,
                "Ignoring stale composition response"
            );
            return false;
        }
        self.install_composition(response.artifact);
        true
    }

    fn install_composition(&mut self, artifact: CompositionArtifact<C::Schema>) {
        // The plan must never describe a schema that is no longer shown.
        let plan = match artifact.schema() {
            Some(schema) => replan(
                self.planner.as_ref(),
                Some(schema.as_ref()),
                &self.state.query.text,
            ),
            None => PlanArtifact::none(),
        };
        self.state.composition = artifact;
        self.state.query.plan = plan;
    }

    // ===== QUERY =====

    /// Replace the query text and replan against the current schema.
    pub fn update_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        let plan = replan(
            self.planner.as_ref(),
            self.state.composition.schema().map(Arc::as_ref),
            &text,
        );
        self.state.query = QueryState { text, plan };
    }

    // ===== SNAPSHOTS =====

    /// Replace the session with a decoded snapshot.
    ///
    /// Documents, selection and query text are restored; the derived
    /// artifacts start empty until the next recomposition. On error the
    /// state is untouched.
    pub fn load_workbench(&mut self, blob: &str) -> Result<(), SessionError> {
        let snapshot = decode_snapshot(blob)?;
        self.state = SessionState::from_snapshot(snapshot);
        self.seq += 1;
        tracing::info!(
            services = self.state.documents.len(),
            "Loaded workbench snapshot"
        );
        Ok(())
    }

    /// Encode the current state. Pure read.
    pub fn save_workbench(&self, name: Option<&str>) -> Result<SavedWorkbench, SessionError> {
        let mut snapshot = self.state.to_snapshot();
        let now = snapshot.touch();

        let blob = encode_snapshot(&snapshot)?;
        let file_name = snapshot_file_name(name, now);
        tracing::info!(%file_name, "Encoded workbench snapshot");
        Ok(SavedWorkbench { file_name, blob })
    }

    /// Replace the documents wholesale with services fetched elsewhere.
    ///
    /// Clears the selection and the query. The caller follows up with a
    /// recomposition.
    pub fn load_from_remote(&mut self, services: IndexMap<String, String>) {
        let documents: DocumentSet = services.into_iter().collect();
        tracing::info!(services = documents.len(), "Loaded services from remote");
        self.state.documents = documents;
        self.state.selection = None;
        self.state.query = QueryState::default();
        self.seq += 1;
    }
}
