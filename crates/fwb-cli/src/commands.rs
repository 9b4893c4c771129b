//! Subcommand implementations.
//!
//! Each command builds a session over the reference federation transforms,
//! drives it with intents, and returns a [`SessionReport`] for printing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use fwb_core::{
    Intent, Outcome, SavedWorkbench, Session, Workbench, WorkbenchConfig, WorkbenchError,
};
use fwb_federation::Federation;
use fwb_persistence::{read_snapshot_blob, write_atomic};
use tracing::{info, info_span, trace, warn};

use crate::inputs::{ServiceSource, read_query, read_remote_services, read_services};
use crate::report::SessionReport;

type FederationSession = Session<Federation, Federation>;

/// Where and under which name a snapshot is written.
#[derive(Debug, Clone)]
pub struct SaveTarget {
    pub name: String,
    pub out_dir: PathBuf,
}

pub fn run_compose(sources: &[ServiceSource]) -> Result<SessionReport> {
    let mut session = authored_session(sources)?;
    session.dispatch(Intent::RefreshComposition)?;
    Ok(SessionReport::from_state(session.state()))
}

pub fn run_plan(query: &Path, sources: &[ServiceSource]) -> Result<SessionReport> {
    let query = read_query(query)?;
    let mut session = authored_session(sources)?;
    session.dispatch(Intent::RefreshComposition)?;
    session.dispatch(Intent::UpdateQuery(query))?;
    Ok(SessionReport::from_state(session.state()))
}

pub fn run_save(
    sources: &[ServiceSource],
    query: Option<&Path>,
    target: &SaveTarget,
) -> Result<SessionReport> {
    let query = query.map(read_query).transpose()?;
    let mut session = authored_session(sources)?;
    session.dispatch(Intent::RefreshComposition)?;
    if let Some(query) = query {
        session.dispatch(Intent::UpdateQuery(query))?;
    }
    let path = save(&session, target)?;
    Ok(SessionReport::from_state(session.state()).with_saved_to(path))
}

pub fn run_load(path: &Path) -> Result<SessionReport> {
    let span = info_span!("load", path = %path.display());
    let _guard = span.enter();

    let blob = read_snapshot_blob(path)?;
    let mut session = new_session();
    session
        .dispatch(Intent::LoadWorkbench(blob))
        .with_context(|| format!("load {}", path.display()))?;
    session.dispatch(Intent::RefreshComposition)?;
    Ok(SessionReport::from_state(session.state()))
}

pub fn run_import(path: &Path, target: Option<&SaveTarget>) -> Result<SessionReport> {
    let services = read_remote_services(path)?;
    info!(services = services.len(), path = %path.display(), "Importing remote services");

    let mut session = new_session();
    session.dispatch(Intent::LoadFromRemote { services })?;
    session.dispatch(Intent::RefreshComposition)?;

    let report = SessionReport::from_state(session.state());
    match target {
        Some(target) => Ok(report.with_saved_to(save(&session, target)?)),
        None => Ok(report),
    }
}

/// Replay a recorded action log, one JSON intent per line.
///
/// Document edits go through the debouncer and the composition worker as
/// they would interactively. `saveWorkbench` intents wait for the pending
/// composition and write their snapshot into `out_dir`. A rejected load is
/// logged and skipped, as the interactive notice would be.
pub async fn run_replay(
    path: &Path,
    config: WorkbenchConfig,
    out_dir: &Path,
) -> Result<SessionReport> {
    let log = std::fs::read_to_string(path)
        .with_context(|| format!("read action log {}", path.display()))?;

    let federation = Arc::new(Federation::new());
    let mut bench = Workbench::new(Arc::clone(&federation), federation, config);
    let mut saved_to = None;

    for (index, line) in log.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let intent: Intent = serde_json::from_str(line)
            .with_context(|| format!("{}:{line_no}: invalid intent", path.display()))?;
        trace!(line = line_no, kind = intent.kind(), "Replaying intent");

        if matches!(intent, Intent::SaveWorkbench(_)) {
            bench.settle().await?;
        }
        match bench.dispatch(intent) {
            Ok(Outcome::Saved(saved)) => saved_to = Some(write_saved(&saved, out_dir)?),
            Ok(Outcome::Applied) => {}
            Err(WorkbenchError::Session(error)) => {
                warn!(line = line_no, error = %error.user_message(), "Intent rejected");
            }
            Err(error) => return Err(error.into()),
        }
        bench.apply_pending();
        bench.tick()?;
    }
    bench.settle().await?;

    let report = SessionReport::from_state(bench.state());
    Ok(match saved_to {
        Some(path) => report.with_saved_to(path),
        None => report,
    })
}

fn new_session() -> FederationSession {
    let federation = Arc::new(Federation::new());
    Session::new(Arc::clone(&federation), federation)
}

fn authored_session(sources: &[ServiceSource]) -> Result<FederationSession> {
    let mut session = new_session();
    for (name, text) in read_services(sources)? {
        session.dispatch(Intent::AddService { name: name.clone() })?;
        session.dispatch(Intent::UpdateService { name, value: text })?;
    }
    Ok(session)
}

fn save(session: &FederationSession, target: &SaveTarget) -> Result<PathBuf> {
    let saved = session
        .save_workbench(Some(&target.name))
        .context("encode workbench")?;
    write_saved(&saved, &target.out_dir)
}

fn write_saved(saved: &SavedWorkbench, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(&saved.file_name);
    write_atomic(&path, saved.blob.as_bytes())?;
    info!(path = %path.display(), "Wrote workbench snapshot");
    Ok(path)
}
