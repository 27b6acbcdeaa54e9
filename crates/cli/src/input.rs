//! Reading documents from disk into core types.
//!
//! Errors are returned as display-ready strings naming the file.

use std::path::Path;

use pricesync_core::{replay, Action, WorkingState};
use pricesync_interchange::{parse_action_log, parse_edits, parse_snapshot, read_json};

fn read_document(path: &Path, what: &str) -> Result<serde_json::Value, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("error: could not read {} '{}': {}", what, path.display(), e))?;
    read_json(&text).map_err(|e| format!("error: {} '{}': {}", what, path.display(), e))
}

/// Load the snapshot and, if given, apply an edit set on top of it.
pub(crate) fn load_state(snapshot: &Path, edits: Option<&Path>) -> Result<WorkingState, String> {
    let doc = read_document(snapshot, "snapshot")?;
    let parsed = parse_snapshot(&doc)
        .map_err(|e| format!("error: snapshot '{}': {}", snapshot.display(), e))?;
    tracing::debug!(
        records = parsed.records.len(),
        fetched_at = parsed.fetched_at.as_deref().unwrap_or("unknown"),
        "snapshot loaded"
    );

    let mut actions = vec![Action::LoadSnapshot(parsed.records)];
    if let Some(path) = edits {
        actions.extend(load_edits(path)?);
    }
    apply(actions)
}

/// Load the snapshot, then apply an action log to it.
pub(crate) fn load_replay(snapshot: &Path, actions: &Path) -> Result<WorkingState, String> {
    let base = load_state(snapshot, None)?;
    let doc = read_document(actions, "action log")?;
    let log = parse_action_log(&doc)
        .map_err(|e| format!("error: action log '{}': {}", actions.display(), e))?;
    tracing::debug!(actions = log.len(), "replaying action log");
    replay(&base, log).map_err(|e| format!("error: {}", e))
}

fn load_edits(path: &Path) -> Result<Vec<Action>, String> {
    let doc = read_document(path, "edits")?;
    parse_edits(&doc).map_err(|e| format!("error: edits '{}': {}", path.display(), e))
}

fn apply(actions: Vec<Action>) -> Result<WorkingState, String> {
    replay(&WorkingState::default(), actions).map_err(|e| format!("error: {}", e))
}
