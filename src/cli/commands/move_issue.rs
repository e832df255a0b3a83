//! Move command implementation.

use serde::Serialize;
use tracker_lib::{Result, TrackerError};

use super::{open_store, print_json, require_issue, require_project, resolve_status};
use crate::cli::MoveArgs;
use crate::config::Config;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveOutput<'a> {
    issue_id: &'a str,
    key: &'a str,
    from: String,
    to: &'a str,
    index: usize,
}

/// Execute the move command.
///
/// # Errors
///
/// Returns an error if the issue is unknown or the status is not a column of
/// its project.
pub fn execute(args: &MoveArgs, config: &Config, json: bool) -> Result<()> {
    let mut store = open_store(config);
    let issue = require_issue(store.snapshot(), &args.id)?;
    let project = require_project(store.snapshot(), &issue.project_id)?;
    let to_status = resolve_status(project, &args.status)?;

    let issue_id = issue.id.clone();
    let project_id = project.id.clone();
    let from = issue.status.to_string();

    if !store.move_issue(&project_id, &issue_id, to_status.clone(), args.index) {
        return Err(TrackerError::TransactionAborted {
            reason: format!("could not move {issue_id} to '{to_status}'"),
        });
    }

    let snapshot = store.snapshot();
    let issue = require_issue(snapshot, &issue_id)?;
    let index = snapshot
        .board_order
        .column(&project_id, to_status.as_str())
        .iter()
        .position(|id| *id == issue_id)
        .unwrap_or_default();

    if json {
        return print_json(&MoveOutput {
            issue_id: &issue.id,
            key: &issue.key,
            from,
            to: issue.status.as_str(),
            index,
        });
    }
    println!("Moved {}: {from} -> {} (position {})", issue.key, issue.status, index + 1);
    Ok(())
}
