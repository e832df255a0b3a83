//! Command implementations.
//!
//! Each command opens the store from the effective [`Config`], resolves its
//! references up front so a typo is reported instead of silently skipped, and
//! prints either text or pretty JSON.

pub mod board;
pub mod comment;
pub mod completions;
pub mod config;
pub mod create;
pub mod doctor;
pub mod init;
pub mod link;
pub mod list;
pub mod move_issue;
pub mod notify;
pub mod projects;
pub mod show;
pub mod stats;
pub mod update;
pub mod version;

use serde::Serialize;
use tracker_lib::{
    FileStorage, Issue, PersistencePort, Project, Result, Snapshot, Status, Store, TrackerError,
};

use crate::config::Config;

/// Open the store backing `config`, seeding the demo workspace if nothing is saved.
pub(crate) fn open_store(config: &Config) -> Store {
    Store::open(state_port(config))
}

pub(crate) fn state_port(config: &Config) -> PersistencePort {
    PersistencePort::with_key(
        FileStorage::new(&config.data_dir),
        config.state_key.clone(),
    )
}

/// Resolve an issue id or key.
pub(crate) fn require_issue<'a>(snapshot: &'a Snapshot, reference: &str) -> Result<&'a Issue> {
    snapshot
        .resolve_issue_ref(reference)
        .ok_or_else(|| TrackerError::IssueNotFound {
            id: reference.trim().to_string(),
        })
}

/// Resolve a project id or key.
pub(crate) fn require_project<'a>(
    snapshot: &'a Snapshot,
    reference: &str,
) -> Result<&'a Project> {
    snapshot
        .resolve_project_ref(reference)
        .ok_or_else(|| TrackerError::ProjectNotFound {
            id: reference.trim().to_string(),
        })
}

/// Match `input` against the project's workflow, ignoring case.
pub(crate) fn resolve_status(project: &Project, input: &str) -> Result<Status> {
    let input = input.trim();
    project
        .statuses
        .iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(input))
        .cloned()
        .ok_or_else(|| TrackerError::InvalidStatus {
            status: input.to_string(),
        })
}

/// The acting user, required for commands that record an author.
pub(crate) fn require_actor(explicit: Option<String>, config: &Config, field: &str) -> Result<String> {
    explicit
        .or_else(|| config.actor.clone())
        .filter(|actor| !actor.trim().is_empty())
        .ok_or_else(|| {
            TrackerError::validation(
                field,
                format!("required (pass --{field}, --actor, or set actor in config)"),
            )
        })
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json_output = serde_json::to_string_pretty(value)?;
    println!("{json_output}");
    Ok(())
}

/// Split a comma-separated list and drop blanks.
pub(crate) fn split_csv(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}
