//! Init command implementation.

use std::fs;

use serde::Serialize;
use tracker_lib::{Result, TrackerError, seed_snapshot};

use super::{print_json, state_port};
use crate::config::{Config, WORKSPACE_TEMPLATE};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitOutput {
    data_dir: String,
    state_path: String,
    projects: usize,
    issues: usize,
}

/// Execute the init command.
///
/// Writes the demo snapshot and a commented config template into the data
/// directory.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if a state file exists and `force` is not set,
/// or an I/O error if the directory or files cannot be written.
pub fn execute(config: &Config, force: bool, json: bool) -> Result<()> {
    let state_path = config.state_path();
    if state_path.exists() && !force {
        return Err(TrackerError::AlreadyInitialized { path: state_path });
    }

    fs::create_dir_all(&config.data_dir)?;

    let snapshot = seed_snapshot();
    state_port(config).try_save(&snapshot)?;

    let config_path = config.workspace_config_path();
    if !config_path.exists() {
        fs::write(&config_path, WORKSPACE_TEMPLATE)?;
    }

    tracing::info!(path = %state_path.display(), force, "initialized workspace");

    if json {
        return print_json(&InitOutput {
            data_dir: config.data_dir.display().to_string(),
            state_path: state_path.display().to_string(),
            projects: snapshot.projects.len(),
            issues: snapshot.issues.len(),
        });
    }

    println!("Initialized tracker in {}", config.data_dir.display());
    println!(
        "  {} project(s), {} issue(s) of demo data",
        snapshot.projects.len(),
        snapshot.issues.len()
    );
    Ok(())
}
