//! Config command implementation.

use serde::Serialize;
use tracker_lib::{Result, TrackerError};

use super::print_json;
use crate::cli::ConfigSubcommand;
use crate::config::{Config, user_config_path};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigPaths {
    user: Option<String>,
    workspace: String,
    state: String,
}

/// Execute a config subcommand.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn execute(command: &ConfigSubcommand, config: &Config, json: bool) -> Result<()> {
    match command {
        ConfigSubcommand::Show => show(config, json),
        ConfigSubcommand::Path => paths(config, json),
    }
}

fn show(config: &Config, json: bool) -> Result<()> {
    if json {
        return print_json(config);
    }
    let yaml = serde_yaml::to_string(config).map_err(|e| TrackerError::Config(e.to_string()))?;
    print!("{yaml}");
    Ok(())
}

fn paths(config: &Config, json: bool) -> Result<()> {
    let output = ConfigPaths {
        user: user_config_path().map(|path| path.display().to_string()),
        workspace: config.workspace_config_path().display().to_string(),
        state: config.state_path().display().to_string(),
    };
    if json {
        return print_json(&output);
    }
    println!("user:      {}", output.user.as_deref().unwrap_or("(none)"));
    println!("workspace: {}", output.workspace);
    println!("state:     {}", output.state);
    Ok(())
}
