//! Version command implementation.

use serde::Serialize;
use tracker_lib::Result;

use super::print_json;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    #[serde(rename = "stateKey")]
    state_key: &'a str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(short: bool, json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if short {
        println!("{version}");
        return Ok(());
    }

    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };

    if json {
        return print_json(&VersionOutput {
            version,
            build,
            state_key: tracker_lib::DEFAULT_STATE_KEY,
        });
    }

    println!("trk version {version} ({build})");
    Ok(())
}
