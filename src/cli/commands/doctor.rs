//! Doctor command implementation.
//!
//! Read-only: loads the saved state directly (never the seed) and reports
//! anything that breaks the store's consistency rules.

use serde::Serialize;
use tracker_lib::Result;
use tracker_lib::validation::check_snapshot;

use super::state_port;
use crate::config::Config;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct DoctorReport {
    ok: bool,
    checks: Vec<CheckResult>,
}

fn push_check(
    checks: &mut Vec<CheckResult>,
    name: &str,
    status: CheckStatus,
    message: Option<String>,
    details: Option<serde_json::Value>,
) {
    checks.push(CheckResult {
        name: name.to_string(),
        status,
        message,
        details,
    });
}

fn has_error(checks: &[CheckResult]) -> bool {
    checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Error))
}

fn print_report(report: &DoctorReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    println!("trk doctor");
    for check in &report.checks {
        let label = match check.status {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Error => "ERROR",
        };
        if let Some(message) = &check.message {
            println!("{label} {}: {}", check.name, message);
        } else {
            println!("{label} {}", check.name);
        }
        if let Some(serde_json::Value::Array(items)) = &check.details {
            for item in items {
                if let Some(text) = item.as_str() {
                    println!("  - {text}");
                }
            }
        }
    }
    Ok(())
}

fn collect_checks(config: &Config) -> Vec<CheckResult> {
    let mut checks = Vec::new();

    let sources: Vec<String> = config
        .sources
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    push_check(
        &mut checks,
        "config",
        CheckStatus::Ok,
        Some(if sources.is_empty() {
            "defaults (no config files)".to_string()
        } else {
            format!("{} file(s) loaded", sources.len())
        }),
        (!sources.is_empty()).then(|| serde_json::json!(sources)),
    );

    let state_path = config.state_path();
    let snapshot = match state_port(config).try_load() {
        Ok(Some(snapshot)) => {
            push_check(
                &mut checks,
                "state.load",
                CheckStatus::Ok,
                Some(state_path.display().to_string()),
                None,
            );
            snapshot
        }
        Ok(None) => {
            push_check(
                &mut checks,
                "state.load",
                CheckStatus::Warn,
                Some(format!(
                    "no saved state at {} (run `trk init`)",
                    state_path.display()
                )),
                None,
            );
            return checks;
        }
        Err(e) => {
            push_check(
                &mut checks,
                "state.load",
                CheckStatus::Error,
                Some(format!("{}: {e}", state_path.display())),
                None,
            );
            return checks;
        }
    };

    let violations: Vec<String> = check_snapshot(&snapshot)
        .iter()
        .map(ToString::to_string)
        .collect();
    if violations.is_empty() {
        push_check(
            &mut checks,
            "state.consistency",
            CheckStatus::Ok,
            Some(format!(
                "{} project(s), {} issue(s)",
                snapshot.projects.len(),
                snapshot.issues.len()
            )),
            None,
        );
    } else {
        push_check(
            &mut checks,
            "state.consistency",
            CheckStatus::Error,
            Some(format!("{} problem(s)", violations.len())),
            Some(serde_json::json!(violations)),
        );
    }

    checks
}

/// Execute the doctor command.
///
/// Exits with status 1 when any check reports an error.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let checks = collect_checks(config);
    let report = DoctorReport {
        ok: !has_error(&checks),
        checks,
    };
    print_report(&report, json)?;

    if !report.ok {
        std::process::exit(1);
    }
    Ok(())
}
