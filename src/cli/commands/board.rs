//! Board command implementation.

use tracker_lib::Result;

use super::{open_store, print_json, require_project};
use crate::config::Config;
use crate::format::{BoardColumn, format_issue_line_width, format_status_icon};

/// Execute the board command: every column of a project in workflow order.
///
/// # Errors
///
/// Returns an error if the project is unknown.
pub fn execute(project_ref: &str, width: usize, config: &Config, json: bool) -> Result<()> {
    let store = open_store(config);
    let snapshot = store.snapshot();
    let project = require_project(snapshot, project_ref)?;
    let columns = snapshot.board_columns(&project.id);

    if json {
        let output: Vec<BoardColumn> = columns
            .iter()
            .map(|column| BoardColumn {
                status: column.status.to_string(),
                issues: column.issues.iter().map(|issue| (*issue).clone()).collect(),
            })
            .collect();
        return print_json(&output);
    }

    println!("{} ({})", project.name, project.key);
    for column in &columns {
        println!(
            "\n{} {} ({})",
            format_status_icon(column.status),
            column.status,
            column.issues.len()
        );
        if column.issues.is_empty() {
            println!("  (empty)");
        }
        for issue in &column.issues {
            println!("  {}", format_issue_line_width(issue, width.saturating_sub(2)));
        }
    }
    Ok(())
}
