//! Create command implementation.

use tracker_lib::{NewIssue, Result};

use super::{open_store, print_json, require_actor, require_project, resolve_status, split_csv};
use crate::cli::CreateArgs;
use crate::config::Config;
use crate::format::format_issue_line;

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if the project is unknown, a field fails validation, or
/// no reporter can be determined.
pub fn execute(args: CreateArgs, config: &Config, json: bool) -> Result<()> {
    let mut store = open_store(config);

    let status = match args.status.as_deref() {
        Some(raw) => {
            let project = require_project(store.snapshot(), &args.project)?;
            Some(resolve_status(project, raw)?)
        }
        None => None,
    };
    let issue_type = args.type_.as_deref().map(str::parse).transpose()?;
    let priority = args.priority.as_deref().map(str::parse).transpose()?;
    let reporter_id = require_actor(args.reporter, config, "reporter")?;

    let input = NewIssue {
        project: args.project,
        title: args.title,
        description: args.description,
        issue_type: issue_type.unwrap_or_default(),
        status,
        priority: priority.unwrap_or_default(),
        assignee_id: args.assignee,
        reporter_id,
        tags: split_csv(&args.tags),
        estimate: args.estimate,
    };

    let issue = store.create_issue(input)?;

    if json {
        return print_json(&issue);
    }
    println!("Created {}: {}", issue.key, issue.title);
    println!("  {}", format_issue_line(&issue));
    Ok(())
}
