//! Update command implementation.

use tracker_lib::{IssuePatch, Result, TrackerError, ValidationError};
use tracker_lib::validation::MAX_TITLE_CHARS;

use super::{open_store, print_json, require_issue, require_project, resolve_status, split_csv};
use crate::cli::UpdateArgs;
use crate::config::Config;
use crate::format::format_issue_line;

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if the issue is unknown, a value does not parse, or no
/// field was given.
pub fn execute(args: UpdateArgs, config: &Config, json: bool) -> Result<()> {
    let mut store = open_store(config);
    let snapshot = store.snapshot();
    let issue = require_issue(snapshot, &args.id)?;
    let issue_id = issue.id.clone();

    let mut errors = Vec::new();
    let mut patch = IssuePatch::default();

    if let Some(title) = args.title {
        let title = title.trim();
        if title.is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        } else if title.chars().count() > MAX_TITLE_CHARS {
            errors.push(ValidationError::new(
                "title",
                format!("exceeds {MAX_TITLE_CHARS} characters"),
            ));
        } else {
            patch.title = Some(title.to_string());
        }
    }

    if args.clear_description {
        patch.description = Some(None);
    } else if let Some(description) = args.description {
        patch.description = Some(Some(description));
    }

    if let Some(raw) = args.status.as_deref() {
        let project = require_project(snapshot, &issue.project_id)?;
        patch.status = Some(resolve_status(project, raw)?);
    }
    patch.priority = args.priority.as_deref().map(str::parse).transpose()?;
    patch.issue_type = args.type_.as_deref().map(str::parse).transpose()?;

    if args.unassign {
        patch.assignee_id = Some(None);
    } else if let Some(assignee) = args.assignee {
        if snapshot.user(&assignee).is_none() {
            errors.push(ValidationError::new(
                "assignee_id",
                format!("unknown user '{assignee}'"),
            ));
        }
        patch.assignee_id = Some(Some(assignee));
    }

    if args.clear_tags {
        patch.tags = Some(Vec::new());
    } else if !args.tags.is_empty() {
        let mut tags: Vec<String> = Vec::new();
        for tag in split_csv(&args.tags) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        patch.tags = Some(tags);
    }

    if args.clear_estimate {
        patch.estimate = Some(None);
    } else if let Some(estimate) = args.estimate {
        patch.estimate = Some(Some(estimate));
    }

    if !errors.is_empty() {
        return Err(TrackerError::from_validation_errors(errors));
    }
    if patch.is_empty() {
        return Err(TrackerError::validation("update", "no fields to update"));
    }

    if !store.update_issue(&issue_id, patch) {
        return Err(TrackerError::IssueNotFound { id: issue_id });
    }
    let updated = require_issue(store.snapshot(), &issue_id)?;

    if json {
        return print_json(updated);
    }
    println!("Updated {}", updated.key);
    println!("  {}", format_issue_line(updated));
    Ok(())
}
