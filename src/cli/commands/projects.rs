//! Project commands: list, star, and the recent-issues view.

use serde::Serialize;
use tracker_lib::{Result, TrackerError};

use super::{open_store, print_json, require_project};
use crate::config::Config;
use crate::format::format_issue_line;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSummary<'a> {
    id: &'a str,
    key: &'a str,
    name: &'a str,
    starred: bool,
    issues: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_sprint: Option<&'a str>,
}

/// List projects with their issue counts.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn list(starred_only: bool, config: &Config, json: bool) -> Result<()> {
    let store = open_store(config);
    let snapshot = store.snapshot();

    let summaries: Vec<ProjectSummary> = snapshot
        .projects
        .values()
        .filter(|project| !starred_only || project.starred)
        .map(|project| ProjectSummary {
            id: &project.id,
            key: &project.key,
            name: &project.name,
            starred: project.starred,
            issues: snapshot
                .issues
                .values()
                .filter(|issue| issue.project_id == project.id)
                .count(),
            active_sprint: snapshot
                .active_sprint(&project.id)
                .map(|sprint| sprint.name.as_str()),
        })
        .collect();

    if json {
        return print_json(&summaries);
    }
    if summaries.is_empty() {
        println!("No projects found.");
        return Ok(());
    }
    for summary in &summaries {
        let star = if summary.starred { "★" } else { " " };
        print!("{star} {:<6} {} ({} issue(s))", summary.key, summary.name, summary.issues);
        if let Some(sprint) = summary.active_sprint {
            print!(" - sprint: {sprint}");
        }
        println!();
    }
    Ok(())
}

/// Star or unstar a project.
///
/// # Errors
///
/// Returns an error if the project is unknown.
pub fn star(project_ref: &str, starred: bool, config: &Config, json: bool) -> Result<()> {
    let mut store = open_store(config);
    let project_id = require_project(store.snapshot(), project_ref)?.id.clone();

    if !store.star_project(&project_id, starred) {
        return Err(TrackerError::ProjectNotFound { id: project_id });
    }
    let project = require_project(store.snapshot(), &project_id)?;

    if json {
        return print_json(project);
    }
    let verb = if starred { "Starred" } else { "Unstarred" };
    println!("{verb} {} ({})", project.name, project.key);
    Ok(())
}

/// Recently created issues, newest first.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn recent(config: &Config, json: bool) -> Result<()> {
    let store = open_store(config);
    let issues = store.snapshot().recent_issues();

    if json {
        return print_json(&issues);
    }
    if issues.is_empty() {
        println!("No recent issues.");
        return Ok(());
    }
    for issue in &issues {
        println!("{}", format_issue_line(issue));
    }
    Ok(())
}
