//! Show command implementation.

use std::fmt::Write as _;

use tracker_lib::{Result, Snapshot};

use super::{open_store, print_json, require_issue};
use crate::config::Config;
use crate::format::{
    IssueDetails, format_priority, format_timestamp, format_status_icon, format_type_badge,
};

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if any id or key does not resolve.
pub fn execute(ids: &[String], config: &Config, json: bool) -> Result<()> {
    let store = open_store(config);
    let snapshot = store.snapshot();

    let details = ids
        .iter()
        .map(|reference| require_issue(snapshot, reference).map(|issue| IssueDetails::build(issue, snapshot)))
        .collect::<Result<Vec<_>>>()?;

    if json {
        return print_json(&details);
    }

    let blocks: Vec<String> = details.iter().map(|d| render_details(d, snapshot)).collect();
    println!("{}", blocks.join("\n"));
    Ok(())
}

fn render_details(details: &IssueDetails, snapshot: &Snapshot) -> String {
    let issue = &details.issue;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} {} {}",
        format_status_icon(&issue.status),
        issue.key,
        format_type_badge(issue.issue_type),
        issue.title
    );
    let _ = writeln!(
        out,
        "Status: {}  Priority: {} ({})",
        issue.status,
        issue.priority,
        format_priority(issue.priority)
    );
    if let Some(key) = &details.project_key {
        let _ = writeln!(out, "Project: {key}");
    }
    let _ = writeln!(
        out,
        "Reporter: {}",
        details.reporter_name.as_deref().unwrap_or(&issue.reporter_id)
    );
    match (&details.assignee_name, &issue.assignee_id) {
        (Some(name), _) => {
            let _ = writeln!(out, "Assignee: {name}");
        }
        (None, Some(id)) => {
            let _ = writeln!(out, "Assignee: {id}");
        }
        (None, None) => {}
    }
    if !issue.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", issue.tags.join(", "));
    }
    if let Some(estimate) = issue.estimate {
        let _ = writeln!(out, "Estimate: {estimate}");
    }
    let _ = writeln!(
        out,
        "Created: {}  Updated: {}",
        format_timestamp(issue.created_at),
        format_timestamp(issue.updated_at)
    );

    if let Some(description) = issue.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "\n{description}");
    }

    if !details.linked.is_empty() {
        let _ = writeln!(out, "\nLinks:");
        for link in &details.linked {
            let target = link.target_key.as_deref().unwrap_or(&link.target_issue_id);
            let title = link.target_title.as_deref().unwrap_or("(missing)");
            let _ = write!(out, "  {} {target} {title}", link.link_type);
            if let Some(note) = &link.note {
                let _ = write!(out, " - {note}");
            }
            let _ = writeln!(out, " [{}]", link.link_id);
        }
    }

    if !issue.comments.is_empty() {
        let _ = writeln!(out, "\nComments ({}):", issue.comments.len());
        for comment in &issue.comments {
            let author = snapshot
                .user(&comment.author_id)
                .map_or(comment.author_id.as_str(), |u| u.name.as_str());
            let _ = writeln!(
                out,
                "  [{}] {author}: {}",
                format_timestamp(comment.created_at),
                comment.body
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_lib::seed_snapshot;

    #[test]
    fn render_includes_links_and_people() {
        let snapshot = seed_snapshot();
        let details = IssueDetails::build(&snapshot.issues["i_web_2"], &snapshot);
        let text = render_details(&details, &snapshot);
        assert!(text.contains("WEB-2"));
        assert!(text.contains("Links:"));
        assert!(text.contains("blocks WEB-1"));
        assert!(text.contains("APP-1"));
    }
}
