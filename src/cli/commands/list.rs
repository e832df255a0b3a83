//! List command implementation.
//!
//! Primary discovery interface: filters combine with AND, repeated values of
//! one filter combine with OR.

use tracker_lib::{Issue, IssueFilters, IssueType, Priority, Result, Snapshot, Status, TrackerError};

use super::{open_store, print_json, require_project, split_csv};
use crate::cli::ListArgs;
use crate::config::Config;
use crate::format::format_issue_line;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if a filter value does not parse or names an unknown project.
pub fn execute(args: &ListArgs, config: &Config, json: bool) -> Result<()> {
    let store = open_store(config);
    let snapshot = store.snapshot();

    let filters = build_filters(args, snapshot)?;
    let issues: Vec<&Issue> = snapshot.list_issues(&filters);
    tracing::debug!(count = issues.len(), sort = ?filters.sort, "listed issues");

    if json {
        print_json(&issues)?;
    } else if issues.is_empty() {
        println!("No issues found.");
    } else {
        for issue in &issues {
            println!("{}", format_issue_line(issue));
        }
        println!("\n{} issue(s)", issues.len());
    }

    Ok(())
}

/// Convert CLI args to query filters.
///
/// # Errors
///
/// Returns an error for an unknown project, status, priority, type or sort field.
pub fn build_filters(args: &ListArgs, snapshot: &Snapshot) -> Result<IssueFilters> {
    let project = args
        .project
        .as_deref()
        .map(|reference| require_project(snapshot, reference))
        .transpose()?;

    let statuses = split_csv(&args.status)
        .iter()
        .map(|raw| canonical_status(snapshot, project.map(|p| p.statuses.as_slice()), raw))
        .collect::<Result<Vec<Status>>>()?;
    let priorities = split_csv(&args.priority)
        .iter()
        .map(|raw| raw.parse::<Priority>())
        .collect::<Result<Vec<_>>>()?;
    let types = split_csv(&args.type_)
        .iter()
        .map(|raw| raw.parse::<IssueType>())
        .collect::<Result<Vec<_>>>()?;
    let tags = split_csv(&args.tags);

    Ok(IssueFilters {
        project_id: project.map(|p| p.id.clone()),
        statuses: non_empty(statuses),
        priorities: non_empty(priorities),
        types: non_empty(types),
        assignee_id: args.assignee.clone(),
        unassigned: args.unassigned,
        tags: non_empty(tags),
        text: args
            .search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToString::to_string),
        limit: args.limit,
        sort: args.sort.as_deref().map(str::parse).transpose()?.unwrap_or_default(),
        reverse: args.reverse,
    })
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}

/// Spell a status the way the workflow does; scoped to one project when given.
fn canonical_status(snapshot: &Snapshot, scope: Option<&[Status]>, raw: &str) -> Result<Status> {
    let found = scope.map_or_else(
        || {
            snapshot
                .projects
                .values()
                .flat_map(|p| p.statuses.iter())
                .find(|s| s.as_str().eq_ignore_ascii_case(raw))
        },
        |statuses| statuses.iter().find(|s| s.as_str().eq_ignore_ascii_case(raw)),
    );
    found.cloned().ok_or_else(|| TrackerError::InvalidStatus {
        status: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_lib::{IssueSort, seed_snapshot};

    #[test]
    fn priority_accepts_p_prefix() {
        let snapshot = seed_snapshot();
        let args = ListArgs {
            priority: vec!["P1".to_string()],
            ..Default::default()
        };
        let filters = build_filters(&args, &snapshot).unwrap();
        assert_eq!(filters.priorities, Some(vec![Priority::High]));
    }

    #[test]
    fn sort_alias_is_accepted() {
        let snapshot = seed_snapshot();
        let args = ListArgs {
            sort: Some("created_at".to_string()),
            ..Default::default()
        };
        let filters = build_filters(&args, &snapshot).unwrap();
        assert_eq!(filters.sort, IssueSort::Created);
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let snapshot = seed_snapshot();
        let args = ListArgs {
            sort: Some("bogus".to_string()),
            ..Default::default()
        };
        assert!(build_filters(&args, &snapshot).is_err());
    }

    #[test]
    fn status_is_matched_case_insensitively() {
        let snapshot = seed_snapshot();
        let args = ListArgs {
            project: Some("web".to_string()),
            status: vec!["to do,in progress".to_string()],
            ..Default::default()
        };
        let filters = build_filters(&args, &snapshot).unwrap();
        assert_eq!(filters.project_id.as_deref(), Some("p_web"));
        assert_eq!(
            filters.statuses,
            Some(vec![
                Status::new(Status::TO_DO),
                Status::new(Status::IN_PROGRESS)
            ])
        );
    }

    #[test]
    fn unknown_project_is_an_error() {
        let snapshot = seed_snapshot();
        let args = ListArgs {
            project: Some("NOPE".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_filters(&args, &snapshot),
            Err(TrackerError::ProjectNotFound { .. })
        ));
    }
}
