//! Command processor.
//!
//! The only way state changes: a closed set of commands applied to a snapshot
//! to produce the next snapshot. Applying a command is a pure function of the
//! command, the input snapshot and the supplied clock reading.
//!
//! Commands that name a missing entity are soft no-ops. [`transition`] reports
//! them as [`Skipped`]; [`reduce`] turns them into an unchanged snapshot.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::{Comment, Issue, IssueLink, IssueType, Notification, Priority, Status};
use crate::snapshot::{RECENT_LIMIT, Snapshot};

/// Fields to merge onto an existing issue.
///
/// `id`, `key`, `project_id` and `created_at` are not patchable. A `status`
/// change is applied through the board-order move logic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub issue_type: Option<IssueType>,
    pub assignee_id: Option<Option<String>>,
    pub reporter_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub estimate: Option<Option<u32>>,
    pub comments: Option<Vec<Comment>>,
    pub links: Option<Vec<IssueLink>>,
}

impl IssuePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.issue_type.is_none()
            && self.assignee_id.is_none()
            && self.reporter_id.is_none()
            && self.tags.is_none()
            && self.estimate.is_none()
            && self.comments.is_none()
            && self.links.is_none()
    }

    /// Patch that only replaces the link list.
    #[must_use]
    pub fn links(links: Vec<IssueLink>) -> Self {
        Self {
            links: Some(links),
            ..Self::default()
        }
    }

    /// Merge every field except `status` onto `issue`.
    fn merge_into(self, issue: &mut Issue) {
        if let Some(title) = self.title {
            issue.title = title;
        }
        if let Some(description) = self.description {
            issue.description = description;
        }
        if let Some(priority) = self.priority {
            issue.priority = priority;
        }
        if let Some(issue_type) = self.issue_type {
            issue.issue_type = issue_type;
        }
        if let Some(assignee_id) = self.assignee_id {
            issue.assignee_id = assignee_id;
        }
        if let Some(reporter_id) = self.reporter_id {
            issue.reporter_id = reporter_id;
        }
        if let Some(tags) = self.tags {
            issue.tags = tags;
        }
        if let Some(estimate) = self.estimate {
            issue.estimate = estimate;
        }
        if let Some(comments) = self.comments {
            issue.comments = comments;
        }
        if let Some(links) = self.links {
            issue.links = links;
        }
    }
}

/// A single mutation request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum Command {
    /// Insert a fully formed issue at the top of its board column.
    CreateIssue(Issue),
    /// Merge a patch onto an existing issue.
    UpdateIssue { id: String, patch: IssuePatch },
    /// Move an issue to another column (or another slot in the same column).
    MoveIssue {
        project_id: String,
        issue_id: String,
        to_status: Status,
        to_index: Option<usize>,
    },
    StarProject { project_id: String, starred: bool },
    AddNotification(Notification),
    MarkNotificationRead { id: String, read: bool },
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateIssue(_) => "create_issue",
            Self::UpdateIssue { .. } => "update_issue",
            Self::MoveIssue { .. } => "move_issue",
            Self::StarProject { .. } => "star_project",
            Self::AddNotification(_) => "add_notification",
            Self::MarkNotificationRead { .. } => "mark_notification_read",
        }
    }
}

/// Why a command left the snapshot unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
    IssueNotFound { id: String },
    IssueExists { id: String },
    ProjectNotFound { id: String },
    StatusNotInProject { project_id: String, status: Status },
    IssueNotInProject { issue_id: String, project_id: String },
    NotOnBoard { issue_id: String },
    NotificationNotFound { id: String },
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IssueNotFound { id } => write!(f, "issue {id} not found"),
            Self::IssueExists { id } => write!(f, "issue {id} already exists"),
            Self::ProjectNotFound { id } => write!(f, "project {id} not found"),
            Self::StatusNotInProject { project_id, status } => {
                write!(f, "status '{status}' is not a column of {project_id}")
            }
            Self::IssueNotInProject {
                issue_id,
                project_id,
            } => write!(f, "issue {issue_id} does not belong to {project_id}"),
            Self::NotOnBoard { issue_id } => write!(f, "issue {issue_id} is not on the board"),
            Self::NotificationNotFound { id } => write!(f, "notification {id} not found"),
        }
    }
}

/// Apply `command` to `state`, returning the next snapshot.
///
/// Never fails: a skipped command yields a snapshot equal to `state`.
#[must_use]
pub fn reduce(state: &Snapshot, command: Command, now: DateTime<Utc>) -> Snapshot {
    transition(state, command, now).unwrap_or_else(|_| state.clone())
}

/// Apply `command` to `state`, reporting soft no-ops as [`Skipped`].
///
/// # Errors
///
/// Returns `Skipped` when the command references something that does not
/// exist; `state` is untouched in that case.
pub fn transition(
    state: &Snapshot,
    command: Command,
    now: DateTime<Utc>,
) -> Result<Snapshot, Skipped> {
    let name = command.name();
    let mut next = state.clone();
    let outcome = match command {
        Command::CreateIssue(issue) => create_issue(&mut next, issue),
        Command::UpdateIssue { id, patch } => update_issue(&mut next, &id, patch, now),
        Command::MoveIssue {
            project_id,
            issue_id,
            to_status,
            to_index,
        } => move_issue(&mut next, &project_id, &issue_id, &to_status, to_index, now),
        Command::StarProject {
            project_id,
            starred,
        } => star_project(&mut next, &project_id, starred),
        Command::AddNotification(notification) => {
            next.notifications.insert(0, notification);
            Ok(())
        }
        Command::MarkNotificationRead { id, read } => mark_read(&mut next, &id, read),
    };

    match outcome {
        Ok(()) => Ok(next),
        Err(skipped) => {
            tracing::debug!(command = name, reason = %skipped, "command skipped");
            Err(skipped)
        }
    }
}

fn create_issue(next: &mut Snapshot, issue: Issue) -> Result<(), Skipped> {
    if next.issues.contains_key(&issue.id) {
        return Err(Skipped::IssueExists { id: issue.id });
    }
    let project = next
        .projects
        .get(&issue.project_id)
        .ok_or_else(|| Skipped::ProjectNotFound {
            id: issue.project_id.clone(),
        })?;
    if !project.has_status(issue.status.as_str()) {
        return Err(Skipped::StatusNotInProject {
            project_id: issue.project_id,
            status: issue.status,
        });
    }

    next.board_order
        .insert_front(&issue.project_id, &issue.status, &issue.id);
    next.recent_issue_ids.insert(0, issue.id.clone());
    next.recent_issue_ids.truncate(RECENT_LIMIT);
    next.issues.insert(issue.id.clone(), issue);
    Ok(())
}

fn update_issue(
    next: &mut Snapshot,
    id: &str,
    mut patch: IssuePatch,
    now: DateTime<Utc>,
) -> Result<(), Skipped> {
    let current = next
        .issues
        .get(id)
        .ok_or_else(|| Skipped::IssueNotFound { id: id.to_string() })?;

    // A status change in a generic patch goes through the board, never around it.
    let new_status = patch
        .status
        .take()
        .filter(|status| *status != current.status);
    if let Some(status) = new_status {
        let project_id = current.project_id.clone();
        move_issue(next, &project_id, id, &status, None, now)?;
    }

    let issue = next
        .issues
        .get_mut(id)
        .ok_or_else(|| Skipped::IssueNotFound { id: id.to_string() })?;
    patch.merge_into(issue);
    issue.updated_at = now;
    Ok(())
}

fn move_issue(
    next: &mut Snapshot,
    project_id: &str,
    issue_id: &str,
    to_status: &Status,
    to_index: Option<usize>,
    now: DateTime<Utc>,
) -> Result<(), Skipped> {
    let project = next
        .projects
        .get(project_id)
        .ok_or_else(|| Skipped::ProjectNotFound {
            id: project_id.to_string(),
        })?;
    if !project.has_status(to_status.as_str()) {
        return Err(Skipped::StatusNotInProject {
            project_id: project_id.to_string(),
            status: to_status.clone(),
        });
    }
    let issue = next
        .issues
        .get(issue_id)
        .ok_or_else(|| Skipped::IssueNotFound {
            id: issue_id.to_string(),
        })?;
    if issue.project_id != project_id {
        return Err(Skipped::IssueNotInProject {
            issue_id: issue_id.to_string(),
            project_id: project_id.to_string(),
        });
    }

    next.board_order
        .move_issue(project_id, issue_id, to_status, to_index)
        .ok_or_else(|| Skipped::NotOnBoard {
            issue_id: issue_id.to_string(),
        })?;

    if let Some(issue) = next.issues.get_mut(issue_id) {
        issue.status = to_status.clone();
        issue.updated_at = now;
    }
    Ok(())
}

fn star_project(next: &mut Snapshot, project_id: &str, starred: bool) -> Result<(), Skipped> {
    let project = next
        .projects
        .get_mut(project_id)
        .ok_or_else(|| Skipped::ProjectNotFound {
            id: project_id.to_string(),
        })?;
    project.starred = starred;
    Ok(())
}

fn mark_read(next: &mut Snapshot, id: &str, read: bool) -> Result<(), Skipped> {
    let notification = next
        .notifications
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| Skipped::NotificationNotFound { id: id.to_string() })?;
    notification.read = read;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_snapshot;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn new_issue(id: &str, status: &str) -> Issue {
        Issue {
            id: id.to_string(),
            key: format!("WEB-{id}"),
            project_id: "p_web".to_string(),
            title: format!("Issue {id}"),
            status: Status::new(status),
            reporter_id: "u_alex".to_string(),
            created_at: now(),
            updated_at: now(),
            ..Default::default()
        }
    }

    #[test]
    fn create_prepends_to_board_and_recent() {
        let state = seed_snapshot();
        let next = reduce(&state, Command::CreateIssue(new_issue("i_new", Status::TO_DO)), now());

        assert!(next.issues.contains_key("i_new"));
        assert_eq!(next.board_order.column("p_web", Status::TO_DO), ["i_new", "i_web_1"]);
        assert_eq!(next.recent_issue_ids[0], "i_new");
        assert_eq!(next.recent_issue_ids.len(), state.recent_issue_ids.len() + 1);
    }

    #[test]
    fn create_caps_recent_list() {
        let mut state = seed_snapshot();
        for n in 0..30 {
            state = reduce(
                &state,
                Command::CreateIssue(new_issue(&format!("i_bulk_{n}"), Status::TO_DO)),
                now(),
            );
        }
        assert_eq!(state.recent_issue_ids.len(), RECENT_LIMIT);
        assert_eq!(state.recent_issue_ids[0], "i_bulk_29");
        assert_eq!(state.recent_issue_ids[19], "i_bulk_10");
    }

    #[test]
    fn create_with_unknown_status_is_skipped() {
        let state = seed_snapshot();
        let result = transition(&state, Command::CreateIssue(new_issue("i_x", "Icebox")), now());
        assert!(matches!(result, Err(Skipped::StatusNotInProject { .. })));
    }

    #[test]
    fn create_with_existing_id_is_skipped() {
        let state = seed_snapshot();
        let result = transition(
            &state,
            Command::CreateIssue(new_issue("i_web_1", Status::TO_DO)),
            now(),
        );
        assert_eq!(
            result,
            Err(Skipped::IssueExists {
                id: "i_web_1".into()
            })
        );
    }

    #[test]
    fn update_of_missing_issue_returns_equal_snapshot() {
        let state = seed_snapshot();
        let next = reduce(
            &state,
            Command::UpdateIssue {
                id: "nonexistent".into(),
                patch: IssuePatch {
                    title: Some("x".into()),
                    ..Default::default()
                },
            },
            now(),
        );
        assert_eq!(next, state);
    }

    #[test]
    fn update_merges_fields_and_stamps_time() {
        let state = seed_snapshot();
        let next = reduce(
            &state,
            Command::UpdateIssue {
                id: "i_web_3".into(),
                patch: IssuePatch {
                    title: Some("Track CTA clicks".into()),
                    assignee_id: Some(None),
                    estimate: Some(Some(5)),
                    ..Default::default()
                },
            },
            now(),
        );
        let issue = &next.issues["i_web_3"];
        assert_eq!(issue.title, "Track CTA clicks");
        assert_eq!(issue.assignee_id, None);
        assert_eq!(issue.estimate, Some(5));
        assert_eq!(issue.updated_at, now());
        assert_eq!(issue.key, "WEB-3");
    }

    #[test]
    fn update_with_status_moves_on_board() {
        let state = seed_snapshot();
        let next = reduce(
            &state,
            Command::UpdateIssue {
                id: "i_web_1".into(),
                patch: IssuePatch {
                    status: Some(Status::new(Status::DONE)),
                    ..Default::default()
                },
            },
            now(),
        );
        assert_eq!(next.issues["i_web_1"].status.as_str(), Status::DONE);
        assert!(next.board_order.column("p_web", Status::TO_DO).is_empty());
        assert_eq!(
            next.board_order.column("p_web", Status::DONE).last().map(String::as_str),
            Some("i_web_1")
        );
    }

    #[test]
    fn update_with_foreign_status_is_skipped_whole() {
        let state = seed_snapshot();
        let result = transition(
            &state,
            Command::UpdateIssue {
                id: "i_web_1".into(),
                patch: IssuePatch {
                    title: Some("renamed".into()),
                    status: Some(Status::new("Icebox")),
                    ..Default::default()
                },
            },
            now(),
        );
        assert!(matches!(result, Err(Skipped::StatusNotInProject { .. })));
    }

    #[test]
    fn move_to_index_zero() {
        let state = seed_snapshot();
        let next = reduce(
            &state,
            Command::MoveIssue {
                project_id: "p_web".into(),
                issue_id: "i_web_1".into(),
                to_status: Status::new(Status::DONE),
                to_index: Some(0),
            },
            now(),
        );
        assert!(next.board_order.column("p_web", Status::TO_DO).is_empty());
        assert_eq!(next.board_order.column("p_web", Status::DONE)[0], "i_web_1");
        assert_eq!(next.issues["i_web_1"].status.as_str(), Status::DONE);
        assert_eq!(next.issues["i_web_1"].updated_at, now());
    }

    #[test]
    fn move_across_projects_is_skipped() {
        let state = seed_snapshot();
        let result = transition(
            &state,
            Command::MoveIssue {
                project_id: "p_app".into(),
                issue_id: "i_web_1".into(),
                to_status: Status::new(Status::DONE),
                to_index: None,
            },
            now(),
        );
        assert!(matches!(result, Err(Skipped::IssueNotInProject { .. })));
    }

    #[test]
    fn star_and_notifications() {
        let state = seed_snapshot();
        let next = reduce(
            &state,
            Command::StarProject {
                project_id: "p_app".into(),
                starred: true,
            },
            now(),
        );
        assert!(next.projects["p_app"].starred);
        assert_eq!(
            reduce(
                &state,
                Command::StarProject {
                    project_id: "p_none".into(),
                    starred: true
                },
                now()
            ),
            state
        );

        let next = reduce(
            &next,
            Command::AddNotification(Notification {
                id: "n_new".into(),
                title: "Hello".into(),
                body: None,
                read: false,
                created_at: now(),
            }),
            now(),
        );
        assert_eq!(next.notifications[0].id, "n_new");

        let next = reduce(
            &next,
            Command::MarkNotificationRead {
                id: "n_new".into(),
                read: true,
            },
            now(),
        );
        assert!(next.notifications[0].read);
        assert!(matches!(
            transition(
                &next,
                Command::MarkNotificationRead {
                    id: "n_missing".into(),
                    read: true
                },
                now()
            ),
            Err(Skipped::NotificationNotFound { .. })
        ));
    }
}
