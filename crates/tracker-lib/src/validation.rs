//! Validation helpers.
//!
//! [`IssueValidator`] checks caller input before an issue is built.
//! [`check_snapshot`] audits a whole snapshot against the store's structural
//! rules and reports every breach it finds without changing anything.

use std::collections::HashMap;
use std::fmt;

use crate::error::ValidationError;
use crate::model::{Project, Status};
use crate::snapshot::{RECENT_LIMIT, Snapshot};
use crate::store::NewIssue;

pub const MAX_TITLE_CHARS: usize = 500;
pub const MAX_DESCRIPTION_BYTES: usize = 102_400;

/// Validates new-issue input against a snapshot.
pub struct IssueValidator;

impl IssueValidator {
    /// Validate `input` for creation in `project`, returning every problem found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any rule is violated.
    pub fn validate_new(
        snapshot: &Snapshot,
        project: &Project,
        input: &NewIssue,
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // Title: required, max 500 chars.
        if input.title.trim().is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        }
        if input.title.chars().count() > MAX_TITLE_CHARS {
            errors.push(ValidationError::new("title", "exceeds 500 characters"));
        }

        if let Some(description) = input.description.as_ref() {
            if description.len() > MAX_DESCRIPTION_BYTES {
                errors.push(ValidationError::new("description", "exceeds 100KB"));
            }
        }

        if let Some(status) = input.status.as_ref() {
            if !project.has_status(status.as_str()) {
                errors.push(ValidationError::new(
                    "status",
                    format!("'{status}' is not a column of {}", project.key),
                ));
            }
        } else if project.statuses.is_empty() {
            errors.push(ValidationError::new("status", "project has no statuses"));
        }

        // Reporter: required, must be a known user.
        if input.reporter_id.trim().is_empty() {
            errors.push(ValidationError::new("reporter_id", "is required"));
        } else if snapshot.user(&input.reporter_id).is_none() {
            errors.push(ValidationError::new(
                "reporter_id",
                format!("unknown user '{}'", input.reporter_id),
            ));
        }

        if let Some(assignee) = input.assignee_id.as_ref() {
            if snapshot.user(assignee).is_none() {
                errors.push(ValidationError::new(
                    "assignee_id",
                    format!("unknown user '{assignee}'"),
                ));
            }
        }

        if input.tags.iter().any(|tag| tag.trim().is_empty()) {
            errors.push(ValidationError::new("tags", "cannot contain empty tags"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A structural rule a snapshot breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    UnknownProject {
        issue_id: String,
        project_id: String,
    },
    StatusNotInProject {
        issue_id: String,
        status: Status,
    },
    NotOnBoard {
        issue_id: String,
    },
    StrayBoardEntry {
        project_id: String,
        issue_id: String,
    },
    DuplicateBoardEntry {
        project_id: String,
        issue_id: String,
    },
    WrongColumn {
        issue_id: String,
        column: Status,
        status: Status,
    },
    DanglingLink {
        issue_id: String,
        link_id: String,
        target_id: String,
    },
    MissingReciprocal {
        issue_id: String,
        link_id: String,
    },
    DuplicateReciprocal {
        issue_id: String,
        link_id: String,
        count: usize,
    },
    RecentTooLong {
        len: usize,
    },
    UnknownRecent {
        issue_id: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProject {
                issue_id,
                project_id,
            } => write!(f, "issue {issue_id} belongs to unknown project {project_id}"),
            Self::StatusNotInProject { issue_id, status } => {
                write!(f, "issue {issue_id} has status '{status}' outside its project workflow")
            }
            Self::NotOnBoard { issue_id } => write!(f, "issue {issue_id} is missing from the board"),
            Self::StrayBoardEntry {
                project_id,
                issue_id,
            } => write!(f, "board of {project_id} lists {issue_id}, which is not one of its issues"),
            Self::DuplicateBoardEntry {
                project_id,
                issue_id,
            } => write!(f, "board of {project_id} lists {issue_id} more than once"),
            Self::WrongColumn {
                issue_id,
                column,
                status,
            } => write!(f, "issue {issue_id} sits in '{column}' but has status '{status}'"),
            Self::DanglingLink {
                issue_id,
                link_id,
                target_id,
            } => write!(f, "link {link_id} on {issue_id} points at missing issue {target_id}"),
            Self::MissingReciprocal { issue_id, link_id } => {
                write!(f, "link {link_id} on {issue_id} has no reciprocal")
            }
            Self::DuplicateReciprocal {
                issue_id,
                link_id,
                count,
            } => write!(f, "link {link_id} on {issue_id} has {count} reciprocals"),
            Self::RecentTooLong { len } => {
                write!(f, "recent list holds {len} ids (limit {RECENT_LIMIT})")
            }
            Self::UnknownRecent { issue_id } => {
                write!(f, "recent list references missing issue {issue_id}")
            }
        }
    }
}

/// Audit `snapshot` and return every violation found, in a stable order.
#[must_use]
pub fn check_snapshot(snapshot: &Snapshot) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_issues_and_board(snapshot, &mut violations);
    check_links(snapshot, &mut violations);
    check_recent(snapshot, &mut violations);
    violations
}

fn check_issues_and_board(snapshot: &Snapshot, violations: &mut Vec<Violation>) {
    // issue id -> (project, column) for every board entry
    let mut placed: HashMap<&str, Vec<(&str, &Status)>> = HashMap::new();
    for project_id in snapshot.board_order.project_ids() {
        let Some(columns) = snapshot.board_order.project(project_id) else {
            continue;
        };
        for (status, ids) in columns {
            for id in ids {
                placed.entry(id.as_str()).or_default().push((project_id, status));
            }
        }
    }

    for issue in snapshot.issues.values() {
        let Some(project) = snapshot.project(&issue.project_id) else {
            violations.push(Violation::UnknownProject {
                issue_id: issue.id.clone(),
                project_id: issue.project_id.clone(),
            });
            continue;
        };
        if !project.has_status(issue.status.as_str()) {
            violations.push(Violation::StatusNotInProject {
                issue_id: issue.id.clone(),
                status: issue.status.clone(),
            });
        }

        let own: Vec<&Status> = placed
            .get(issue.id.as_str())
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(project_id, _)| *project_id == issue.project_id)
                    .map(|(_, status)| *status)
                    .collect()
            })
            .unwrap_or_default();
        match own.as_slice() {
            [] => violations.push(Violation::NotOnBoard {
                issue_id: issue.id.clone(),
            }),
            [column] => {
                if **column != issue.status {
                    violations.push(Violation::WrongColumn {
                        issue_id: issue.id.clone(),
                        column: (*column).clone(),
                        status: issue.status.clone(),
                    });
                }
            }
            _ => violations.push(Violation::DuplicateBoardEntry {
                project_id: issue.project_id.clone(),
                issue_id: issue.id.clone(),
            }),
        }
    }

    let mut strays: Vec<(&str, &str)> = placed
        .iter()
        .flat_map(|(issue_id, entries)| {
            entries.iter().filter_map(move |(project_id, _)| {
                let belongs = snapshot
                    .issue(issue_id)
                    .is_some_and(|issue| issue.project_id == *project_id);
                (!belongs).then_some((*project_id, *issue_id))
            })
        })
        .collect();
    strays.sort_unstable();
    strays.dedup();
    violations.extend(strays.into_iter().map(|(project_id, issue_id)| {
        Violation::StrayBoardEntry {
            project_id: project_id.to_string(),
            issue_id: issue_id.to_string(),
        }
    }));
}

fn check_links(snapshot: &Snapshot, violations: &mut Vec<Violation>) {
    for issue in snapshot.issues.values() {
        for link in &issue.links {
            let Some(target) = snapshot.issue(&link.target_issue_id) else {
                violations.push(Violation::DanglingLink {
                    issue_id: issue.id.clone(),
                    link_id: link.id.clone(),
                    target_id: link.target_issue_id.clone(),
                });
                continue;
            };
            let inverse = link.link_type.inverse();
            let count = target
                .links_to(&issue.id)
                .filter(|back| back.link_type == inverse)
                .count();
            match count {
                1 => {}
                0 => violations.push(Violation::MissingReciprocal {
                    issue_id: issue.id.clone(),
                    link_id: link.id.clone(),
                }),
                _ => violations.push(Violation::DuplicateReciprocal {
                    issue_id: issue.id.clone(),
                    link_id: link.id.clone(),
                    count,
                }),
            }
        }
    }
}

fn check_recent(snapshot: &Snapshot, violations: &mut Vec<Violation>) {
    if snapshot.recent_issue_ids.len() > RECENT_LIMIT {
        violations.push(Violation::RecentTooLong {
            len: snapshot.recent_issue_ids.len(),
        });
    }
    for id in &snapshot.recent_issue_ids {
        if !snapshot.issues.contains_key(id) {
            violations.push(Violation::UnknownRecent {
                issue_id: id.clone(),
            });
        }
    }
}
