//! Store facade.
//!
//! Owns the current snapshot and the persistence port. Every mutation goes
//! through the command processor; an applied command is saved immediately,
//! a skipped one is neither applied nor saved.

use chrono::{DateTime, Utc};

use crate::command::{self, Command, IssuePatch};
use crate::error::{Result, TrackerError};
use crate::links;
use crate::model::{Comment, Issue, IssueLink, IssueType, LinkType, Notification, Priority, Status};
use crate::persist::{MemoryStorage, PersistencePort};
use crate::seed::seed_snapshot;
use crate::snapshot::Snapshot;
use crate::util::{generate_id, next_issue_identity};
use crate::validation::{IssueValidator, Violation, check_snapshot};

/// Caller input for a new issue. Id, key and timestamps are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    /// Project id or key.
    pub project: String,
    pub title: String,
    pub description: Option<String>,
    pub issue_type: IssueType,
    /// Defaults to the project's first status.
    pub status: Option<Status>,
    pub priority: Priority,
    pub assignee_id: Option<String>,
    pub reporter_id: String,
    pub tags: Vec<String>,
    pub estimate: Option<u32>,
}

/// The application store.
#[derive(Debug)]
pub struct Store {
    state: Snapshot,
    port: PersistencePort,
}

impl Store {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Load from `port`, falling back to the bundled seed data.
    #[must_use]
    pub fn open(port: PersistencePort) -> Self {
        Self::open_with_seed(port, seed_snapshot)
    }

    /// Load from `port`, falling back to `seed()`.
    #[must_use]
    pub fn open_with_seed(port: PersistencePort, seed: impl FnOnce() -> Snapshot) -> Self {
        let state = port.load_or_seed(seed);
        Self { state, port }
    }

    /// A store over process-local storage, starting from the seed.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(PersistencePort::new(MemoryStorage::new()))
    }

    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Apply `command` now. Returns `false` for a soft no-op.
    pub fn dispatch(&mut self, command: Command) -> bool {
        self.apply(command, Utc::now())
    }

    fn apply(&mut self, command: Command, now: DateTime<Utc>) -> bool {
        match command::transition(&self.state, command, now) {
            Ok(next) => {
                self.state = next;
                self.port.save(&self.state);
                true
            }
            Err(_) => false,
        }
    }

    /// Validate `input`, assign the next id and key of its project, and insert it.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` for an unknown project and `Validation` /
    /// `ValidationErrors` for bad fields.
    pub fn create_issue(&mut self, input: NewIssue) -> Result<Issue> {
        let project = self
            .state
            .resolve_project_ref(&input.project)
            .ok_or_else(|| TrackerError::ProjectNotFound {
                id: input.project.trim().to_string(),
            })?;
        IssueValidator::validate_new(&self.state, project, &input)
            .map_err(TrackerError::from_validation_errors)?;

        let status = match input.status {
            Some(status) => status,
            None => project
                .first_status()
                .cloned()
                .ok_or_else(|| TrackerError::validation("status", "project has no statuses"))?,
        };
        let identity = next_issue_identity(&self.state, project);
        let now = Utc::now();

        let mut tags: Vec<String> = Vec::with_capacity(input.tags.len());
        for tag in input.tags.iter().map(|t| t.trim()) {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        let issue = Issue {
            id: identity.id,
            key: identity.key,
            project_id: project.id.clone(),
            issue_type: input.issue_type,
            title: input.title.trim().to_string(),
            description: input.description.filter(|d| !d.trim().is_empty()),
            status,
            priority: input.priority,
            assignee_id: input.assignee_id,
            reporter_id: input.reporter_id,
            tags,
            estimate: input.estimate,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            links: Vec::new(),
        };

        let next = command::transition(&self.state, Command::CreateIssue(issue.clone()), now)
            .map_err(|skipped| TrackerError::TransactionAborted {
                reason: skipped.to_string(),
            })?;
        self.state = next;
        self.port.save(&self.state);
        tracing::info!(id = %issue.id, key = %issue.key, "created issue");
        Ok(issue)
    }

    pub fn update_issue(&mut self, id: &str, patch: IssuePatch) -> bool {
        self.dispatch(Command::UpdateIssue {
            id: id.to_string(),
            patch,
        })
    }

    pub fn move_issue(
        &mut self,
        project_id: &str,
        issue_id: &str,
        to_status: Status,
        to_index: Option<usize>,
    ) -> bool {
        self.dispatch(Command::MoveIssue {
            project_id: project_id.to_string(),
            issue_id: issue_id.to_string(),
            to_status,
            to_index,
        })
    }

    pub fn star_project(&mut self, project_id: &str, starred: bool) -> bool {
        self.dispatch(Command::StarProject {
            project_id: project_id.to_string(),
            starred,
        })
    }

    /// Post a new unread notification at the top of the list.
    pub fn notify(&mut self, title: &str, body: Option<String>) -> Notification {
        let now = Utc::now();
        let id = generate_id("n", title, now, |id| self.state.notification(id).is_some());
        let notification = Notification {
            id,
            title: title.to_string(),
            body: body.filter(|b| !b.trim().is_empty()),
            read: false,
            created_at: now,
        };
        self.apply(Command::AddNotification(notification.clone()), now);
        notification
    }

    pub fn mark_notification_read(&mut self, id: &str, read: bool) -> bool {
        self.dispatch(Command::MarkNotificationRead {
            id: id.to_string(),
            read,
        })
    }

    /// Append a comment to an issue.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` for an unknown issue and `Validation` for an
    /// empty body or unknown author.
    pub fn add_comment(&mut self, issue_id: &str, author_id: &str, body: &str) -> Result<Comment> {
        let issue = self
            .state
            .issue(issue_id)
            .ok_or_else(|| TrackerError::IssueNotFound {
                id: issue_id.to_string(),
            })?;
        if body.trim().is_empty() {
            return Err(TrackerError::validation("body", "cannot be empty"));
        }
        if self.state.user(author_id).is_none() {
            return Err(TrackerError::validation(
                "author_id",
                format!("unknown user '{author_id}'"),
            ));
        }

        let now = Utc::now();
        let comment = Comment {
            id: generate_id("c", body, now, |id| issue.comments.iter().any(|c| c.id == id)),
            author_id: author_id.to_string(),
            body: body.trim().to_string(),
            created_at: now,
        };
        let mut comments = issue.comments.clone();
        comments.push(comment.clone());

        let patch = IssuePatch {
            comments: Some(comments),
            ..IssuePatch::default()
        };
        if self.apply(
            Command::UpdateIssue {
                id: issue_id.to_string(),
                patch,
            },
            now,
        ) {
            Ok(comment)
        } else {
            Err(TrackerError::IssueNotFound {
                id: issue_id.to_string(),
            })
        }
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Link `source_id` to the issue `target_ref` names, with a reciprocal.
    ///
    /// # Errors
    ///
    /// See [`links::plan_add`]; the snapshot is unchanged on error.
    pub fn add_link(
        &mut self,
        source_id: &str,
        target_ref: &str,
        link_type: LinkType,
        note: Option<String>,
    ) -> Result<IssueLink> {
        let now = Utc::now();
        let content = format!("{source_id}|{}|{link_type}", target_ref.trim());
        let link_id = generate_id("l", &content, now, |id| {
            let reciprocal = format!("{id}{}", links::RECIPROCAL_SUFFIX);
            self.state
                .link_ids()
                .any(|existing| existing == id || existing == reciprocal)
        });

        let tx = links::plan_add(&self.state, source_id, target_ref, link_type, note, link_id)?;
        self.state = tx.commit(&self.state, now)?;
        self.port.save(&self.state);
        tracing::info!(
            link = %tx.link.id,
            source = %source_id,
            target = %tx.link.target_issue_id,
            link_type = %link_type,
            "added link"
        );
        Ok(tx.link)
    }

    /// Remove link `link_id` from `source_id` and its reciprocal from `target_id`.
    ///
    /// # Errors
    ///
    /// See [`links::plan_remove`]; the snapshot is unchanged on error.
    pub fn remove_link(
        &mut self,
        link_id: &str,
        source_id: &str,
        target_id: &str,
        link_type: LinkType,
    ) -> Result<IssueLink> {
        let tx = links::plan_remove(&self.state, link_id, source_id, target_id, link_type)?;
        self.state = tx.commit(&self.state, Utc::now())?;
        self.port.save(&self.state);
        tracing::info!(link = %link_id, source = %source_id, target = %target_id, "removed link");
        Ok(tx.link)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    #[must_use]
    pub fn check(&self) -> Vec<Violation> {
        check_snapshot(&self.state)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::in_memory()
    }
}
