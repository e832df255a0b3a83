//! The complete in-memory state of the store at one instant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::BoardOrder;
use crate::model::{Issue, Notification, Organization, Project, Sprint, User};

/// Maximum length of [`Snapshot::recent_issue_ids`].
pub const RECENT_LIMIT: usize = 20;

/// All entity maps plus the board order, recent ids and notifications.
///
/// `projects` and `issues` are required when deserializing; every other field
/// falls back to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub users: BTreeMap<String, User>,
    #[serde(default)]
    pub organizations: BTreeMap<String, Organization>,
    pub projects: BTreeMap<String, Project>,
    pub issues: BTreeMap<String, Issue>,
    #[serde(default)]
    pub sprints: BTreeMap<String, Sprint>,
    #[serde(default)]
    pub board_order: BoardOrder,
    /// Most recently created first, at most [`RECENT_LIMIT`] long.
    #[serde(default)]
    pub recent_issue_ids: Vec<String>,
    /// Newest first.
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn issue(&self, id: &str) -> Option<&Issue> {
        self.issues.get(id)
    }

    #[must_use]
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    #[must_use]
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    #[must_use]
    pub fn notification(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Resolve an issue reference: an exact id, else a case-insensitive key.
    ///
    /// Keys are not guaranteed unique; the first match in id order wins.
    #[must_use]
    pub fn resolve_issue_ref(&self, reference: &str) -> Option<&Issue> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        self.issues.get(reference).or_else(|| {
            self.issues
                .values()
                .find(|issue| issue.key.eq_ignore_ascii_case(reference))
        })
    }

    /// Resolve a project by id or (case-insensitive) key.
    #[must_use]
    pub fn resolve_project_ref(&self, reference: &str) -> Option<&Project> {
        let reference = reference.trim();
        self.projects.get(reference).or_else(|| {
            self.projects
                .values()
                .find(|project| project.key.eq_ignore_ascii_case(reference))
        })
    }

    /// Recompute the board order from the entity maps.
    pub fn rebuild_board_order(&mut self) {
        self.board_order = BoardOrder::build(self.projects.values(), self.issues.values());
    }

    /// Every link id currently attached to any issue.
    pub fn link_ids(&self) -> impl Iterator<Item = &str> {
        self.issues
            .values()
            .flat_map(|issue| issue.links.iter().map(|link| link.id.as_str()))
    }
}
