use std::collections::BTreeMap;

use serde::Serialize;
use tracker_lib::{Issue, IssueLink, LinkType, Snapshot};

/// A link resolved against the issue it points at.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedIssue {
    pub link_id: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub target_issue_id: String,
    /// `None` when the target no longer exists.
    pub target_key: Option<String>,
    pub target_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LinkedIssue {
    #[must_use]
    pub fn resolve(link: &IssueLink, snapshot: &Snapshot) -> Self {
        let target = snapshot.issue(&link.target_issue_id);
        Self {
            link_id: link.id.clone(),
            link_type: link.link_type,
            target_issue_id: link.target_issue_id.clone(),
            target_key: target.map(|t| t.key.clone()),
            target_title: target.map(|t| t.title.clone()),
            note: link.note.clone(),
        }
    }
}

/// Issue details with names and links resolved, for the show view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDetails {
    #[serde(flatten)]
    pub issue: Issue,
    pub project_key: Option<String>,
    pub assignee_name: Option<String>,
    pub reporter_name: Option<String>,
    pub linked: Vec<LinkedIssue>,
}

impl IssueDetails {
    #[must_use]
    pub fn build(issue: &Issue, snapshot: &Snapshot) -> Self {
        let name_of = |id: &str| snapshot.user(id).map(|u| u.name.clone());
        Self {
            issue: issue.clone(),
            project_key: snapshot.project(&issue.project_id).map(|p| p.key.clone()),
            assignee_name: issue.assignee_id.as_deref().and_then(name_of),
            reporter_name: name_of(&issue.reporter_id),
            linked: issue
                .links
                .iter()
                .map(|link| LinkedIssue::resolve(link, snapshot))
                .collect(),
        }
    }
}

/// One column of a project board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: String,
    pub issues: Vec<Issue>,
}

/// Aggregate statistics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub projects: usize,
    pub issues: usize,
    pub by_project: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    /// Relationships, each counted once (reciprocal edges are not double counted).
    pub links: usize,
    pub comments: usize,
    pub unread_notifications: usize,
}

impl Statistics {
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut stats = Self {
            projects: snapshot.projects.len(),
            issues: snapshot.issues.len(),
            unread_notifications: snapshot.unread_notifications().len(),
            ..Self::default()
        };
        let mut edges = 0;
        for issue in snapshot.issues.values() {
            let project = snapshot
                .project(&issue.project_id)
                .map_or_else(|| issue.project_id.clone(), |p| p.key.clone());
            *stats.by_project.entry(project).or_default() += 1;
            *stats.by_status.entry(issue.status.to_string()).or_default() += 1;
            *stats
                .by_priority
                .entry(issue.priority.to_string())
                .or_default() += 1;
            *stats.by_type.entry(issue.issue_type.to_string()).or_default() += 1;
            edges += issue.links.len();
            stats.comments += issue.comments.len();
        }
        stats.links = edges.div_ceil(2);
        stats
    }
}
