//! Read-side queries over a snapshot.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::TrackerError;
use crate::model::{Issue, IssueLink, IssueType, Notification, Priority, Project, Sprint, Status};
use crate::snapshot::Snapshot;
use crate::util::parse_issue_key;

/// Sort order for issue listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IssueSort {
    /// Priority ascending (Highest first), then oldest first.
    #[default]
    Priority,
    Created,
    Updated,
    /// Project key, then issue number.
    Key,
    /// Case-insensitive title.
    Title,
}

impl FromStr for IssueSort {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "priority" | "prio" | "p" => Ok(Self::Priority),
            "created" | "created_at" | "createdat" | "age" => Ok(Self::Created),
            "updated" | "updated_at" | "updatedat" | "modified" => Ok(Self::Updated),
            "key" | "id" | "number" => Ok(Self::Key),
            "title" | "name" => Ok(Self::Title),
            other => Err(TrackerError::validation(
                "sort",
                format!("unknown sort field '{other}' (expected priority, created, updated, key or title)"),
            )),
        }
    }
}

/// Filter options for listing issues.
#[derive(Debug, Clone, Default)]
pub struct IssueFilters {
    /// Only issues of this project id.
    pub project_id: Option<String>,
    pub statuses: Option<Vec<Status>>,
    pub priorities: Option<Vec<Priority>>,
    pub types: Option<Vec<IssueType>>,
    pub assignee_id: Option<String>,
    pub unassigned: bool,
    /// All listed tags must be present.
    pub tags: Option<Vec<String>>,
    /// Case-insensitive substring of key, title or description.
    pub text: Option<String>,
    pub limit: Option<usize>,
    pub sort: IssueSort,
    pub reverse: bool,
}

impl IssueFilters {
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(ref project_id) = self.project_id {
            if issue.project_id != *project_id {
                return false;
            }
        }

        if let Some(ref statuses) = self.statuses {
            if !statuses.contains(&issue.status) {
                return false;
            }
        }

        if let Some(ref priorities) = self.priorities {
            if !priorities.contains(&issue.priority) {
                return false;
            }
        }

        if let Some(ref types) = self.types {
            if !types.contains(&issue.issue_type) {
                return false;
            }
        }

        if self.unassigned && issue.assignee_id.is_some() {
            return false;
        }
        if let Some(ref assignee) = self.assignee_id {
            if issue.assignee_id.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }

        if let Some(ref tags) = self.tags {
            if !tags.iter().all(|tag| issue.tags.contains(tag)) {
                return false;
            }
        }

        if let Some(ref text) = self.text {
            let needle = text.to_lowercase();
            let hit = issue.key.to_lowercase().contains(&needle)
                || issue.title.to_lowercase().contains(&needle)
                || issue
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        true
    }
}

fn compare_keys(a: &Issue, b: &Issue) -> Ordering {
    match (parse_issue_key(&a.key), parse_issue_key(&b.key)) {
        (Some((pa, na)), Some((pb, nb))) => pa.cmp(pb).then(na.cmp(&nb)),
        _ => a.key.cmp(&b.key),
    }
}

/// Sort `issues` in place.
pub fn sort_issues(issues: &mut [&Issue], sort: IssueSort, reverse: bool) {
    match sort {
        IssueSort::Priority => issues.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.created_at.cmp(&b.created_at))
                .then_with(|| compare_keys(a, b))
        }),
        IssueSort::Created => issues.sort_by_key(|a| a.created_at),
        IssueSort::Updated => issues.sort_by_key(|a| a.updated_at),
        IssueSort::Key => issues.sort_by(|a, b| compare_keys(a, b)),
        IssueSort::Title => issues.sort_by_key(|a| a.title.to_lowercase()),
    }

    if reverse {
        issues.reverse();
    }
}

/// One board column with its issues in display order.
#[derive(Debug, Clone)]
pub struct BoardColumnView<'a> {
    pub status: &'a Status,
    pub issues: Vec<&'a Issue>,
}

/// A link on an issue paired with the issue it points at, if that still exists.
#[derive(Debug, Clone)]
pub struct LinkedIssueView<'a> {
    pub link: &'a IssueLink,
    pub issue: Option<&'a Issue>,
}

impl Snapshot {
    #[must_use]
    pub fn list_issues(&self, filters: &IssueFilters) -> Vec<&Issue> {
        let mut results: Vec<&Issue> = self
            .issues
            .values()
            .filter(|issue| filters.matches(issue))
            .collect();

        sort_issues(&mut results, filters.sort, filters.reverse);

        if let Some(limit) = filters.limit {
            results.truncate(limit);
        }

        results
    }

    #[must_use]
    pub fn count_issues(&self, filters: &IssueFilters) -> usize {
        self.issues.values().filter(|issue| filters.matches(issue)).count()
    }

    /// Columns of a project in workflow order, issues in board order.
    ///
    /// Returns an empty list for an unknown project.
    #[must_use]
    pub fn board_columns(&self, project_id: &str) -> Vec<BoardColumnView<'_>> {
        let Some(project) = self.project(project_id) else {
            return Vec::new();
        };
        project
            .statuses
            .iter()
            .map(|status| BoardColumnView {
                status,
                issues: self
                    .board_order
                    .column(project_id, status.as_str())
                    .iter()
                    .filter_map(|id| self.issues.get(id))
                    .collect(),
            })
            .collect()
    }

    /// Recently created issues, newest first.
    #[must_use]
    pub fn recent_issues(&self) -> Vec<&Issue> {
        self.recent_issue_ids
            .iter()
            .filter_map(|id| self.issues.get(id))
            .collect()
    }

    #[must_use]
    pub fn starred_projects(&self) -> Vec<&Project> {
        self.projects.values().filter(|p| p.starred).collect()
    }

    #[must_use]
    pub fn unread_notifications(&self) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| !n.read).collect()
    }

    /// The active sprint of a project (first by id if several are flagged).
    #[must_use]
    pub fn active_sprint(&self, project_id: &str) -> Option<&Sprint> {
        self.sprints
            .values()
            .find(|s| s.active && s.project_id == project_id)
    }

    /// Issues of a sprint in sprint order; ids of deleted issues are skipped.
    #[must_use]
    pub fn sprint_issues(&self, sprint_id: &str) -> Vec<&Issue> {
        self.sprints.get(sprint_id).map_or_else(Vec::new, |sprint| {
            sprint
                .issue_ids
                .iter()
                .filter_map(|id| self.issues.get(id))
                .collect()
        })
    }

    #[must_use]
    pub fn linked_issues(&self, issue_id: &str) -> Vec<LinkedIssueView<'_>> {
        self.issues.get(issue_id).map_or_else(Vec::new, |issue| {
            issue
                .links
                .iter()
                .map(|link| LinkedIssueView {
                    link,
                    issue: self.issues.get(&link.target_issue_id),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_snapshot;

    fn ids(issues: &[&Issue]) -> Vec<String> {
        issues.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_list_filters_by_project_and_status() {
        let snapshot = seed_snapshot();
        let filters = IssueFilters {
            project_id: Some("p_web".into()),
            statuses: Some(vec![Status::new(Status::TO_DO), Status::new(Status::DONE)]),
            sort: IssueSort::Key,
            ..Default::default()
        };
        assert_eq!(ids(&snapshot.list_issues(&filters)), ["i_web_1", "i_web_4"]);
        assert_eq!(snapshot.count_issues(&filters), 2);
    }

    #[test]
    fn test_default_sort_is_priority() {
        let snapshot = seed_snapshot();
        let all = snapshot.list_issues(&IssueFilters::default());
        assert_eq!(all[0].id, "i_app_1");
        assert_eq!(all.last().unwrap().id, "i_web_3");
    }

    #[test]
    fn test_tags_must_all_match() {
        let snapshot = seed_snapshot();
        let filters = IssueFilters {
            tags: Some(vec!["frontend".into(), "marketing".into()]),
            ..Default::default()
        };
        assert_eq!(ids(&snapshot.list_issues(&filters)), ["i_web_1"]);
        let filters = IssueFilters {
            tags: Some(vec!["frontend".into(), "perf".into()]),
            ..Default::default()
        };
        assert!(snapshot.list_issues(&filters).is_empty());
    }

    #[test]
    fn test_text_search_covers_key_and_title() {
        let snapshot = seed_snapshot();
        let by_title = IssueFilters {
            text: Some("LIGHTHOUSE".into()),
            ..Default::default()
        };
        assert_eq!(ids(&snapshot.list_issues(&by_title)), ["i_web_2"]);
        let by_key = IssueFilters {
            text: Some("app-1".into()),
            ..Default::default()
        };
        assert_eq!(ids(&snapshot.list_issues(&by_key)), ["i_app_1"]);
    }

    #[test]
    fn test_assignee_and_limit() {
        let snapshot = seed_snapshot();
        let filters = IssueFilters {
            assignee_id: Some("u_alex".into()),
            sort: IssueSort::Key,
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(ids(&snapshot.list_issues(&filters)), ["i_web_1"]);
        let unassigned = IssueFilters {
            unassigned: true,
            ..Default::default()
        };
        assert!(snapshot.list_issues(&unassigned).is_empty());
    }

    #[test]
    fn test_sort_aliases() {
        assert_eq!("created_at".parse::<IssueSort>().unwrap(), IssueSort::Created);
        assert_eq!("Updated".parse::<IssueSort>().unwrap(), IssueSort::Updated);
        assert_eq!("id".parse::<IssueSort>().unwrap(), IssueSort::Key);
        assert!("colour".parse::<IssueSort>().is_err());
    }

    #[test]
    fn test_key_sort_is_numeric() {
        let mut snapshot = seed_snapshot();
        let mut tenth = snapshot.issues["i_web_1"].clone();
        tenth.id = "i_web_10".into();
        tenth.key = "WEB-10".into();
        snapshot.issues.insert(tenth.id.clone(), tenth);
        let filters = IssueFilters {
            project_id: Some("p_web".into()),
            sort: IssueSort::Key,
            reverse: true,
            ..Default::default()
        };
        assert_eq!(snapshot.list_issues(&filters)[0].key, "WEB-10");
    }

    #[test]
    fn test_board_columns_follow_workflow_order() {
        let snapshot = seed_snapshot();
        let columns = snapshot.board_columns("p_web");
        let names: Vec<&str> = columns.iter().map(|c| c.status.as_str()).collect();
        assert_eq!(names, [Status::TO_DO, Status::IN_PROGRESS, Status::IN_REVIEW, Status::DONE]);
        assert_eq!(columns[1].issues[0].id, "i_web_2");
        assert!(snapshot.board_columns("p_missing").is_empty());
    }

    #[test]
    fn test_recent_starred_unread() {
        let snapshot = seed_snapshot();
        assert_eq!(ids(&snapshot.recent_issues()), ["i_web_2", "i_web_3", "i_web_4"]);
        let starred: Vec<&str> = snapshot.starred_projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(starred, ["p_web"]);
        assert_eq!(snapshot.unread_notifications().len(), 2);
    }

    #[test]
    fn test_sprints() {
        let snapshot = seed_snapshot();
        let sprint = snapshot.active_sprint("p_web").unwrap();
        assert_eq!(sprint.id, "s_web_1");
        assert_eq!(ids(&snapshot.sprint_issues("s_web_1")), ["i_web_1", "i_web_2", "i_web_3"]);
        assert!(snapshot.active_sprint("p_app").is_none());
        assert!(snapshot.sprint_issues("s_nope").is_empty());
    }

    #[test]
    fn test_linked_issues() {
        let snapshot = seed_snapshot();
        let linked = snapshot.linked_issues("i_web_2");
        assert_eq!(linked.len(), 2);
        assert_eq!(linked[0].issue.map(|i| i.key.as_str()), Some("WEB-1"));
        assert_eq!(linked[1].link.link_type, crate::model::LinkType::RelatesTo);
    }
}
