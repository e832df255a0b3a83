//! Board order index.
//!
//! Per project, per status, the ordered issue ids shown in each board column.
//! For every project the columns partition exactly the ids of the issues that
//! belong to it: each issue id sits in exactly one column, the one named by
//! the issue's `status`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Issue, Project, Status};

/// Columns of a single project, keyed by status.
pub type ProjectBoard = BTreeMap<Status, Vec<String>>;

/// Project id -> status -> ordered issue ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardOrder(BTreeMap<String, ProjectBoard>);

impl BoardOrder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from entity maps.
    ///
    /// Every project gets an (initially empty) column per status; issues are
    /// appended to their column in iteration order. Issues whose project is
    /// not in `projects` are left out.
    pub fn build<'a>(
        projects: impl IntoIterator<Item = &'a Project>,
        issues: impl IntoIterator<Item = &'a Issue>,
    ) -> Self {
        let mut board = Self::new();
        for project in projects {
            board.ensure_columns(project);
        }
        for issue in issues {
            match board.0.get_mut(&issue.project_id) {
                Some(columns) => columns
                    .entry(issue.status.clone())
                    .or_default()
                    .push(issue.id.clone()),
                None => {
                    tracing::warn!(
                        issue = %issue.id,
                        project = %issue.project_id,
                        "issue references unknown project; left off the board"
                    );
                }
            }
        }
        board
    }

    /// Make sure `project` has a column for each of its statuses.
    pub fn ensure_columns(&mut self, project: &Project) {
        let columns = self.0.entry(project.id.clone()).or_default();
        for status in &project.statuses {
            columns.entry(status.clone()).or_default();
        }
    }

    #[must_use]
    pub fn project(&self, project_id: &str) -> Option<&ProjectBoard> {
        self.0.get(project_id)
    }

    /// Project ids present in the index.
    pub fn project_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The ordered ids in one column; empty when the column does not exist.
    #[must_use]
    pub fn column(&self, project_id: &str, status: &str) -> &[String] {
        self.0
            .get(project_id)
            .and_then(|columns| columns.get(status))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find which column of `project_id` holds `issue_id`.
    #[must_use]
    pub fn locate(&self, project_id: &str, issue_id: &str) -> Option<&Status> {
        self.0.get(project_id).and_then(|columns| {
            columns
                .iter()
                .find(|(_, ids)| ids.iter().any(|id| id == issue_id))
                .map(|(status, _)| status)
        })
    }

    /// Put `issue_id` at the top of a column, creating the column if needed.
    pub fn insert_front(&mut self, project_id: &str, status: &Status, issue_id: &str) {
        self.0
            .entry(project_id.to_string())
            .or_default()
            .entry(status.clone())
            .or_default()
            .insert(0, issue_id.to_string());
    }

    /// Move `issue_id` to `to_status` at `to_index` (default: end of column).
    ///
    /// The index is clamped to the column length after the issue has been
    /// taken out of its current column, so moves within one column behave like
    /// a drag to the given slot. Returns the previous status, or `None` (and
    /// changes nothing) when the issue is not on this project's board.
    pub fn move_issue(
        &mut self,
        project_id: &str,
        issue_id: &str,
        to_status: &Status,
        to_index: Option<usize>,
    ) -> Option<Status> {
        let from_status = self.locate(project_id, issue_id)?.clone();
        let columns = self.0.get_mut(project_id)?;

        if let Some(ids) = columns.get_mut(&from_status) {
            ids.retain(|id| id != issue_id);
        }

        let target = columns.entry(to_status.clone()).or_default();
        let index = to_index.unwrap_or(target.len()).min(target.len());
        target.insert(index, issue_id.to_string());

        Some(from_status)
    }

    /// Total number of ids across all columns of a project.
    #[must_use]
    pub fn issue_count(&self, project_id: &str) -> usize {
        self.0
            .get(project_id)
            .map_or(0, |columns| columns.values().map(Vec::len).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            key: "WEB".to_string(),
            name: "Web".to_string(),
            description: None,
            organization_id: None,
            lead_id: "u_1".to_string(),
            color: None,
            members: vec![],
            statuses: Status::default_workflow(),
            starred: false,
        }
    }

    fn issue(id: &str, project_id: &str, status: &str) -> Issue {
        Issue {
            id: id.to_string(),
            project_id: project_id.to_string(),
            status: Status::new(status),
            ..Default::default()
        }
    }

    fn sample_board() -> BoardOrder {
        let projects = [project("p_web")];
        let issues = [
            issue("a", "p_web", Status::TO_DO),
            issue("b", "p_web", Status::TO_DO),
            issue("c", "p_web", Status::DONE),
        ];
        BoardOrder::build(&projects, &issues)
    }

    #[test]
    fn build_creates_every_column() {
        let board = sample_board();
        let columns = board.project("p_web").unwrap();
        assert_eq!(columns.len(), 4);
        assert_eq!(board.column("p_web", Status::TO_DO), ["a", "b"]);
        assert!(board.column("p_web", Status::IN_REVIEW).is_empty());
    }

    #[test]
    fn build_skips_issues_of_unknown_projects() {
        let projects = [project("p_web")];
        let issues = [issue("x", "p_gone", Status::TO_DO)];
        let board = BoardOrder::build(&projects, &issues);
        assert_eq!(board.issue_count("p_web"), 0);
        assert!(board.project("p_gone").is_none());
    }

    #[test]
    fn locate_finds_column() {
        let board = sample_board();
        assert_eq!(board.locate("p_web", "c").map(Status::as_str), Some(Status::DONE));
        assert!(board.locate("p_web", "zzz").is_none());
        assert!(board.locate("p_other", "a").is_none());
    }

    #[test]
    fn move_defaults_to_end_of_column() {
        let mut board = sample_board();
        let prev = board.move_issue("p_web", "a", &Status::new(Status::DONE), None);
        assert_eq!(prev.as_ref().map(Status::as_str), Some(Status::TO_DO));
        assert_eq!(board.column("p_web", Status::DONE), ["c", "a"]);
        assert_eq!(board.column("p_web", Status::TO_DO), ["b"]);
    }

    #[test]
    fn move_clamps_index() {
        let mut board = sample_board();
        board.move_issue("p_web", "a", &Status::new(Status::DONE), Some(99));
        assert_eq!(board.column("p_web", Status::DONE), ["c", "a"]);
        board.move_issue("p_web", "b", &Status::new(Status::DONE), Some(0));
        assert_eq!(board.column("p_web", Status::DONE), ["b", "c", "a"]);
    }

    #[test]
    fn move_within_column_reorders_without_duplicates() {
        let mut board = sample_board();
        board.move_issue("p_web", "b", &Status::new(Status::TO_DO), Some(0));
        assert_eq!(board.column("p_web", Status::TO_DO), ["b", "a"]);
        assert_eq!(board.issue_count("p_web"), 3);
    }

    #[test]
    fn move_of_unknown_issue_changes_nothing() {
        let mut board = sample_board();
        let before = board.clone();
        assert!(board
            .move_issue("p_web", "nope", &Status::new(Status::DONE), None)
            .is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn insert_front_prepends() {
        let mut board = sample_board();
        board.insert_front("p_web", &Status::new(Status::TO_DO), "d");
        assert_eq!(board.column("p_web", Status::TO_DO), ["d", "a", "b"]);
    }

    #[test]
    fn serializes_as_nested_maps() {
        let board = sample_board();
        let value = serde_json::to_value(&board).unwrap();
        assert_eq!(value["p_web"]["To Do"], serde_json::json!(["a", "b"]));
        let back: BoardOrder = serde_json::from_value(value).unwrap();
        assert_eq!(back, board);
    }
}
