//! Core data types for tracker-lib.
//!
//! Field names serialize in camelCase so a persisted snapshot mirrors the
//! in-memory shape one to one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Workflow status name. Each project defines its own ordered list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    pub const TO_DO: &'static str = "To Do";
    pub const IN_PROGRESS: &'static str = "In Progress";
    pub const IN_REVIEW: &'static str = "In Review";
    pub const DONE: &'static str = "Done";

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The four-column workflow every seeded project uses.
    #[must_use]
    pub fn default_workflow() -> Vec<Self> {
        [Self::TO_DO, Self::IN_PROGRESS, Self::IN_REVIEW, Self::DONE]
            .into_iter()
            .map(Self::new)
            .collect()
    }
}

impl Borrow<str> for Status {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issue priority, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Priority {
    Highest,
    High,
    #[default]
    Medium,
    Low,
    Lowest,
}

impl Priority {
    pub const ALL: [Self; 5] = [
        Self::Highest,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Lowest,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Highest => "Highest",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Lowest => "Lowest",
        }
    }

    /// 0 for Highest through 4 for Lowest.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Highest => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Lowest => 4,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "highest" | "p0" | "0" => Ok(Self::Highest),
            "high" | "p1" | "1" => Ok(Self::High),
            "medium" | "p2" | "2" => Ok(Self::Medium),
            "low" | "p3" | "3" => Ok(Self::Low),
            "lowest" | "p4" | "4" => Ok(Self::Lowest),
            _ => Err(TrackerError::InvalidPriority {
                priority: s.to_string(),
            }),
        }
    }
}

/// Issue type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IssueType {
    #[default]
    Task,
    Bug,
    Story,
    Epic,
}

impl IssueType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Bug => "Bug",
            Self::Story => "Story",
            Self::Epic => "Epic",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            "story" => Ok(Self::Story),
            "epic" => Ok(Self::Epic),
            _ => Err(TrackerError::InvalidType {
                issue_type: s.to_string(),
            }),
        }
    }
}

/// Relation carried by an issue link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    #[serde(rename = "blocks")]
    Blocks,
    #[serde(rename = "is blocked by")]
    IsBlockedBy,
    #[serde(rename = "relates to")]
    RelatesTo,
    #[serde(rename = "duplicates")]
    Duplicates,
    #[serde(rename = "is duplicated by")]
    IsDuplicatedBy,
}

impl LinkType {
    pub const ALL: [Self; 5] = [
        Self::Blocks,
        Self::IsBlockedBy,
        Self::RelatesTo,
        Self::Duplicates,
        Self::IsDuplicatedBy,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::IsBlockedBy => "is blocked by",
            Self::RelatesTo => "relates to",
            Self::Duplicates => "duplicates",
            Self::IsDuplicatedBy => "is duplicated by",
        }
    }

    /// The relation as seen from the other end of the link.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Blocks => Self::IsBlockedBy,
            Self::IsBlockedBy => Self::Blocks,
            Self::RelatesTo => Self::RelatesTo,
            Self::Duplicates => Self::IsDuplicatedBy,
            Self::IsDuplicatedBy => Self::Duplicates,
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "blocks" => Ok(Self::Blocks),
            "is blocked by" | "blocked by" => Ok(Self::IsBlockedBy),
            "relates to" | "relates" | "related" => Ok(Self::RelatesTo),
            "duplicates" => Ok(Self::Duplicates),
            "is duplicated by" | "duplicated by" => Ok(Self::IsDuplicatedBy),
            _ => Err(TrackerError::InvalidLinkType {
                link_type: s.to_string(),
            }),
        }
    }
}

/// A person who can report, be assigned, or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Owner of projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A project and its workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,

    /// Short key issue keys derive from (e.g., "WEB").
    pub key: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    pub lead_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default)]
    pub members: Vec<String>,

    /// Ordered workflow columns; never empty.
    pub statuses: Vec<Status>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub starred: bool,
}

impl Project {
    #[must_use]
    pub fn has_status(&self, status: &str) -> bool {
        self.statuses.iter().any(|s| s.as_str() == status)
    }

    #[must_use]
    pub fn first_status(&self) -> Option<&Status> {
        self.statuses.first()
    }
}

/// A comment on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// One directed edge of a bidirectional issue relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
    pub id: String,
    pub target_issue_id: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The primary issue entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Unique ID (e.g., "i_web_1").
    pub id: String,

    /// Human key (e.g., "WEB-1").
    pub key: String,

    pub project_id: String,

    #[serde(rename = "type")]
    pub issue_type: IssueType,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Always one of the owning project's statuses.
    pub status: Status,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    pub reporter_id: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Story points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<u32>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub links: Vec<IssueLink>,
}

impl Default for Issue {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            key: String::new(),
            project_id: String::new(),
            issue_type: IssueType::default(),
            title: String::new(),
            description: None,
            status: Status::new(Status::TO_DO),
            priority: Priority::default(),
            assignee_id: None,
            reporter_id: String::new(),
            tags: Vec::new(),
            estimate: None,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl Issue {
    /// Links on this issue that point at `target_id`.
    pub fn links_to<'a>(&'a self, target_id: &'a str) -> impl Iterator<Item = &'a IssueLink> + 'a {
        self.links
            .iter()
            .filter(move |link| link.target_issue_id == target_id)
    }
}

/// A time-boxed batch of issues within one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub issue_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub active: bool,
}

/// An in-app notification, kept newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_inverse_is_an_involution() {
        for link_type in LinkType::ALL {
            assert_eq!(link_type.inverse().inverse(), link_type);
        }
        assert_eq!(LinkType::RelatesTo.inverse(), LinkType::RelatesTo);
        assert_eq!(LinkType::Blocks.inverse(), LinkType::IsBlockedBy);
        assert_eq!(LinkType::Duplicates.inverse(), LinkType::IsDuplicatedBy);
    }

    #[test]
    fn link_type_parses_spaced_and_dashed_forms() {
        assert_eq!("is blocked by".parse::<LinkType>().unwrap(), LinkType::IsBlockedBy);
        assert_eq!("is-blocked-by".parse::<LinkType>().unwrap(), LinkType::IsBlockedBy);
        assert_eq!("Relates_To".parse::<LinkType>().unwrap(), LinkType::RelatesTo);
        assert!("supersedes".parse::<LinkType>().is_err());
    }

    #[test]
    fn link_type_serializes_with_human_names() {
        let json = serde_json::to_string(&LinkType::IsDuplicatedBy).unwrap();
        assert_eq!(json, "\"is duplicated by\"");
    }

    #[test]
    fn priority_parses_names_and_ranks() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("P0".parse::<Priority>().unwrap(), Priority::Highest);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(TrackerError::InvalidPriority { .. })
        ));
        assert!(Priority::Highest < Priority::Lowest);
    }

    #[test]
    fn issue_type_rejects_unknown() {
        assert_eq!("story".parse::<IssueType>().unwrap(), IssueType::Story);
        assert!(matches!(
            "chore".parse::<IssueType>(),
            Err(TrackerError::InvalidType { .. })
        ));
    }

    #[test]
    fn status_is_a_plain_json_string() {
        let status = Status::new(Status::IN_REVIEW);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"In Review\"");
        let back: Status = serde_json::from_str("\"Done\"").unwrap();
        assert_eq!(back.as_str(), Status::DONE);
    }

    #[test]
    fn issue_uses_camel_case_fields() {
        let issue = Issue {
            id: "i_web_9".into(),
            key: "WEB-9".into(),
            project_id: "p_web".into(),
            reporter_id: "u_alex".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["projectId"], "p_web");
        assert_eq!(value["reporterId"], "u_alex");
        assert_eq!(value["type"], "Task");
        assert!(value.get("assigneeId").is_none());
    }
}
