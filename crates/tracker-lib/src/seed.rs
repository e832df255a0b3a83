//! Built-in demo dataset used when no saved state exists.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use crate::board::BoardOrder;
use crate::model::{
    Issue, IssueLink, IssueType, LinkType, Notification, Organization, Priority, Project, Sprint,
    Status, User,
};
use crate::snapshot::Snapshot;

fn user(id: &str, name: &str, handle: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{handle}@example.com"),
        avatar_url: Some(format!("/avatar-{handle}.png")),
    }
}

fn project(id: &str, key: &str, name: &str, lead: &str, color: &str, members: &[&str]) -> Project {
    Project {
        id: id.to_string(),
        key: key.to_string(),
        name: name.to_string(),
        description: None,
        organization_id: Some("o_acme".to_string()),
        lead_id: lead.to_string(),
        color: Some(color.to_string()),
        members: members.iter().map(ToString::to_string).collect(),
        statuses: Status::default_workflow(),
        starred: false,
    }
}

fn link(id: &str, target: &str, link_type: LinkType, note: &str) -> IssueLink {
    IssueLink {
        id: id.to_string(),
        target_issue_id: target.to_string(),
        link_type,
        note: Some(note.to_string()),
    }
}

struct SeedIssue<'a> {
    id: &'a str,
    key: &'a str,
    project: &'a str,
    issue_type: IssueType,
    title: &'a str,
    status: &'a str,
    priority: Priority,
    assignee: &'a str,
    reporter: &'a str,
    tags: &'a [&'a str],
    estimate: u32,
    links: Vec<IssueLink>,
}

impl SeedIssue<'_> {
    fn build(self) -> Issue {
        let now = Utc::now();
        Issue {
            id: self.id.to_string(),
            key: self.key.to_string(),
            project_id: self.project.to_string(),
            issue_type: self.issue_type,
            title: self.title.to_string(),
            description: None,
            status: Status::new(self.status),
            priority: self.priority,
            assignee_id: Some(self.assignee.to_string()),
            reporter_id: self.reporter.to_string(),
            tags: self.tags.iter().map(ToString::to_string).collect(),
            estimate: Some(self.estimate),
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            links: self.links,
        }
    }
}

/// The demo workspace: three users, two projects, five issues with two
/// reciprocal link pairs, two sprints and two unread notifications.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn seed_snapshot() -> Snapshot {
    let now = Utc::now();

    let users: BTreeMap<String, User> = [
        user("u_alex", "Alex Kim", "alex"),
        user("u_jordan", "Jordan Lee", "jordan"),
        user("u_sam", "Sam Patel", "sam"),
    ]
    .into_iter()
    .map(|u| (u.id.clone(), u))
    .collect();

    let organizations = BTreeMap::from([(
        "o_acme".to_string(),
        Organization {
            id: "o_acme".to_string(),
            name: "Acme".to_string(),
            slug: Some("acme".to_string()),
            description: None,
        },
    )]);

    let mut web = project(
        "p_web",
        "WEB",
        "Website Revamp",
        "u_alex",
        "#7C3AED",
        &["u_alex", "u_jordan", "u_sam"],
    );
    web.starred = true;
    let app = project(
        "p_app",
        "APP",
        "Mobile App",
        "u_jordan",
        "#059669",
        &["u_alex", "u_jordan"],
    );
    let projects: BTreeMap<String, Project> = [web, app]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    let issues: BTreeMap<String, Issue> = [
        SeedIssue {
            id: "i_web_1",
            key: "WEB-1",
            project: "p_web",
            issue_type: IssueType::Story,
            title: "Build new landing page hero",
            status: Status::TO_DO,
            priority: Priority::High,
            assignee: "u_alex",
            reporter: "u_jordan",
            tags: &["frontend", "marketing"],
            estimate: 3,
            links: vec![link(
                "l_web1_from_web2",
                "i_web_2",
                LinkType::IsBlockedBy,
                "Waiting for performance fix",
            )],
        },
        SeedIssue {
            id: "i_web_2",
            key: "WEB-2",
            project: "p_web",
            issue_type: IssueType::Bug,
            title: "Fix lighthouse performance drop",
            status: Status::IN_PROGRESS,
            priority: Priority::Medium,
            assignee: "u_sam",
            reporter: "u_alex",
            tags: &["perf"],
            estimate: 5,
            links: vec![
                link(
                    "l_web2_to_web1",
                    "i_web_1",
                    LinkType::Blocks,
                    "Perf regression blocks hero launch",
                ),
                link(
                    "l_web2_rel_app1",
                    "i_app_1",
                    LinkType::RelatesTo,
                    "Similar metrics in app",
                ),
            ],
        },
        SeedIssue {
            id: "i_web_3",
            key: "WEB-3",
            project: "p_web",
            issue_type: IssueType::Task,
            title: "Add analytics events",
            status: Status::IN_REVIEW,
            priority: Priority::Low,
            assignee: "u_jordan",
            reporter: "u_alex",
            tags: &["analytics"],
            estimate: 2,
            links: Vec::new(),
        },
        SeedIssue {
            id: "i_web_4",
            key: "WEB-4",
            project: "p_web",
            issue_type: IssueType::Bug,
            title: "404 page broken on nested routes",
            status: Status::DONE,
            priority: Priority::High,
            assignee: "u_alex",
            reporter: "u_alex",
            tags: &["routing"],
            estimate: 1,
            links: Vec::new(),
        },
        SeedIssue {
            id: "i_app_1",
            key: "APP-1",
            project: "p_app",
            issue_type: IssueType::Story,
            title: "Implement login with email code",
            status: Status::TO_DO,
            priority: Priority::Highest,
            assignee: "u_jordan",
            reporter: "u_jordan",
            tags: &["auth"],
            estimate: 8,
            links: vec![link(
                "l_app1_rel_web2",
                "i_web_2",
                LinkType::RelatesTo,
                "Cross-platform perf considerations",
            )],
        },
    ]
    .into_iter()
    .map(SeedIssue::build)
    .map(|issue| (issue.id.clone(), issue))
    .collect();

    let sprints = BTreeMap::from([
        (
            "s_web_1".to_string(),
            Sprint {
                id: "s_web_1".to_string(),
                project_id: "p_web".to_string(),
                name: "Sprint 1".to_string(),
                goal: Some("Ship MVP hero and fix critical bugs".to_string()),
                start_date: Some(now - Duration::days(7)),
                end_date: Some(now + Duration::days(7)),
                issue_ids: vec!["i_web_1".into(), "i_web_2".into(), "i_web_3".into()],
                active: true,
            },
        ),
        (
            "s_web_2".to_string(),
            Sprint {
                id: "s_web_2".to_string(),
                project_id: "p_web".to_string(),
                name: "Sprint 2".to_string(),
                goal: Some("Analytics & SEO".to_string()),
                start_date: None,
                end_date: None,
                issue_ids: Vec::new(),
                active: false,
            },
        ),
    ]);

    let board_order = BoardOrder::build(projects.values(), issues.values());

    let notifications = vec![
        Notification {
            id: "n1".to_string(),
            title: "Alex mentioned you on WEB-2".to_string(),
            body: Some("Can you check the CLS?".to_string()),
            read: false,
            created_at: now,
        },
        Notification {
            id: "n2".to_string(),
            title: "Sprint 1 ends in 7 days".to_string(),
            body: None,
            read: false,
            created_at: now,
        },
    ];

    Snapshot {
        users,
        organizations,
        projects,
        issues,
        sprints,
        board_order,
        recent_issue_ids: vec!["i_web_2".into(), "i_web_3".into(), "i_web_4".into()],
        notifications,
    }
}
