//! Property tests: random operation sequences never break the store's
//! consistency rules.

use proptest::prelude::*;
use tracker_lib::persist::{decode_snapshot, encode_snapshot};
use tracker_lib::{IssuePatch, LinkType, NewIssue, Status, Store};

#[derive(Debug, Clone)]
enum Op {
    Create { project: usize, status: usize, title: String },
    Move { issue: usize, status: usize, index: Option<usize> },
    SetStatus { issue: usize, status: usize },
    Link { source: usize, target: usize, link_type: usize },
    Unlink { issue: usize, link: usize },
    Notify { title: String },
    MarkRead { notification: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..2usize, 0..4usize, "[a-z]{1,12}").prop_map(|(project, status, title)| Op::Create {
            project,
            status,
            title
        }),
        (0..64usize, 0..4usize, proptest::option::of(0..8usize))
            .prop_map(|(issue, status, index)| Op::Move { issue, status, index }),
        (0..64usize, 0..4usize).prop_map(|(issue, status)| Op::SetStatus { issue, status }),
        (0..64usize, 0..64usize, 0..5usize).prop_map(|(source, target, link_type)| Op::Link {
            source,
            target,
            link_type
        }),
        (0..64usize, 0..8usize).prop_map(|(issue, link)| Op::Unlink { issue, link }),
        "[a-z ]{1,16}".prop_map(|title| Op::Notify { title }),
        (0..8usize).prop_map(|notification| Op::MarkRead { notification }),
    ]
}

fn nth<T>(items: &[T], n: usize) -> Option<&T> {
    if items.is_empty() {
        None
    } else {
        items.get(n % items.len())
    }
}

fn apply(store: &mut Store, op: Op) {
    let issue_ids: Vec<String> = store.snapshot().issues.keys().cloned().collect();
    match op {
        Op::Create {
            project,
            status,
            title,
        } => {
            let project = ["p_web", "p_app"][project];
            let statuses = store.snapshot().projects[project].statuses.clone();
            let _ = store.create_issue(NewIssue {
                project: project.to_string(),
                title,
                status: nth(&statuses, status).cloned(),
                reporter_id: "u_alex".to_string(),
                ..NewIssue::default()
            });
        }
        Op::Move {
            issue,
            status,
            index,
        } => {
            let Some(id) = nth(&issue_ids, issue) else {
                return;
            };
            let snapshot = store.snapshot();
            let project_id = snapshot.issues[id].project_id.clone();
            let statuses = snapshot.projects[&project_id].statuses.clone();
            if let Some(to) = nth(&statuses, status) {
                assert!(store.move_issue(&project_id, id, to.clone(), index));
            }
        }
        Op::SetStatus { issue, status } => {
            let Some(id) = nth(&issue_ids, issue) else {
                return;
            };
            let project_id = store.snapshot().issues[id].project_id.clone();
            let statuses = store.snapshot().projects[&project_id].statuses.clone();
            let patch = IssuePatch {
                status: nth(&statuses, status).cloned(),
                ..IssuePatch::default()
            };
            assert!(store.update_issue(id, patch));
        }
        Op::Link {
            source,
            target,
            link_type,
        } => {
            if let (Some(source), Some(target)) = (nth(&issue_ids, source), nth(&issue_ids, target)) {
                let _ = store.add_link(source, target, LinkType::ALL[link_type], None);
            }
        }
        Op::Unlink { issue, link } => {
            let Some(id) = nth(&issue_ids, issue) else {
                return;
            };
            let links = store.snapshot().issues[id].links.clone();
            if let Some(link) = nth(&links, link) {
                assert!(
                    store
                        .remove_link(&link.id, id, &link.target_issue_id, link.link_type)
                        .is_ok()
                );
            }
        }
        Op::Notify { title } => {
            store.notify(&title, None);
        }
        Op::MarkRead { notification } => {
            let ids: Vec<String> = store
                .snapshot()
                .notifications
                .iter()
                .map(|n| n.id.clone())
                .collect();
            if let Some(id) = nth(&ids, notification) {
                assert!(store.mark_notification_read(id, true));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_operations_keep_state_consistent(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let mut store = Store::in_memory();
        for op in ops {
            apply(&mut store, op);
            let violations = store.check();
            prop_assert!(violations.is_empty(), "violations: {:?}", violations);
        }

        let snapshot = store.snapshot();
        prop_assert!(snapshot.recent_issue_ids.len() <= tracker_lib::snapshot::RECENT_LIMIT);
        for project_id in snapshot.projects.keys() {
            let on_board = snapshot.board_order.issue_count(project_id);
            let owned = snapshot
                .issues
                .values()
                .filter(|issue| &issue.project_id == project_id)
                .count();
            prop_assert_eq!(on_board, owned);
        }
    }

    #[test]
    fn saved_state_reloads_identically(ops in proptest::collection::vec(op_strategy(), 0..20)) {
        let mut store = Store::in_memory();
        for op in ops {
            apply(&mut store, op);
        }
        let encoded = encode_snapshot(store.snapshot()).unwrap();
        let decoded = decode_snapshot(&encoded).unwrap();
        prop_assert_eq!(&decoded, store.snapshot());
    }
}

#[test]
fn recent_list_is_capped() {
    let mut store = Store::in_memory();
    for n in 0..30 {
        store
            .create_issue(NewIssue {
                project: "WEB".to_string(),
                title: format!("Issue {n}"),
                reporter_id: "u_alex".to_string(),
                ..NewIssue::default()
            })
            .unwrap();
    }
    let snapshot = store.snapshot();
    assert_eq!(snapshot.recent_issue_ids.len(), 20);
    assert_eq!(snapshot.recent_issues()[0].title, "Issue 29");
    assert_eq!(
        snapshot.board_order.column("p_web", Status::TO_DO).len(),
        31
    );
}
