//! Link consistency manager.
//!
//! Issue relationships are stored as a pair of edges, one on each issue, whose
//! types are inverses of each other. Adding or removing a relationship touches
//! both issues; the two `UpdateIssue` commands are planned together as a
//! [`LinkTransaction`] and committed against one working snapshot, so either
//! both edges change or neither does.

use chrono::{DateTime, Utc};

use crate::command::{self, Command, IssuePatch};
use crate::error::{Result, TrackerError};
use crate::model::{IssueLink, LinkType};
use crate::snapshot::Snapshot;

/// Suffix appended to a link id to form its reciprocal's id.
pub const RECIPROCAL_SUFFIX: &str = "_r";

/// A planned link mutation spanning the two linked issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTransaction {
    /// The link on the source issue (added or removed).
    pub link: IssueLink,
    /// `UpdateIssue` commands to apply, in order.
    pub commands: Vec<Command>,
}

impl LinkTransaction {
    /// Apply every planned command to `state`.
    ///
    /// # Errors
    ///
    /// Returns `TransactionAborted` if any step is skipped; nothing from the
    /// transaction is kept in that case.
    pub fn commit(&self, state: &Snapshot, now: DateTime<Utc>) -> Result<Snapshot> {
        let mut working = state.clone();
        for cmd in &self.commands {
            working = command::transition(&working, cmd.clone(), now).map_err(|skipped| {
                TrackerError::TransactionAborted {
                    reason: skipped.to_string(),
                }
            })?;
        }
        Ok(working)
    }
}

/// Plan a new relationship from `source_id` to the issue `target_ref` names.
///
/// `target_ref` is an issue id or a case-insensitive issue key. `link_id` must
/// be unused; the reciprocal is stored as `{link_id}_r`.
///
/// # Errors
///
/// Returns `IssueNotFound` for an unknown source, `LinkTargetNotFound` when the
/// reference resolves to nothing, `SelfLink` when it resolves to the source,
/// and `DuplicateLink` when the source already has this relation to the target.
pub fn plan_add(
    state: &Snapshot,
    source_id: &str,
    target_ref: &str,
    link_type: LinkType,
    note: Option<String>,
    link_id: String,
) -> Result<LinkTransaction> {
    let source = state
        .issue(source_id)
        .ok_or_else(|| TrackerError::IssueNotFound {
            id: source_id.to_string(),
        })?;
    let target = state
        .resolve_issue_ref(target_ref)
        .ok_or_else(|| TrackerError::LinkTargetNotFound {
            reference: target_ref.trim().to_string(),
        })?;

    if target.id == source.id {
        return Err(TrackerError::SelfLink {
            id: source.id.clone(),
        });
    }
    if source
        .links_to(&target.id)
        .any(|link| link.link_type == link_type)
    {
        return Err(TrackerError::DuplicateLink {
            source_id: source.id.clone(),
            target_id: target.id.clone(),
            link_type: link_type.to_string(),
        });
    }

    let note = note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let link = IssueLink {
        id: link_id.clone(),
        target_issue_id: target.id.clone(),
        link_type,
        note: note.clone(),
    };
    let reciprocal = IssueLink {
        id: format!("{link_id}{RECIPROCAL_SUFFIX}"),
        target_issue_id: source.id.clone(),
        link_type: link_type.inverse(),
        note,
    };

    let mut source_links = source.links.clone();
    source_links.push(link.clone());
    let mut target_links = target.links.clone();
    target_links.push(reciprocal);

    Ok(LinkTransaction {
        link,
        commands: vec![
            Command::UpdateIssue {
                id: source.id.clone(),
                patch: IssuePatch::links(source_links),
            },
            Command::UpdateIssue {
                id: target.id.clone(),
                patch: IssuePatch::links(target_links),
            },
        ],
    })
}

/// Plan removal of link `link_id` from `source_id` and of its reciprocal.
///
/// `target_id` and `link_type` must agree with the stored link. The
/// reciprocal is found on the target by direction and inverse type, not by
/// id. If the target issue no longer exists only the source side changes.
///
/// # Errors
///
/// Returns `IssueNotFound` for an unknown source, `LinkNotFound` when the
/// source carries no link `link_id`, and `Validation` when the stored link
/// points elsewhere or has another type.
pub fn plan_remove(
    state: &Snapshot,
    link_id: &str,
    source_id: &str,
    target_id: &str,
    link_type: LinkType,
) -> Result<LinkTransaction> {
    let source = state
        .issue(source_id)
        .ok_or_else(|| TrackerError::IssueNotFound {
            id: source_id.to_string(),
        })?;

    let removed = source
        .links
        .iter()
        .find(|link| link.id == link_id)
        .cloned()
        .ok_or_else(|| TrackerError::LinkNotFound {
            id: link_id.to_string(),
        })?;
    if removed.target_issue_id != target_id {
        return Err(TrackerError::validation(
            "target_id",
            format!(
                "link {link_id} points at {}, not {target_id}",
                removed.target_issue_id
            ),
        ));
    }
    if removed.link_type != link_type {
        return Err(TrackerError::validation(
            "link_type",
            format!("link {link_id} is '{}', not '{link_type}'", removed.link_type),
        ));
    }

    let source_links: Vec<IssueLink> = source
        .links
        .iter()
        .filter(|link| link.id != link_id)
        .cloned()
        .collect();
    let mut commands = vec![Command::UpdateIssue {
        id: source.id.clone(),
        patch: IssuePatch::links(source_links),
    }];

    let inverse = link_type.inverse();
    match state.issue(target_id) {
        Some(target) => {
            let kept: Vec<IssueLink> = target
                .links
                .iter()
                .filter(|link| !(link.target_issue_id == source.id && link.link_type == inverse))
                .cloned()
                .collect();
            if kept.len() != target.links.len() {
                commands.push(Command::UpdateIssue {
                    id: target.id.clone(),
                    patch: IssuePatch::links(kept),
                });
            }
        }
        None => {
            tracing::debug!(source = %source.id, target = %target_id, "link target gone; removing source side only");
        }
    }

    Ok(LinkTransaction {
        link: removed,
        commands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_snapshot;

    fn unlinked_seed() -> Snapshot {
        let mut state = seed_snapshot();
        for issue in state.issues.values_mut() {
            issue.links.clear();
        }
        state
    }

    fn add(state: &Snapshot, source: &str, target: &str, link_type: LinkType) -> Result<Snapshot> {
        plan_add(state, source, target, link_type, None, "l_test".into())?
            .commit(state, Utc::now())
    }

    #[test]
    fn add_by_key_creates_reciprocal_pair() {
        let state = unlinked_seed();
        let next = add(&state, "i_web_1", "WEB-2", LinkType::IsBlockedBy).unwrap();

        let source_links = &next.issues["i_web_1"].links;
        assert_eq!(source_links.len(), 1);
        assert_eq!(source_links[0].link_type, LinkType::IsBlockedBy);
        assert_eq!(source_links[0].target_issue_id, "i_web_2");

        let target_links = &next.issues["i_web_2"].links;
        assert_eq!(target_links.len(), 1);
        assert_eq!(target_links[0].link_type, LinkType::Blocks);
        assert_eq!(target_links[0].target_issue_id, "i_web_1");
        assert_eq!(target_links[0].id, "l_test_r");
    }

    #[test]
    fn key_lookup_ignores_case() {
        let state = unlinked_seed();
        let next = add(&state, "i_web_1", "app-1", LinkType::RelatesTo).unwrap();
        assert_eq!(next.issues["i_app_1"].links[0].link_type, LinkType::RelatesTo);
    }

    #[test]
    fn self_link_is_rejected() {
        let state = seed_snapshot();
        let err = add(&state, "i_web_1", "i_web_1", LinkType::RelatesTo).unwrap_err();
        assert!(matches!(err, TrackerError::SelfLink { .. }));
        let err = add(&state, "i_web_1", "web-1", LinkType::RelatesTo).unwrap_err();
        assert!(matches!(err, TrackerError::SelfLink { .. }));
    }

    #[test]
    fn unresolvable_target_is_rejected() {
        let state = seed_snapshot();
        let err = add(&state, "i_web_1", "WEB-99", LinkType::Blocks).unwrap_err();
        assert!(matches!(err, TrackerError::LinkTargetNotFound { ref reference } if reference == "WEB-99"));
    }

    #[test]
    fn duplicate_relation_is_rejected() {
        let state = seed_snapshot();
        let err = add(&state, "i_web_1", "WEB-2", LinkType::IsBlockedBy).unwrap_err();
        assert!(matches!(err, TrackerError::DuplicateLink { .. }));
        // A different relation to the same target is fine.
        assert!(add(&state, "i_web_1", "WEB-2", LinkType::RelatesTo).is_ok());
    }

    #[test]
    fn blank_note_is_dropped() {
        let state = unlinked_seed();
        let tx = plan_add(
            &state,
            "i_web_1",
            "i_web_3",
            LinkType::Duplicates,
            Some("   ".into()),
            "l_n".into(),
        )
        .unwrap();
        assert_eq!(tx.link.note, None);
    }

    #[test]
    fn remove_drops_both_sides() {
        let state = seed_snapshot();
        let next = plan_remove(
            &state,
            "l_web1_from_web2",
            "i_web_1",
            "i_web_2",
            LinkType::IsBlockedBy,
        )
        .unwrap()
        .commit(&state, Utc::now())
        .unwrap();
        assert!(next.issues["i_web_1"].links.is_empty());
        let remaining: Vec<_> = next.issues["i_web_2"]
            .links
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(remaining, ["l_web2_rel_app1"]);
    }

    #[test]
    fn remove_with_missing_target_cleans_source() {
        let mut state = seed_snapshot();
        state.issues.remove("i_web_2");
        let tx = plan_remove(
            &state,
            "l_web1_from_web2",
            "i_web_1",
            "i_web_2",
            LinkType::IsBlockedBy,
        )
        .unwrap();
        assert_eq!(tx.commands.len(), 1);
        let next = tx.commit(&state, Utc::now()).unwrap();
        assert!(next.issues["i_web_1"].links.is_empty());
    }

    #[test]
    fn remove_unknown_link_is_reported() {
        let state = unlinked_seed();
        let err = plan_remove(&state, "l_nope", "i_web_1", "i_web_2", LinkType::Blocks).unwrap_err();
        assert!(matches!(err, TrackerError::LinkNotFound { .. }));
    }

    #[test]
    fn remove_unknown_id_leaves_reciprocal_alone() {
        let state = unlinked_seed();
        let state = add(&state, "i_web_3", "i_app_1", LinkType::Blocks).unwrap();

        let err = plan_remove(&state, "l_bogus", "i_web_3", "i_app_1", LinkType::Blocks).unwrap_err();
        assert!(matches!(err, TrackerError::LinkNotFound { ref id } if id == "l_bogus"));
        assert_eq!(state.issues["i_app_1"].links.len(), 1);
    }

    #[test]
    fn remove_with_wrong_type_or_target_is_rejected() {
        let state = unlinked_seed();
        let state = add(&state, "i_web_3", "i_app_1", LinkType::Blocks).unwrap();

        let err = plan_remove(&state, "l_test", "i_web_3", "i_app_1", LinkType::RelatesTo).unwrap_err();
        assert!(matches!(err, TrackerError::Validation { ref field, .. } if field == "link_type"));

        let err = plan_remove(&state, "l_test", "i_web_3", "i_web_4", LinkType::Blocks).unwrap_err();
        assert!(matches!(err, TrackerError::Validation { ref field, .. } if field == "target_id"));

        let next = plan_remove(&state, "l_test", "i_web_3", "i_app_1", LinkType::Blocks)
            .unwrap()
            .commit(&state, Utc::now())
            .unwrap();
        assert!(next.issues["i_web_3"].links.is_empty());
        assert!(next.issues["i_app_1"].links.is_empty());
        assert!(crate::validation::check_snapshot(&next).is_empty());
    }

    #[test]
    fn aborted_commit_keeps_nothing() {
        let state = unlinked_seed();
        let tx = plan_add(&state, "i_web_1", "i_web_2", LinkType::Blocks, None, "l_a".into()).unwrap();
        let mut stale = state.clone();
        stale.issues.remove("i_web_2");
        let err = tx.commit(&stale, Utc::now()).unwrap_err();
        assert!(matches!(err, TrackerError::TransactionAborted { .. }));
    }
}
