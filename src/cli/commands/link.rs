//! Link commands: add, remove and list.
//!
//! Both directions of a relationship are written together; see
//! `tracker_lib::links`.

use tracker_lib::{LinkType, Result, TrackerError};

use super::{open_store, print_json, require_issue};
use crate::cli::LinkSubcommand;
use crate::config::Config;
use crate::format::LinkedIssue;

/// Execute a link subcommand.
///
/// # Errors
///
/// Returns an error if an issue or link is unknown, the link type does not
/// parse, or the link would duplicate or point at its own issue.
pub fn execute(command: LinkSubcommand, config: &Config, json: bool) -> Result<()> {
    match command {
        LinkSubcommand::Add {
            source,
            target,
            link_type,
            note,
        } => add(&source, &target, &link_type, note, config, json),
        LinkSubcommand::Remove { source, link_id } => remove(&source, &link_id, config, json),
        LinkSubcommand::List { id } => list(&id, config, json),
    }
}

fn add(
    source_ref: &str,
    target_ref: &str,
    link_type: &str,
    note: Option<String>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let link_type: LinkType = link_type.parse()?;
    let mut store = open_store(config);
    let source = require_issue(store.snapshot(), source_ref)?;
    let source_id = source.id.clone();
    let source_key = source.key.clone();

    let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    let link = store.add_link(&source_id, target_ref, link_type, note)?;
    let resolved = LinkedIssue::resolve(&link, store.snapshot());

    if json {
        return print_json(&resolved);
    }
    println!(
        "Linked {source_key} {} {} [{}]",
        link.link_type,
        resolved.target_key.as_deref().unwrap_or(&link.target_issue_id),
        link.id
    );
    Ok(())
}

fn remove(source_ref: &str, link_id: &str, config: &Config, json: bool) -> Result<()> {
    let mut store = open_store(config);
    let source = require_issue(store.snapshot(), source_ref)?;
    let link = source
        .links
        .iter()
        .find(|link| link.id == link_id.trim())
        .cloned()
        .ok_or_else(|| TrackerError::LinkNotFound {
            id: link_id.trim().to_string(),
        })?;
    let source_id = source.id.clone();
    let source_key = source.key.clone();

    let removed = store.remove_link(&link.id, &source_id, &link.target_issue_id, link.link_type)?;

    if json {
        return print_json(&removed);
    }
    println!("Removed link {} from {source_key}", removed.id);
    Ok(())
}

fn list(reference: &str, config: &Config, json: bool) -> Result<()> {
    let store = open_store(config);
    let snapshot = store.snapshot();
    let issue = require_issue(snapshot, reference)?;

    let linked: Vec<LinkedIssue> = issue
        .links
        .iter()
        .map(|link| LinkedIssue::resolve(link, snapshot))
        .collect();

    if json {
        return print_json(&linked);
    }
    if linked.is_empty() {
        println!("{} has no links.", issue.key);
        return Ok(());
    }
    println!("{} {}", issue.key, issue.title);
    for link in &linked {
        let target = link.target_key.as_deref().unwrap_or(&link.target_issue_id);
        let title = link.target_title.as_deref().unwrap_or("(missing)");
        println!("  [{}] {} {target} {title}", link.link_id, link.link_type);
    }
    println!("\n{} link(s)", linked.len());
    Ok(())
}
