//! Stats command implementation.

use tracker_lib::Result;

use super::{open_store, print_json};
use crate::config::Config;
use crate::format::{Statistics, pad_to_width};

/// Print aggregate counts over the whole snapshot.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let store = open_store(config);
    let stats = Statistics::from_snapshot(store.snapshot());

    if json {
        return print_json(&stats);
    }

    println!("Projects: {}", stats.projects);
    println!("Issues:   {}", stats.issues);
    print_breakdown("By project", &stats.by_project);
    print_breakdown("By status", &stats.by_status);
    print_breakdown("By priority", &stats.by_priority);
    print_breakdown("By type", &stats.by_type);
    println!("\nLinks: {}  Comments: {}", stats.links, stats.comments);
    println!("Unread notifications: {}", stats.unread_notifications);
    Ok(())
}

fn print_breakdown(title: &str, counts: &std::collections::BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    println!("\n{title}:");
    for (name, count) in counts {
        println!("  {} {count}", pad_to_width(name, 12));
    }
}
