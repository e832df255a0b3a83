//! Notification commands: add, list and read.

use tracker_lib::{Notification, Result, TrackerError};

use super::{open_store, print_json};
use crate::cli::NotifySubcommand;
use crate::config::Config;
use crate::format::format_timestamp;

/// Execute a notify subcommand.
///
/// # Errors
///
/// Returns an error if the title is empty or a notification id is unknown.
pub fn execute(command: NotifySubcommand, config: &Config, json: bool) -> Result<()> {
    match command {
        NotifySubcommand::Add { title, body } => add(&title, body, config, json),
        NotifySubcommand::List { all } => list(all, config, json),
        NotifySubcommand::Read { id, unread } => read(&id, !unread, config, json),
    }
}

fn add(title: &str, body: Option<String>, config: &Config, json: bool) -> Result<()> {
    if title.trim().is_empty() {
        return Err(TrackerError::validation("title", "cannot be empty"));
    }
    let mut store = open_store(config);
    let notification = store.notify(title.trim(), body);

    if json {
        return print_json(&notification);
    }
    println!("Notification {} posted", notification.id);
    Ok(())
}

fn list(all: bool, config: &Config, json: bool) -> Result<()> {
    let store = open_store(config);
    let snapshot = store.snapshot();
    let notifications: Vec<&Notification> = if all {
        snapshot.notifications.iter().collect()
    } else {
        snapshot.unread_notifications()
    };

    if json {
        return print_json(&notifications);
    }
    if notifications.is_empty() {
        println!("No notifications.");
        return Ok(());
    }
    for notification in &notifications {
        let marker = if notification.read { " " } else { "*" };
        println!(
            "{marker} [{}] {} {}",
            notification.id,
            format_timestamp(notification.created_at),
            notification.title
        );
        if let Some(body) = &notification.body {
            println!("    {body}");
        }
    }
    Ok(())
}

fn read(id: &str, read: bool, config: &Config, json: bool) -> Result<()> {
    let mut store = open_store(config);
    let id = id.trim();
    if !store.mark_notification_read(id, read) {
        return Err(TrackerError::validation(
            "id",
            format!("no notification '{id}'"),
        ));
    }

    if json {
        if let Some(notification) = store.snapshot().notification(id) {
            return print_json(notification);
        }
        return Ok(());
    }
    let state = if read { "read" } else { "unread" };
    println!("Marked {id} as {state}");
    Ok(())
}
