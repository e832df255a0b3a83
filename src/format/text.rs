//! Text formatting functions for `trk`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Status icons (○ ◐ ◑ ✓)
//! - Priority labels (P0-P4)
//! - Type badges ([bug], [story], etc.)
//! - Issue line formatting, truncated by display width

use chrono::{DateTime, Utc};
use tracker_lib::{Issue, IssueType, Priority, Status};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Status icon characters.
pub mod icons {
    /// Not started (hollow circle).
    pub const TO_DO: &str = "○";
    /// Active work (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Waiting on review (other half).
    pub const IN_REVIEW: &str = "◑";
    /// Completed (checkmark).
    pub const DONE: &str = "✓";
    /// Project-specific status.
    pub const CUSTOM: &str = "•";
}

/// Return the icon character for a status.
#[must_use]
pub fn format_status_icon(status: &Status) -> &'static str {
    match status.as_str() {
        Status::TO_DO => icons::TO_DO,
        Status::IN_PROGRESS => icons::IN_PROGRESS,
        Status::IN_REVIEW => icons::IN_REVIEW,
        Status::DONE => icons::DONE,
        _ => icons::CUSTOM,
    }
}

/// Format priority as "P0" (Highest) through "P4" (Lowest).
#[must_use]
pub fn format_priority(priority: Priority) -> String {
    format!("P{}", priority.rank())
}

/// Format issue type as a bracketed badge.
#[must_use]
pub fn format_type_badge(issue_type: IssueType) -> String {
    format!("[{}]", issue_type.as_str().to_lowercase())
}

/// Cut `text` to at most `max_width` terminal columns, ending in `…` when cut.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Right-pad `text` with spaces to `width` terminal columns.
#[must_use]
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = text.width();
    if current >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - current))
}

/// Minute-precision UTC timestamp for listings.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Format a single-line issue summary.
///
/// Format: `{icon} {key} [{priority}] [{type}] {title}`
#[must_use]
pub fn format_issue_line(issue: &Issue) -> String {
    format!(
        "{} {} [{}] {} {}",
        format_status_icon(&issue.status),
        issue.key,
        format_priority(issue.priority),
        format_type_badge(issue.issue_type),
        issue.title,
    )
}

/// Issue line cut to `max_width` columns.
#[must_use]
pub fn format_issue_line_width(issue: &Issue, max_width: usize) -> String {
    truncate_to_width(&format_issue_line(issue), max_width)
}
