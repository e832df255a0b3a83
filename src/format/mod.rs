//! Output formatting for `trk`.
//!
//! Supports both human-readable text output and machine-parseable JSON
//! (`--json`). JSON goes to stdout; diagnostics always go to stderr.
//!
//! # JSON Output Types
//!
//! - [`IssueDetails`] - Issue with resolved names and links (show)
//! - [`LinkedIssue`] - One link with its target summarized (show, link list)
//! - [`BoardColumn`] - One status column (board)
//! - [`Statistics`] - Aggregate counts (stats)

mod output;
mod text;

pub use output::{BoardColumn, IssueDetails, LinkedIssue, Statistics};
pub use text::{
    format_issue_line, format_issue_line_width, format_priority, format_status_icon,
    format_timestamp, format_type_badge, pad_to_width, truncate_to_width,
};
