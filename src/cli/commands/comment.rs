//! Comment command implementation.

use tracker_lib::Result;

use super::{open_store, print_json, require_actor, require_issue};
use crate::config::Config;

/// Append a comment to an issue.
///
/// # Errors
///
/// Returns an error if the issue is unknown, the body is empty, or no known
/// author can be determined.
pub fn execute(
    reference: &str,
    body: &str,
    author: Option<String>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let mut store = open_store(config);
    let issue = require_issue(store.snapshot(), reference)?;
    let issue_id = issue.id.clone();
    let key = issue.key.clone();
    let author_id = require_actor(author, config, "author")?;

    let comment = store.add_comment(&issue_id, &author_id, body)?;

    if json {
        return print_json(&comment);
    }
    println!("Comment added to {key} [{}]", comment.id);
    Ok(())
}
