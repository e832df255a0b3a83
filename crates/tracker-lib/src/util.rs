//! Identifier and key generation.
//!
//! Issue ids and keys come from a per-project counter so `WEB-7` is followed by
//! `WEB-8` regardless of how fast issues are created. Everything else (links,
//! comments, notifications) gets a short content hash checked against the ids
//! already in use.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::model::Project;
use crate::snapshot::Snapshot;

const HASH_LENGTH: usize = 8;

// ============================================================================
// Issue ids and keys
// ============================================================================

/// Allocated identity for a new issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueIdentity {
    pub id: String,
    pub key: String,
    pub number: u64,
}

/// Split `WEB-12` into `("WEB", 12)`.
#[must_use]
pub fn parse_issue_key(key: &str) -> Option<(&str, u64)> {
    let (prefix, number) = key.rsplit_once('-')?;
    if prefix.is_empty() || number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok().map(|n| (prefix, n))
}

#[must_use]
pub fn issue_key(project_key: &str, number: u64) -> String {
    format!("{}-{number}", project_key.to_uppercase())
}

#[must_use]
pub fn issue_id(project_key: &str, number: u64) -> String {
    format!("i_{}_{number}", project_key.to_lowercase())
}

/// Allocate the next id and key for an issue in `project`.
///
/// Starts one past the highest number used by the project's keys and steps
/// forward until neither the id nor the key is taken anywhere in the snapshot.
/// A key numbered `u64::MAX` has no successor and does not move the counter.
#[must_use]
pub fn next_issue_identity(snapshot: &Snapshot, project: &Project) -> IssueIdentity {
    let mut number = snapshot
        .issues
        .values()
        .filter(|issue| issue.project_id == project.id)
        .filter_map(|issue| parse_issue_key(&issue.key))
        .filter(|(prefix, _)| prefix.eq_ignore_ascii_case(&project.key))
        .filter_map(|(_, n)| n.checked_add(1))
        .max()
        .unwrap_or(1);

    loop {
        let id = issue_id(&project.key, number);
        let key = issue_key(&project.key, number);
        let key_taken = snapshot
            .issues
            .values()
            .any(|issue| issue.key.eq_ignore_ascii_case(&key));
        if !snapshot.issues.contains_key(&id) && !key_taken {
            return IssueIdentity { id, key, number };
        }
        number = number.checked_add(1).unwrap_or(1);
    }
}

// ============================================================================
// Hash ids
// ============================================================================

/// Generate `{prefix}_{hash}` for the given content, avoiding ids for which
/// `exists` returns true.
///
/// Uses SHA256 hashing with base36 encoding; the nonce is bumped on collision.
pub fn generate_id<F>(prefix: &str, content: &str, created_at: DateTime<Utc>, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut nonce = 0u32;
    loop {
        let seed = generate_id_seed(content, created_at, nonce);
        let id = format!("{prefix}_{}", compute_id_hash(&seed, HASH_LENGTH));
        if !exists(&id) {
            return id;
        }
        nonce += 1;
    }
}

fn generate_id_seed(content: &str, created_at: DateTime<Utc>, nonce: u32) -> String {
    format!(
        "{}|{}|{}",
        content,
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    )
}

fn compute_id_hash(input: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();

    let mut num = 0u64;
    for &byte in result.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let mut encoded = base36_encode(num);
    if encoded.len() < length {
        encoded = format!("{encoded:0>length$}");
    }
    encoded.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.iter().rev().collect()
}
