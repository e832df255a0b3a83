//! Error types for `tracker-lib`.
//!
//! Soft no-ops (a command naming an entity that does not exist) are not
//! errors; they surface as an unchanged snapshot. Everything here is either a
//! reported user error or a persistence failure.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for tracker-lib operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    // === Entity Errors ===
    /// Issue with the specified ID was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    /// Project with the specified ID was not found.
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    // === Link Errors ===
    /// Link target reference matched neither an issue ID nor an issue key.
    #[error("Link target not found: {reference}")]
    LinkTargetNotFound { reference: String },

    /// Attempted to link an issue to itself.
    #[error("Cannot link an issue to itself: {id}")]
    SelfLink { id: String },

    /// The source already carries a link of this type to the target.
    #[error("Link already exists: {source_id} {link_type} {target_id}")]
    DuplicateLink {
        source_id: String,
        target_id: String,
        link_type: String,
    },

    /// Neither the link nor its reciprocal could be found.
    #[error("Link not found: {id}")]
    LinkNotFound { id: String },

    /// A multi-step mutation was abandoned before anything was committed.
    #[error("Transaction aborted: {reason}")]
    TransactionAborted { reason: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Invalid status value for the project.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Invalid priority name.
    #[error("Invalid priority: {priority}")]
    InvalidPriority { priority: String },

    /// Invalid issue type value.
    #[error("Invalid issue type: {issue_type}")]
    InvalidType { issue_type: String },

    /// Invalid link relation name.
    #[error("Invalid link type: {link_type}")]
    InvalidLinkType { link_type: String },

    // === Snapshot Errors ===
    /// Persisted value is not a usable snapshot.
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    // === Workspace Errors ===
    /// A saved state already exists where `init` would write one.
    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === Storage Errors ===
    /// Generic storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl TrackerError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `TrackerError`.
pub type Result<T> = std::result::Result<T, TrackerError>;
