//! Service Layer Error Types
//!
//! Every `StructureService` operation returns one of three outcomes on
//! failure: the submission was invalid, the structure is not visible to the
//! caller, or persistence failed (any open transaction was rolled back).

use crate::db::DatabaseError;
use crate::models::ValidationError;
use std::fmt;
use thiserror::Error;

/// What the service was doing when the database failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceAction {
    /// Create or update
    Save,
    /// List, get, tree or edit form
    Load,
    Delete,
}

impl PersistenceAction {
    /// Generic message shown to callers; internal detail is only logged
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Save => "Failed to save structure.",
            Self::Load => "Failed to load structure.",
            Self::Delete => "Failed to delete structure.",
        }
    }
}

impl fmt::Display for PersistenceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Save => f.write_str("save"),
            Self::Load => f.write_str("load"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Structure service errors
#[derive(Error, Debug)]
pub enum StructureServiceError {
    /// Structure does not exist or is owned by someone else
    #[error("Structure not found: {id}")]
    NotFound { id: String },

    /// Submission rejected before any mutation
    #[error("{0}")]
    ValidationFailed(#[from] ValidationError),

    /// Database operation failed
    #[error("Persistence failed during {action}: {source}")]
    PersistenceFailed {
        action: PersistenceAction,
        #[source]
        source: DatabaseError,
    },
}

/// Database errors raised on the write path (the reconciler) are saves
impl From<DatabaseError> for StructureServiceError {
    fn from(source: DatabaseError) -> Self {
        Self::persistence(PersistenceAction::Save, source)
    }
}

impl StructureServiceError {
    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a persistence error for `action`
    pub fn persistence(action: PersistenceAction, source: DatabaseError) -> Self {
        Self::PersistenceFailed { action, source }
    }

    /// Message safe to show to the end user
    ///
    /// Validation messages pass through verbatim; persistence details are
    /// replaced by a generic message for the failed action.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "Structure not found.".to_string(),
            Self::ValidationFailed(e) => e.to_string(),
            Self::PersistenceFailed { action, .. } => action.user_message().to_string(),
        }
    }
}
