//! Caller identity
//!
//! The identity collaborator resolves a request to a user; the core only
//! needs the resulting user id. It is passed explicitly into every
//! `StructureService` call instead of being looked up from ambient state.

use serde::{Deserialize, Serialize};

/// Identity of the user on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserContext {
    /// Owner id stored on every structure this user creates
    pub user_id: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
