//! Data Models
//!
//! This module contains the core data structures used throughout Structree:
//!
//! - `Structure` - A named forest of labeled nodes owned by one user
//! - `Node` - One persisted, identifier-addressed vertex of a structure
//! - `StructureInput` / `NodeSpec` - The label-addressed submission shape
//! - `UserContext` - The caller identity threaded into every service call

mod context;
mod structure;
mod submission;

pub use context::UserContext;
pub use structure::{Node, Structure, ValidationError, MAX_LABEL_LENGTH};
pub use submission::{label_specs_from_nodes, NodeSpec, StructureInput};
