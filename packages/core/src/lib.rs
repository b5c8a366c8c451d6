//! Structree Core Business Logic Layer
//!
//! This crate provides the data management, reconciliation and tree
//! building for Structree, a store of named hierarchies ("structures") of
//! labelled nodes owned by individual users.
//!
//! # Architecture
//!
//! - **Label-addressed edits**: clients submit nodes whose parents are
//!   referenced by label; the reconciler assigns identifiers and links them
//! - **Atomic replace**: create and update run in a single transaction
//! - **libsql/Turso**: Embedded SQLite-compatible database
//!
//! # Modules
//!
//! - [`models`] - Data structures (Structure, Node, StructureInput, etc.)
//! - [`tree`] - Flat records to display tree conversion
//! - [`services`] - Business services (StructureService, reconciler)
//! - [`db`] - Database layer with libsql integration

pub mod db;
pub mod models;
pub mod services;
pub mod tree;

// Re-export commonly used types
pub use models::*;
pub use services::*;
pub use tree::*;
