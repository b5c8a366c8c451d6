//! Database Layer
//!
//! This module handles all database interactions using libsql:
//!
//! - Database initialization and connection management (`DatabaseService`)
//! - The `StructureStore` / `StoreTransaction` persistence seam
//! - `TursoStore`, the libsql implementation of that seam

mod database;
mod error;
mod structure_store;
mod turso_store;

pub use database::DatabaseService;
pub use error::DatabaseError;
pub use structure_store::{StoreTransaction, StructureStore};
pub use turso_store::{TursoStore, TursoTransaction};
