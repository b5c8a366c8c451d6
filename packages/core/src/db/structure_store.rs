//! StructureStore Trait - Persistence Abstraction
//!
//! `StructureStore` is the seam between `StructureService` (business logic)
//! and the database. Reads and deletes are single calls; writes that must
//! be all-or-nothing go through a [`StoreTransaction`] obtained from
//! [`StructureStore::begin`].
//!
//! # Transactions
//!
//! A transaction is consumed by `commit` or `rollback`. Dropping one
//! without either leaves the database unchanged.
//!
//! # Examples
//!
//! ```rust,no_run
//! use structree_core::db::{DatabaseService, StructureStore, TursoStore};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Arc::new(DatabaseService::new(PathBuf::from("./data/structree.db")).await?);
//! let store: Arc<dyn StructureStore> = Arc::new(TursoStore::new(db));
//!
//! let mut tx = store.begin().await?;
//! let structure = tx.insert_structure("user-1", "Org chart").await?;
//! let ceo = tx.insert_node(&structure.id, "CEO", 0).await?;
//! let cto = tx.insert_node(&structure.id, "CTO", 1).await?;
//! tx.set_parent(&cto.id, &ceo.id).await?;
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```

use crate::db::DatabaseError;
use crate::models::{Node, Structure};
use async_trait::async_trait;

/// Read access, cascade delete and transaction factory for structures
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// across request handlers.
#[async_trait]
pub trait StructureStore: Send + Sync {
    /// All structures owned by `owner_id`, newest first, nodes included
    async fn list_structures(&self, owner_id: &str) -> Result<Vec<Structure>, DatabaseError>;

    /// One structure with its nodes
    ///
    /// Returns `Ok(None)` when the structure does not exist *or* belongs to
    /// another owner.
    async fn get_structure(
        &self,
        owner_id: &str,
        structure_id: &str,
    ) -> Result<Option<Structure>, DatabaseError>;

    /// Delete a structure and, by cascade, all of its nodes
    ///
    /// Returns `false` when nothing matched `(owner_id, structure_id)`.
    async fn delete_structure(
        &self,
        owner_id: &str,
        structure_id: &str,
    ) -> Result<bool, DatabaseError>;

    /// Start an atomic unit of work
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DatabaseError>;
}

/// Write operations that become visible only on [`commit`](Self::commit)
#[async_trait]
pub trait StoreTransaction: Send {
    /// Create a structure row with a fresh identifier
    async fn insert_structure(
        &mut self,
        owner_id: &str,
        label: &str,
    ) -> Result<Structure, DatabaseError>;

    /// Set the label of an owned structure and bump `updated_at`
    ///
    /// Returns `false` when nothing matched `(owner_id, structure_id)`.
    async fn update_structure_label(
        &mut self,
        owner_id: &str,
        structure_id: &str,
        label: &str,
    ) -> Result<bool, DatabaseError>;

    /// Delete every node of a structure, returning how many were removed
    async fn delete_nodes(&mut self, structure_id: &str) -> Result<u64, DatabaseError>;

    /// Create a parentless node with a fresh identifier
    async fn insert_node(
        &mut self,
        structure_id: &str,
        label: &str,
        position: i64,
    ) -> Result<Node, DatabaseError>;

    /// Point `node_id` at `parent_id`
    async fn set_parent(&mut self, node_id: &str, parent_id: &str) -> Result<(), DatabaseError>;

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError>;

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError>;
}
