//! TursoStore - StructureStore Implementation for libsql
//!
//! Wraps a `DatabaseService` and maps rows to `Structure`/`Node` models.
//! Transactions hold one dedicated connection between `BEGIN TRANSACTION`
//! and `COMMIT`/`ROLLBACK`.
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
//! let store = TursoStore::new(db);
//! let mine = store.list_structures("user-1").await?;
//! # Ok(())
//! # }
//! ```

use crate::db::structure_store::{StoreTransaction, StructureStore};
use crate::db::{DatabaseError, DatabaseService};
use crate::models::{Node, Structure};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use libsql::{Connection, Row};
use std::sync::Arc;

const STRUCTURE_COLUMNS: &str = "id, owner_id, label, created_at, updated_at";
const NODE_COLUMNS: &str = "id, structure_id, label, parent_id, position, created_at";

/// Current time at the precision stored in the database
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC3339 so timestamps sort lexicographically
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::invalid_row(format!("Bad timestamp '{}': {}", s, e)))
}

fn column_error(name: &'static str) -> impl Fn(libsql::Error) -> DatabaseError {
    move |e| DatabaseError::invalid_row(format!("Failed to get {}: {}", name, e))
}

/// Convert a row selected with `STRUCTURE_COLUMNS`; `nodes` is left empty
fn row_to_structure(row: &Row) -> Result<Structure, DatabaseError> {
    let created_at: String = row.get(3).map_err(column_error("created_at"))?;
    let updated_at: String = row.get(4).map_err(column_error("updated_at"))?;

    Ok(Structure {
        id: row.get(0).map_err(column_error("id"))?,
        owner_id: row.get(1).map_err(column_error("owner_id"))?,
        label: row.get(2).map_err(column_error("label"))?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        nodes: Vec::new(),
    })
}

/// Convert a row selected with `NODE_COLUMNS`
fn row_to_node(row: &Row) -> Result<Node, DatabaseError> {
    let created_at: String = row.get(5).map_err(column_error("created_at"))?;

    Ok(Node {
        id: row.get(0).map_err(column_error("id"))?,
        structure_id: row.get(1).map_err(column_error("structure_id"))?,
        label: row.get(2).map_err(column_error("label"))?,
        parent_id: row.get(3).map_err(column_error("parent_id"))?,
        position: row.get(4).map_err(column_error("position"))?,
        created_at: parse_timestamp(&created_at)?,
    })
}

async fn load_nodes(conn: &Connection, structure_id: &str) -> Result<Vec<Node>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {} FROM nodes WHERE structure_id = ? ORDER BY position, rowid",
                NODE_COLUMNS
            ),
            [structure_id],
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to load nodes: {}", e)))?;

    let mut nodes = Vec::new();
    while let Some(row) = rows.next().await? {
        nodes.push(row_to_node(&row)?);
    }
    Ok(nodes)
}

/// TursoStore implements StructureStore for the libsql backend
pub struct TursoStore {
    db: Arc<DatabaseService>,
}

impl TursoStore {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Underlying database service
    pub fn database(&self) -> &Arc<DatabaseService> {
        &self.db
    }
}

#[async_trait]
impl StructureStore for TursoStore {
    async fn list_structures(&self, owner_id: &str) -> Result<Vec<Structure>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM structures WHERE owner_id = ?
                     ORDER BY created_at DESC, rowid DESC",
                    STRUCTURE_COLUMNS
                ),
                [owner_id],
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to list structures: {}", e))
            })?;

        let mut structures = Vec::new();
        while let Some(row) = rows.next().await? {
            structures.push(row_to_structure(&row)?);
        }
        drop(rows);

        for structure in &mut structures {
            structure.nodes = load_nodes(&conn, &structure.id).await?;
        }

        Ok(structures)
    }

    async fn get_structure(
        &self,
        owner_id: &str,
        structure_id: &str,
    ) -> Result<Option<Structure>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM structures WHERE id = ? AND owner_id = ?",
                    STRUCTURE_COLUMNS
                ),
                [structure_id, owner_id],
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to get structure: {}", e)))?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        let mut structure = row_to_structure(&row)?;
        structure.nodes = load_nodes(&conn, &structure.id).await?;
        Ok(Some(structure))
    }

    async fn delete_structure(
        &self,
        owner_id: &str,
        structure_id: &str,
    ) -> Result<bool, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let affected = conn
            .execute(
                "DELETE FROM structures WHERE id = ? AND owner_id = ?",
                [structure_id, owner_id],
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to delete structure: {}", e))
            })?;

        Ok(affected > 0)
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        conn.execute("BEGIN TRANSACTION", ()).await.map_err(|e| {
            DatabaseError::transaction_failed(format!("Failed to begin transaction: {}", e))
        })?;

        Ok(Box::new(TursoTransaction { conn }))
    }
}

/// An open libsql transaction on a dedicated connection
pub struct TursoTransaction {
    conn: Connection,
}

#[async_trait]
impl StoreTransaction for TursoTransaction {
    async fn insert_structure(
        &mut self,
        owner_id: &str,
        label: &str,
    ) -> Result<Structure, DatabaseError> {
        let mut structure = Structure::new(owner_id, label);
        structure.created_at = now();
        structure.updated_at = structure.created_at;
        let stamp = format_timestamp(&structure.created_at);

        self.conn
            .execute(
                "INSERT INTO structures (id, owner_id, label, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)",
                (
                    structure.id.as_str(),
                    owner_id,
                    label,
                    stamp.as_str(),
                    stamp.as_str(),
                ),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to insert structure: {}", e))
            })?;

        Ok(structure)
    }

    async fn update_structure_label(
        &mut self,
        owner_id: &str,
        structure_id: &str,
        label: &str,
    ) -> Result<bool, DatabaseError> {
        let stamp = format_timestamp(&now());

        let affected = self
            .conn
            .execute(
                "UPDATE structures SET label = ?, updated_at = ? WHERE id = ? AND owner_id = ?",
                [label, stamp.as_str(), structure_id, owner_id],
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to update structure: {}", e))
            })?;

        Ok(affected > 0)
    }

    async fn delete_nodes(&mut self, structure_id: &str) -> Result<u64, DatabaseError> {
        self.conn
            .execute("DELETE FROM nodes WHERE structure_id = ?", [structure_id])
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete nodes: {}", e)))
    }

    async fn insert_node(
        &mut self,
        structure_id: &str,
        label: &str,
        position: i64,
    ) -> Result<Node, DatabaseError> {
        let mut node = Node::new(structure_id, label, None, position);
        node.created_at = now();
        let stamp = format_timestamp(&node.created_at);

        self.conn
            .execute(
                "INSERT INTO nodes (id, structure_id, label, parent_id, position, created_at)
                 VALUES (?, ?, ?, NULL, ?, ?)",
                (
                    node.id.as_str(),
                    structure_id,
                    label,
                    position,
                    stamp.as_str(),
                ),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to insert node '{}': {}", label, e))
            })?;

        Ok(node)
    }

    async fn set_parent(&mut self, node_id: &str, parent_id: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "UPDATE nodes SET parent_id = ? WHERE id = ?",
                [parent_id, node_id],
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!(
                    "Failed to set parent of node {}: {}",
                    node_id, e
                ))
            })?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        if let Err(e) = self.conn.execute("COMMIT", ()).await {
            let _rollback = self.conn.execute("ROLLBACK", ()).await;
            return Err(DatabaseError::transaction_failed(format!(
                "Failed to commit transaction: {}",
                e
            )));
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        self.conn.execute("ROLLBACK", ()).await.map_err(|e| {
            DatabaseError::transaction_failed(format!("Failed to roll back transaction: {}", e))
        })?;
        Ok(())
    }
}
