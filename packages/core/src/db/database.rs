//! Database Connection Management
//!
//! This module provides database connection and schema initialization
//! using libsql.
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf
//! - **WAL mode**: Write-Ahead Logging for better concurrency
//! - **Foreign keys**: Enabled on every connection, so deleting a structure
//!   cascades to its nodes
//!
//! # Database Connection Patterns
//!
//! **Always use `connect_with_timeout()` in async functions.** It applies
//! the busy timeout and the foreign key pragma to the new connection, both
//! of which are per-connection settings in SQLite.
//!
//! ```no_run
//! # use structree_core::db::DatabaseService;
//! # use std::path::PathBuf;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db_service = DatabaseService::new(PathBuf::from("./data/structree.db")).await?;
//! let conn = db_service.connect_with_timeout().await?;
//! # Ok(())
//! # }
//! ```

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Database service for managing the libsql connection and schema
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the parent directory cannot be created,
    /// the connection fails or schema initialization fails.
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        let is_new_database = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::CreateDirectory(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema(is_new_database).await?;

        tracing::debug!(path = %service.db_path.display(), "database ready");

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of execute().
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Idempotent: every statement uses IF NOT EXISTS.
    ///
    /// # Schema
    ///
    /// - `structures`: one row per structure, scoped by `owner_id`
    /// - `nodes`: labeled vertices; `structure_id` and `parent_id` both
    ///   cascade on delete
    async fn initialize_schema(&self, is_new_database: bool) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL").await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS structures (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                label TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!(
                "Failed to create structures table: {}",
                e
            ))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS nodes (
                id TEXT PRIMARY KEY,
                structure_id TEXT NOT NULL,
                label TEXT NOT NULL,
                parent_id TEXT,
                position INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (structure_id) REFERENCES structures(id) ON DELETE CASCADE,
                FOREIGN KEY (parent_id) REFERENCES nodes(id) ON DELETE CASCADE
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!("Failed to create nodes table: {}", e))
        })?;

        self.create_core_indexes(&conn).await?;

        // Flush schema for fresh files so other connections see it immediately
        if is_new_database {
            self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)").await?;
        }

        Ok(())
    }

    /// Create core indexes
    async fn create_core_indexes(&self, conn: &libsql::Connection) -> Result<(), DatabaseError> {
        let indexes = [
            (
                "idx_structures_owner",
                "CREATE INDEX IF NOT EXISTS idx_structures_owner ON structures(owner_id)",
            ),
            (
                "idx_nodes_structure",
                "CREATE INDEX IF NOT EXISTS idx_nodes_structure ON nodes(structure_id, position)",
            ),
            (
                "idx_nodes_parent",
                "CREATE INDEX IF NOT EXISTS idx_nodes_parent ON nodes(parent_id)",
            ),
        ];

        for (name, sql) in indexes {
            conn.execute(sql, ()).await.map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to create index '{}': {}", name, e))
            })?;
        }

        Ok(())
    }

    /// Get a raw connection to the database
    ///
    /// The connection has no busy timeout and foreign keys disabled. Prefer
    /// `connect_with_timeout()`.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::Libsql)
    }

    /// Get a connection with busy timeout and foreign keys configured
    ///
    /// Sets a 5-second busy timeout so concurrent writers wait instead of
    /// failing immediately with `SQLITE_BUSY`.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000").await?;
        // Returns no rows, unlike the pragmas above
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to enable foreign keys: {}", e))
            })?;

        Ok(conn)
    }
}
