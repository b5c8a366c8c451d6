//! Database Error Types
//!
//! Failures of the structure database, grouped by where they happen:
//! opening the file, creating the schema, running a statement inside or
//! outside a transaction, and decoding a row into `Structure`/`Node`.
//!
//! None of these messages reach end users; `StructureServiceError`
//! replaces them with a generic message and they are only logged.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Cannot open structure database at {path}: {source}")]
    Open {
        path: PathBuf,
        source: libsql::Error,
    },

    #[error("Cannot access {path}: permission denied")]
    AccessDenied { path: PathBuf },

    #[error("Cannot create database directory: {0}")]
    CreateDirectory(#[from] std::io::Error),

    #[error("Schema setup failed: {0}")]
    Schema(String),

    /// Raised by libsql outside a contextualised call (connect, row stepping)
    #[error("libsql: {0}")]
    Libsql(#[from] libsql::Error),

    #[error("Statement failed: {context}")]
    Statement { context: String },

    /// BEGIN, COMMIT or ROLLBACK failed
    #[error("Transaction failed: {context}")]
    Transaction { context: String },

    /// A stored column could not be decoded into a model field
    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl DatabaseError {
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::Open { path, source }
    }

    pub fn permission_denied(path: PathBuf) -> Self {
        Self::AccessDenied { path }
    }

    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::Statement {
            context: context.into(),
        }
    }

    pub fn transaction_failed(context: impl Into<String>) -> Self {
        Self::Transaction {
            context: context.into(),
        }
    }

    pub fn invalid_row(msg: impl Into<String>) -> Self {
        Self::InvalidRow(msg.into())
    }
}
