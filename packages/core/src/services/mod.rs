//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `StructureService` - CRUD, tree and preview operations for structures
//! - `reconciler` - validation and label-to-id reconciliation of submissions
//!
//! Services coordinate between the database layer and application logic,
//! implementing business rules and orchestrating transactions.

pub mod error;
pub mod reconciler;
pub mod structure_service;

pub use error::{PersistenceAction, StructureServiceError};
pub use reconciler::{reconcile, validate_submission, ReconcileTarget, ValidatedSubmission};
pub use structure_service::StructureService;
