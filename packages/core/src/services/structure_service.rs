//! Structure Service - CRUD and Tree Operations
//!
//! This module provides the business logic layer for structures:
//!
//! - Listing, reading and deleting the caller's structures
//! - Create and update through the Label Reconciler, each in one
//!   transaction (all-or-nothing)
//! - Display trees for persisted structures and for unsaved edits
//! - The label-addressed edit form of a persisted structure
//!
//! Every operation takes the caller's [`UserContext`] explicitly; a
//! structure owned by someone else behaves exactly like a missing one.
//!
//! # Concurrency
//!
//! Two concurrent updates of the same structure are not serialized beyond
//! the database's transaction isolation: the last commit wins.

use crate::db::{DatabaseError, StoreTransaction, StructureStore};
use crate::models::{label_specs_from_nodes, Structure, StructureInput, UserContext};
use crate::services::error::{PersistenceAction, StructureServiceError};
use crate::services::reconciler::{self, ReconcileTarget, ValidatedSubmission};
use crate::tree::{build_visible_tree, AddressMode, TreeNode};
use std::sync::Arc;

/// Structure operations scoped to a caller
pub struct StructureService {
    store: Arc<dyn StructureStore>,
}

impl StructureService {
    /// Create a new StructureService over any `StructureStore`
    pub fn new(store: Arc<dyn StructureStore>) -> Self {
        Self { store }
    }

    /// All of the caller's structures, newest first
    pub async fn list(&self, ctx: &UserContext) -> Result<Vec<Structure>, StructureServiceError> {
        self.store
            .list_structures(&ctx.user_id)
            .await
            .map_err(|e| Self::log_failure(PersistenceAction::Load, e))
    }

    /// One of the caller's structures with its nodes
    pub async fn get(
        &self,
        ctx: &UserContext,
        structure_id: &str,
    ) -> Result<Structure, StructureServiceError> {
        self.store
            .get_structure(&ctx.user_id, structure_id)
            .await
            .map_err(|e| Self::log_failure(PersistenceAction::Load, e))?
            .ok_or_else(|| StructureServiceError::not_found(structure_id))
    }

    /// Create a structure from a label-addressed submission
    pub async fn create(
        &self,
        ctx: &UserContext,
        input: &StructureInput,
    ) -> Result<Structure, StructureServiceError> {
        let submission = Self::validated(input)?;

        let structure_id = self
            .in_transaction(
                ReconcileTarget::Create {
                    owner_id: &ctx.user_id,
                },
                &submission,
            )
            .await?;

        tracing::info!(
            structure_id = %structure_id,
            owner = %ctx.user_id,
            nodes = submission.nodes.len(),
            "structure created"
        );
        self.get(ctx, &structure_id).await
    }

    /// Replace the label and every node of one of the caller's structures
    ///
    /// Node identifiers are not preserved. On any failure the previous
    /// state is left untouched.
    pub async fn update(
        &self,
        ctx: &UserContext,
        structure_id: &str,
        input: &StructureInput,
    ) -> Result<Structure, StructureServiceError> {
        let submission = Self::validated(input)?;

        self.in_transaction(
            ReconcileTarget::Update {
                owner_id: &ctx.user_id,
                structure_id,
            },
            &submission,
        )
        .await?;

        tracing::info!(
            structure_id,
            owner = %ctx.user_id,
            nodes = submission.nodes.len(),
            "structure updated"
        );
        self.get(ctx, structure_id).await
    }

    /// Delete one of the caller's structures; its nodes cascade
    pub async fn delete(
        &self,
        ctx: &UserContext,
        structure_id: &str,
    ) -> Result<(), StructureServiceError> {
        if !self
            .store
            .delete_structure(&ctx.user_id, structure_id)
            .await
            .map_err(|e| Self::log_failure(PersistenceAction::Delete, e))?
        {
            return Err(StructureServiceError::not_found(structure_id));
        }

        tracing::info!(structure_id, owner = %ctx.user_id, "structure deleted");
        Ok(())
    }

    /// Display tree of a persisted structure (parents resolved by id)
    ///
    /// `Ok(None)` means there is nothing to draw.
    pub async fn tree(
        &self,
        ctx: &UserContext,
        structure_id: &str,
    ) -> Result<Option<TreeNode>, StructureServiceError> {
        let structure = self.get(ctx, structure_id).await?;
        Ok(build_visible_tree(&structure.nodes, AddressMode::ById))
    }

    /// The label-addressed form used to edit a persisted structure
    pub async fn edit_form(
        &self,
        ctx: &UserContext,
        structure_id: &str,
    ) -> Result<StructureInput, StructureServiceError> {
        let structure = self.get(ctx, structure_id).await?;
        Ok(StructureInput::new(
            structure.label,
            label_specs_from_nodes(&structure.nodes),
        ))
    }

    /// Display tree of an unsaved submission (parents resolved by label)
    pub fn preview(input: &StructureInput) -> Option<TreeNode> {
        build_visible_tree(&input.nodes, AddressMode::ByLabel)
    }

    fn validated(input: &StructureInput) -> Result<ValidatedSubmission, StructureServiceError> {
        reconciler::validate_submission(input).map_err(|e| {
            tracing::warn!(error = %e, "rejected structure submission");
            StructureServiceError::from(e)
        })
    }

    /// Run the reconciler in one transaction, rolling back on any error
    async fn in_transaction(
        &self,
        target: ReconcileTarget<'_>,
        submission: &ValidatedSubmission,
    ) -> Result<String, StructureServiceError> {
        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|e| Self::log_failure(PersistenceAction::Save, e))?;

        match reconciler::reconcile(tx.as_mut(), target, submission).await {
            Ok((structure_id, _)) => {
                tx.commit()
                    .await
                    .map_err(|e| Self::log_failure(PersistenceAction::Save, e))?;
                Ok(structure_id)
            }
            Err(err) => {
                Self::abort(tx).await;
                if let StructureServiceError::PersistenceFailed { source, .. } = &err {
                    tracing::error!(error = %source, "reconciliation failed, rolled back");
                }
                Err(err)
            }
        }
    }

    async fn abort(tx: Box<dyn StoreTransaction>) {
        if let Err(e) = tx.rollback().await {
            tracing::error!(error = %e, "rollback failed");
        }
    }

    fn log_failure(action: PersistenceAction, err: DatabaseError) -> StructureServiceError {
        tracing::error!(%action, error = %err, "structure persistence failed");
        StructureServiceError::persistence(action, err)
    }
}

// Include tests
#[cfg(test)]
#[path = "structure_service_test.rs"]
mod structure_service_test;
