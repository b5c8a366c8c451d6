//! Label Reconciler
//!
//! Turns a label-addressed submission into an identifier-addressed node
//! set inside a [`StoreTransaction`]:
//!
//! 1. **Validate** (before any mutation): structure label present, at least
//!    one node, every node label non-blank, at most 255 characters, unique
//!    after trimming, and the parent-label graph free of self references
//!    and cycles.
//! 2. **Prepare the target**: create the structure, or, for an update,
//!    relabel it (which also proves ownership) and delete all of its nodes.
//! 3. **First pass**: insert every node parentless, in submission order,
//!    building `label -> id`.
//! 4. **Second pass**: point each node whose parent label resolves in that
//!    map at the parent's new id. Unknown or blank parent labels leave the
//!    node a root.
//!
//! Two passes are needed because identifiers only exist after insertion
//! while parents may be listed after their children.
//!
//! Committing or rolling back is the caller's job.

use crate::db::{DatabaseError, StoreTransaction};
use crate::models::{Node, NodeSpec, StructureInput, ValidationError, MAX_LABEL_LENGTH};
use crate::services::error::StructureServiceError;
use std::collections::{HashMap, HashSet};

/// A submission that passed [`validate_submission`]
///
/// Labels are trimmed; parent references are trimmed and blank ones are
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub label: String,
    pub nodes: Vec<NodeSpec>,
}

/// Where reconciled nodes are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileTarget<'a> {
    /// New structure owned by `owner_id`
    Create { owner_id: &'a str },
    /// Replace every node of an existing, owned structure
    Update {
        owner_id: &'a str,
        structure_id: &'a str,
    },
}

fn check_length(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_LABEL_LENGTH {
        return Err(ValidationError::LabelTooLong {
            field: field.to_string(),
            max: MAX_LABEL_LENGTH,
        });
    }
    Ok(())
}

/// Check a submission and normalize its labels
///
/// Applies the same rules to create and update.
pub fn validate_submission(input: &StructureInput) -> Result<ValidatedSubmission, ValidationError> {
    let label = input.label.trim();
    if label.is_empty() {
        return Err(ValidationError::EmptyStructureLabel);
    }
    check_length(label, "structure label")?;

    if input.nodes.is_empty() {
        return Err(ValidationError::EmptyNodeList);
    }

    let mut nodes = Vec::with_capacity(input.nodes.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(input.nodes.len());
    for (index, spec) in input.nodes.iter().enumerate() {
        let node_label = spec.label.trim();
        if node_label.is_empty() {
            return Err(ValidationError::EmptyNodeLabel { index: index + 1 });
        }
        check_length(node_label, "node label")?;

        if !seen.insert(node_label) {
            return Err(ValidationError::DuplicateLabel {
                label: node_label.to_string(),
            });
        }

        let parent = spec.parent_label();
        if parent == Some(node_label) {
            return Err(ValidationError::SelfParent {
                label: node_label.to_string(),
            });
        }

        nodes.push(NodeSpec::new(node_label, parent));
    }

    check_acyclic(&nodes)?;

    Ok(ValidatedSubmission {
        label: label.to_string(),
        nodes,
    })
}

/// Walk every parent chain; revisiting a label means a cycle
fn check_acyclic(nodes: &[NodeSpec]) -> Result<(), ValidationError> {
    let labels: HashSet<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
    let parents: HashMap<&str, &str> = nodes
        .iter()
        .filter_map(|n| {
            n.parent_label()
                .filter(|p| labels.contains(p))
                .map(|p| (n.label.as_str(), p))
        })
        .collect();

    for start in &labels {
        let mut visited: HashSet<&str> = HashSet::from([*start]);
        let mut current = *start;
        while let Some(&parent) = parents.get(current) {
            if !visited.insert(parent) {
                return Err(ValidationError::CycleDetected {
                    label: parent.to_string(),
                });
            }
            current = parent;
        }
    }

    Ok(())
}

/// Write `submission` into `target` within `tx`
///
/// Returns the structure id and the created nodes in submission order.
/// Fails with `NotFound` when an update targets a structure the owner
/// cannot see; the caller must then roll back.
pub async fn reconcile(
    tx: &mut dyn StoreTransaction,
    target: ReconcileTarget<'_>,
    submission: &ValidatedSubmission,
) -> Result<(String, Vec<Node>), StructureServiceError> {
    let structure_id = match target {
        ReconcileTarget::Create { owner_id } => {
            tx.insert_structure(owner_id, &submission.label).await?.id
        }
        ReconcileTarget::Update {
            owner_id,
            structure_id,
        } => {
            if !tx
                .update_structure_label(owner_id, structure_id, &submission.label)
                .await?
            {
                return Err(StructureServiceError::not_found(structure_id));
            }
            let removed = tx.delete_nodes(structure_id).await?;
            tracing::debug!(structure_id, removed, "cleared previous nodes");
            structure_id.to_string()
        }
    };

    let nodes = link_nodes(tx, &structure_id, &submission.nodes).await?;
    Ok((structure_id, nodes))
}

/// The two insertion passes
async fn link_nodes(
    tx: &mut dyn StoreTransaction,
    structure_id: &str,
    specs: &[NodeSpec],
) -> Result<Vec<Node>, DatabaseError> {
    let mut created = Vec::with_capacity(specs.len());
    let mut label_to_id: HashMap<&str, String> = HashMap::with_capacity(specs.len());

    for (position, spec) in specs.iter().enumerate() {
        let node = tx
            .insert_node(structure_id, &spec.label, position as i64)
            .await?;
        label_to_id.insert(spec.label.as_str(), node.id.clone());
        created.push(node);
    }
    tracing::debug!(structure_id, count = created.len(), "inserted nodes");

    for (node, spec) in created.iter_mut().zip(specs) {
        let Some(parent_id) = spec.parent_label().and_then(|p| label_to_id.get(p)) else {
            continue;
        };
        tx.set_parent(&node.id, parent_id).await?;
        node.parent_id = Some(parent_id.clone());
    }

    Ok(created)
}

// Include tests
#[cfg(test)]
#[path = "reconciler_test.rs"]
mod reconciler_test;
