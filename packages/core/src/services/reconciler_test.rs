//! Tests for the Label Reconciler
//!
//! Validation rules are checked directly; the insertion passes run against
//! an in-memory `StoreTransaction` that records every call.

use super::*;
use crate::models::{Structure, StructureInput};
use async_trait::async_trait;

fn input(label: &str, nodes: &[(&str, Option<&str>)]) -> StructureInput {
    StructureInput::new(
        label,
        nodes
            .iter()
            .map(|(l, p)| NodeSpec::new(*l, *p))
            .collect(),
    )
}

/// In-memory transaction keeping nodes and a call log
#[derive(Default)]
struct RecordingTransaction {
    owned: Vec<(String, String)>,
    nodes: Vec<Node>,
    calls: Vec<String>,
}

#[async_trait]
impl StoreTransaction for RecordingTransaction {
    async fn insert_structure(
        &mut self,
        owner_id: &str,
        label: &str,
    ) -> Result<Structure, DatabaseError> {
        self.calls.push(format!("insert_structure:{}", label));
        let structure = Structure::new(owner_id, label);
        self.owned
            .push((owner_id.to_string(), structure.id.clone()));
        Ok(structure)
    }

    async fn update_structure_label(
        &mut self,
        owner_id: &str,
        structure_id: &str,
        label: &str,
    ) -> Result<bool, DatabaseError> {
        self.calls.push(format!("update_structure_label:{}", label));
        Ok(self
            .owned
            .iter()
            .any(|(o, s)| o == owner_id && s == structure_id))
    }

    async fn delete_nodes(&mut self, structure_id: &str) -> Result<u64, DatabaseError> {
        self.calls.push("delete_nodes".to_string());
        let before = self.nodes.len();
        self.nodes.retain(|n| n.structure_id != structure_id);
        Ok((before - self.nodes.len()) as u64)
    }

    async fn insert_node(
        &mut self,
        structure_id: &str,
        label: &str,
        position: i64,
    ) -> Result<Node, DatabaseError> {
        self.calls.push(format!("insert_node:{}", label));
        let node = Node::new(structure_id, label, None, position);
        self.nodes.push(node.clone());
        Ok(node)
    }

    async fn set_parent(&mut self, node_id: &str, parent_id: &str) -> Result<(), DatabaseError> {
        self.calls.push("set_parent".to_string());
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
            node.parent_id = Some(parent_id.to_string());
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[test]
fn test_validate_trims_labels_and_parents() {
    let validated =
        validate_submission(&input("  Org ", &[(" CEO ", None), ("CTO", Some(" CEO "))])).unwrap();

    assert_eq!(validated.label, "Org");
    assert_eq!(
        validated.nodes,
        vec![NodeSpec::root("CEO"), NodeSpec::new("CTO", Some("CEO"))]
    );
}

#[test]
fn test_validate_blank_parent_becomes_none() {
    let validated = validate_submission(&input("Org", &[("A", Some("   "))])).unwrap();
    assert_eq!(validated.nodes[0].parent_id, None);
}

#[test]
fn test_validate_rejects_empty_structure_label() {
    let err = validate_submission(&input("   ", &[("A", None)])).unwrap_err();
    assert_eq!(err, ValidationError::EmptyStructureLabel);
}

#[test]
fn test_validate_rejects_empty_node_list() {
    let err = validate_submission(&input("Org", &[])).unwrap_err();
    assert_eq!(err, ValidationError::EmptyNodeList);
}

#[test]
fn test_validate_rejects_blank_node_label() {
    let err = validate_submission(&input("Org", &[("A", None), ("  ", None)])).unwrap_err();
    assert_eq!(err, ValidationError::EmptyNodeLabel { index: 2 });
}

#[test]
fn test_validate_rejects_duplicate_labels_after_trim() {
    let err = validate_submission(&input("S", &[("X", None), (" X ", None)])).unwrap_err();
    assert_eq!(
        err,
        ValidationError::DuplicateLabel {
            label: "X".to_string()
        }
    );
}

#[test]
fn test_validate_rejects_overlong_labels() {
    let long = "x".repeat(MAX_LABEL_LENGTH + 1);

    let err = validate_submission(&input(&long, &[("A", None)])).unwrap_err();
    assert!(matches!(err, ValidationError::LabelTooLong { .. }));

    let err = validate_submission(&input("Org", &[(long.as_str(), None)])).unwrap_err();
    assert!(matches!(err, ValidationError::LabelTooLong { .. }));

    let exact = "y".repeat(MAX_LABEL_LENGTH);
    assert!(validate_submission(&input("Org", &[(exact.as_str(), None)])).is_ok());
}

#[test]
fn test_validate_rejects_self_parent() {
    let err = validate_submission(&input("Org", &[("A", Some("A"))])).unwrap_err();
    assert_eq!(
        err,
        ValidationError::SelfParent {
            label: "A".to_string()
        }
    );
}

#[test]
fn test_validate_rejects_transitive_cycle() {
    let err = validate_submission(&input(
        "Org",
        &[("Root", None), ("A", Some("C")), ("B", Some("A")), ("C", Some("B"))],
    ))
    .unwrap_err();

    assert!(matches!(err, ValidationError::CycleDetected { .. }));
}

#[test]
fn test_validate_allows_unknown_parent_labels() {
    let validated = validate_submission(&input("Org", &[("A", Some("ghost"))])).unwrap();
    assert_eq!(validated.nodes[0].parent_label(), Some("ghost"));
}

#[tokio::test]
async fn test_reconcile_create_links_forward_references() {
    let submission = validate_submission(&input(
        "Org",
        &[("Engineer", Some("CTO")), ("CTO", Some("CEO")), ("CEO", None)],
    ))
    .unwrap();
    let mut tx = RecordingTransaction::default();

    let (structure_id, nodes) = reconcile(
        &mut tx,
        ReconcileTarget::Create { owner_id: "user-1" },
        &submission,
    )
    .await
    .unwrap();

    assert_eq!(nodes.len(), 3);
    assert!(nodes.iter().all(|n| n.structure_id == structure_id));
    let id_of = |label: &str| nodes.iter().find(|n| n.label == label).unwrap().id.clone();
    assert_eq!(nodes[0].parent_id, Some(id_of("CTO")));
    assert_eq!(nodes[1].parent_id, Some(id_of("CEO")));
    assert_eq!(nodes[2].parent_id, None);
    assert_eq!(
        nodes.iter().map(|n| n.position).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );

    // All inserts happen before any link
    let first_link = tx.calls.iter().position(|c| c == "set_parent").unwrap();
    let last_insert = tx
        .calls
        .iter()
        .rposition(|c| c.starts_with("insert_node"))
        .unwrap();
    assert!(last_insert < first_link);
}

#[tokio::test]
async fn test_reconcile_unknown_parent_stays_root() {
    let submission = validate_submission(&input("Org", &[("A", Some("ghost"))])).unwrap();
    let mut tx = RecordingTransaction::default();

    let (_, nodes) = reconcile(
        &mut tx,
        ReconcileTarget::Create { owner_id: "user-1" },
        &submission,
    )
    .await
    .unwrap();

    assert!(nodes[0].is_root());
    assert!(!tx.calls.iter().any(|c| c == "set_parent"));
}

#[tokio::test]
async fn test_reconcile_update_replaces_nodes() {
    let mut tx = RecordingTransaction::default();
    let first = validate_submission(&input("Org", &[("P", None), ("Q", Some("P"))])).unwrap();
    let (structure_id, _) = reconcile(
        &mut tx,
        ReconcileTarget::Create { owner_id: "user-1" },
        &first,
    )
    .await
    .unwrap();

    let second = validate_submission(&input("Org v2", &[("R", None)])).unwrap();
    let (same_id, nodes) = reconcile(
        &mut tx,
        ReconcileTarget::Update {
            owner_id: "user-1",
            structure_id: &structure_id,
        },
        &second,
    )
    .await
    .unwrap();

    assert_eq!(same_id, structure_id);
    assert_eq!(nodes.len(), 1);
    assert_eq!(
        tx.nodes.iter().map(|n| n.label.as_str()).collect::<Vec<_>>(),
        vec!["R"]
    );
}

#[tokio::test]
async fn test_reconcile_update_of_foreign_structure_is_not_found() {
    let mut tx = RecordingTransaction::default();
    let submission = validate_submission(&input("Org", &[("A", None)])).unwrap();
    let (structure_id, _) = reconcile(
        &mut tx,
        ReconcileTarget::Create { owner_id: "owner" },
        &submission,
    )
    .await
    .unwrap();

    let err = reconcile(
        &mut tx,
        ReconcileTarget::Update {
            owner_id: "intruder",
            structure_id: &structure_id,
        },
        &submission,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StructureServiceError::NotFound { .. }));
    assert!(!tx.calls.iter().any(|c| c == "delete_nodes"));
}
