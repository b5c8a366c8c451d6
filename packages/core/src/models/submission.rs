//! Label-addressed submission shape
//!
//! Clients only know nodes by label while editing, so a submission names
//! each node's parent by the parent's *label* in `parent_id`:
//!
//! ```json
//! { "label": "Org", "nodes": [ { "label": "CEO", "parent_id": null },
//!                              { "label": "CTO", "parent_id": "CEO" } ] }
//! ```
//!
//! Unknown per-node fields (such as an `id` echoed back by the editor) are
//! accepted and ignored, because identifiers are always reassigned.

use crate::models::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One node of a submission: a label and the label of its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub label: String,

    /// Parent *label*; `None` or blank means root
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl NodeSpec {
    pub fn new(label: impl Into<String>, parent_label: Option<&str>) -> Self {
        Self {
            label: label.into(),
            parent_id: parent_label.map(str::to_string),
        }
    }

    pub fn root(label: impl Into<String>) -> Self {
        Self::new(label, None)
    }

    /// The trimmed parent label, if one is declared and non-blank
    pub fn parent_label(&self) -> Option<&str> {
        self.parent_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// A full create/update submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureInput {
    pub label: String,

    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

impl StructureInput {
    pub fn new(label: impl Into<String>, nodes: Vec<NodeSpec>) -> Self {
        Self {
            label: label.into(),
            nodes,
        }
    }
}

/// Rewrite persisted nodes into the label-addressed editing shape
///
/// Each node's `parent_id` is replaced by its parent's label. A parent id
/// that matches none of `nodes` becomes `None`.
pub fn label_specs_from_nodes(nodes: &[Node]) -> Vec<NodeSpec> {
    let labels_by_id: HashMap<&str, &str> = nodes
        .iter()
        .map(|n| (n.id.as_str(), n.label.as_str()))
        .collect();

    nodes
        .iter()
        .map(|n| NodeSpec {
            label: n.label.clone(),
            parent_id: n
                .parent_id
                .as_deref()
                .and_then(|pid| labels_by_id.get(pid))
                .map(|label| label.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_label_trims_and_ignores_blank() {
        assert_eq!(NodeSpec::new("A", Some("  B ")).parent_label(), Some("B"));
        assert_eq!(NodeSpec::new("A", Some("   ")).parent_label(), None);
        assert_eq!(NodeSpec::root("A").parent_label(), None);
    }

    #[test]
    fn test_label_specs_from_nodes_maps_ids_to_labels() {
        let root = Node::new("s", "CEO", None, 0);
        let child = Node::new("s", "CTO", Some(root.id.clone()), 1);
        let orphan = Node::new("s", "Lost", Some("missing-id".to_string()), 2);

        let specs = label_specs_from_nodes(&[root, child, orphan]);

        assert_eq!(
            specs,
            vec![
                NodeSpec::root("CEO"),
                NodeSpec::new("CTO", Some("CEO")),
                NodeSpec::root("Lost"),
            ]
        );
    }

    #[test]
    fn test_submission_ignores_node_ids() {
        let input: StructureInput = serde_json::from_str(
            r#"{"label":"S","nodes":[{"id":7,"label":"X","parent_id":null},{"label":"Y","parent_id":"X"}]}"#,
        )
        .unwrap();

        assert_eq!(input.nodes.len(), 2);
        assert_eq!(input.nodes[1].parent_label(), Some("X"));
    }
}
