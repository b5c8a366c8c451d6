//! Structure and Node Data Structures
//!
//! A `Structure` owns a label and an ordered collection of `Node`s. Nodes
//! reference their parent by identifier (`parent_id`); `None` marks the
//! root of a subtree, so a structure may hold several roots (a forest).
//!
//! Node identifiers are assigned by the persistence layer and are stable
//! across reads, but every update recreates all nodes of a structure, so
//! only `label` survives an edit session.
//!
//! # Examples
//!
//! ```rust
//! use structree_core::models::Node;
//!
//! let node = Node::new("structure-1", "Engineering", None, 0);
//! assert!(node.parent_id.is_none());
//! assert_eq!(node.structure_id, "structure-1");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum length (in characters) of a structure or node label
pub const MAX_LABEL_LENGTH: usize = 255;

/// Validation errors for structure submissions
///
/// Messages are user-facing and are surfaced verbatim to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The structure label is required.")]
    EmptyStructureLabel,

    #[error("At least one node is required.")]
    EmptyNodeList,

    #[error("Node {index} has an empty label.")]
    EmptyNodeLabel { index: usize },

    #[error("The {field} may not be greater than {max} characters.")]
    LabelTooLong { field: String, max: usize },

    #[error("Duplicate node label: '{label}'. Node labels must be unique within a structure.")]
    DuplicateLabel { label: String },

    #[error("Node '{label}' cannot be its own parent.")]
    SelfParent { label: String },

    #[error("Circular parent reference involving node '{label}'.")]
    CycleDetected { label: String },
}

/// One labeled vertex of a structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier, unique across the whole node store
    pub id: String,

    /// Owning structure
    pub structure_id: String,

    /// Display label, unique within its structure
    pub label: String,

    /// Parent node id within the same structure (`None` = root)
    pub parent_id: Option<String>,

    /// Submission order within the structure
    pub position: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Node {
    /// Create a new Node with an auto-generated UUID
    pub fn new(
        structure_id: impl Into<String>,
        label: impl Into<String>,
        parent_id: Option<String>,
        position: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            structure_id: structure_id.into(),
            label: label.into(),
            parent_id,
            position,
            created_at: Utc::now(),
        }
    }

    /// Whether this node starts its own subtree
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A named forest of nodes owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Stable identifier assigned at creation
    pub id: String,

    /// Owning user id
    pub owner_id: String,

    /// Display name
    pub label: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Nodes in submission order
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Structure {
    /// Create a new, empty Structure with an auto-generated UUID
    pub fn new(owner_id: impl Into<String>, label: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            label: label.into(),
            created_at: now,
            updated_at: now,
            nodes: Vec::new(),
        }
    }

    /// Look up a node of this structure by label
    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }
}
