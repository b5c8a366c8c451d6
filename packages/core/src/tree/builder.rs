//! Tree Builder
//!
//! Builds a rooted display tree from a flat record list in two passes:
//!
//! 1. **Index**: map each record's own key (id or label, per [`AddressMode`])
//!    to its position. A later record with the same key replaces the
//!    earlier one in the index (last write wins).
//! 2. **Link**: for every input record, resolve its parent reference
//!    against the index and append the record's *indexed* entry to that
//!    parent's children, in input order. Unresolved references (none,
//!    blank, unknown key, or the record itself) make it a root. A key that
//!    occurs twice is therefore placed twice, both times as the later
//!    record.
//!
//! One root is returned as-is. Several roots are collected under a
//! synthetic, never-persisted node with id [`VIRTUAL_ROOT_ID`]. No roots
//! yields `None`.
//!
//! The builder never fails. Records on a parent cycle that no root reaches
//! are left out of the output, and a record never appears below itself.

use crate::models::{Node, NodeSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of the synthetic root that collects several real roots
pub const VIRTUAL_ROOT_ID: &str = "virtual-root";

/// Label of the synthetic root
pub const VIRTUAL_ROOT_LABEL: &str = "Root";

/// How records name themselves and their parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    /// Own key is `id`, parent reference is a node id
    ById,
    /// Own key is `label`, parent reference is a label
    ByLabel,
}

/// A flat record the builder can arrange into a tree
pub trait TreeRecord {
    /// Stable identifier, if the record has been persisted
    fn id(&self) -> Option<&str>;

    fn label(&self) -> &str;

    /// Parent reference, interpreted according to the [`AddressMode`]
    fn parent_ref(&self) -> Option<&str>;
}

impl TreeRecord for Node {
    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn parent_ref(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}

impl TreeRecord for NodeSpec {
    fn id(&self) -> Option<&str> {
        None
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn parent_ref(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}

/// A node of the display tree handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn virtual_root(children: Vec<TreeNode>) -> Self {
        Self {
            id: Some(VIRTUAL_ROOT_ID.to_string()),
            label: VIRTUAL_ROOT_LABEL.to_string(),
            children,
        }
    }

    /// Whether this is the synthetic multi-root container
    pub fn is_virtual(&self) -> bool {
        self.id.as_deref() == Some(VIRTUAL_ROOT_ID)
    }

    /// Number of nodes in this subtree, including `self`
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Depth-first search for a descendant (or `self`) by label
    pub fn find(&self, label: &str) -> Option<&TreeNode> {
        if self.label == label {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(label))
    }
}

fn own_key<R: TreeRecord>(record: &R, mode: AddressMode) -> Option<&str> {
    match mode {
        AddressMode::ById => record.id().map(str::trim).filter(|id| !id.is_empty()),
        AddressMode::ByLabel => Some(record.label().trim()),
    }
}

/// Build a display tree from `records`
///
/// Callers are expected to drop blank-labeled records first (see
/// [`build_visible_tree`]); this function does not re-check labels. In
/// [`AddressMode::ById`] records without an id are skipped.
pub fn build_tree<R: TreeRecord>(records: &[R], mode: AddressMode) -> Option<TreeNode> {
    // Pass 1: key -> position, last write wins
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        if let Some(key) = own_key(record, mode) {
            index.insert(key, pos);
        }
    }

    // Pass 2: resolve parents
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();
    for record in records {
        let Some(entry) = own_key(record, mode).and_then(|key| index.get(key).copied()) else {
            continue;
        };

        let parent = record
            .parent_ref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .and_then(|p| index.get(p).copied());

        match parent {
            Some(parent_pos) if parent_pos != entry => children[parent_pos].push(entry),
            _ => roots.push(entry),
        }
    }

    let mut on_path = vec![false; records.len()];
    let mut trees: Vec<TreeNode> = roots
        .into_iter()
        .map(|pos| materialize(records, &children, pos, &mut on_path))
        .collect();

    match trees.len() {
        0 => None,
        1 => trees.pop(),
        _ => Some(TreeNode::virtual_root(trees)),
    }
}

/// Drop records whose label is blank, then [`build_tree`]
pub fn build_visible_tree<R: TreeRecord + Clone>(
    records: &[R],
    mode: AddressMode,
) -> Option<TreeNode> {
    let visible: Vec<R> = records
        .iter()
        .filter(|r| !r.label().trim().is_empty())
        .cloned()
        .collect();
    build_tree(&visible, mode)
}

/// Expand `pos`, skipping any child already on the current root path
fn materialize<R: TreeRecord>(
    records: &[R],
    children: &[Vec<usize>],
    pos: usize,
    on_path: &mut [bool],
) -> TreeNode {
    on_path[pos] = true;
    let record = &records[pos];
    let mut kids = Vec::with_capacity(children[pos].len());
    for &child in &children[pos] {
        if !on_path[child] {
            kids.push(materialize(records, children, child, on_path));
        }
    }
    on_path[pos] = false;

    TreeNode {
        id: record.id().map(str::to_string),
        label: record.label().to_string(),
        children: kids,
    }
}

// Include tests
#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
