//! Display Trees
//!
//! Turns a flat, ordered list of node records into a nested `TreeNode`
//! for rendering. Records address their parent either by identifier
//! (persisted nodes) or by label (an in-progress edit).
//!
//! See [`build_tree`] for the exact resolution rules.

mod builder;

pub use builder::{
    build_tree, build_visible_tree, AddressMode, TreeNode, TreeRecord, VIRTUAL_ROOT_ID,
    VIRTUAL_ROOT_LABEL,
};
