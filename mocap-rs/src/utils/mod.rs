//! Shared utilities for the mocap-rs CLI

pub mod table;
pub mod tree;

pub use tree::{NodeType, TreeNode, TreeOptions, render_tree};
