//! An arena-backed red-black tree: ordered-key storage with `O(log n)`
//! insertion, deletion and search.
//!
//! Nodes are allocated from an arena owned by the tree, and the
//! parent/child relations are arena indices rather than references.
//! A single per-tree sentinel node stands for every external leaf and
//! for the parent of the root. Duplicate keys are allowed; an equal key
//! always descends into the right subtree.

pub mod tree;

pub use tree::{InOrderIter, LevelOrderIter, NodeRef, RbTree};
