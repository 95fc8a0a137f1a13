//! This crate exposes an ordered collection backed by a plain Binary Search Tree (BST) that is
//! only rebalanced when asked to.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to insert, find, and delete
//! stored elements. BSTs are typically defined recursively using the notion of a `Node`. A `Node`
//! stores one element and may have a left and a right child `Node`. The [`Tree`] here keeps these
//! invariants:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree hold an element less than its own.
//! 2. For every `Node`, all the `Node`s in its right subtree hold an element greater than or
//!    equal to its own. Equal elements are not merged.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching takes `O(height)` (where `height` is the longest path from the root `Node` to a leaf
//! `Node`). The [`Tree`] does nothing to keep its height down as elements come and go, so
//! inserting sorted data gives a tree as tall as it has elements. [`Tree::is_balanced`] reports
//! when that has happened and [`Tree::rebalance`] rebuilds the tree with a height of
//! `ceil(lg(N + 1)) - 1` for `N` distinct elements.
//!
//! Sorted iteration comes naturally from visiting the left subtree, then the subtree root, then
//! the right subtree (see [`Tree::inorder`]). Plain iteration over a [`Tree`] is preorder.
//!
//! ## Logging
//!
//! Rebalancing and clearing emit records through the [`log`] facade. Nothing is printed unless the
//! application installs a logger.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
pub mod iter;
mod tree;
mod util;

pub use error::TreeError;
pub use tree::Tree;
