//! Errors returned by [`Tree`][crate::Tree] operations.

/// Errors triggered by tree operations.
///
/// Only operations that cannot produce a sensible value fail. Looking up an element that isn't
/// there (see [`Tree::find`][crate::Tree::find]) is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError {
    /// The element to remove isn't stored in the tree.
    #[error("item not in tree")]
    NotFound,
    /// The operation needs at least one element.
    #[error("tree is empty")]
    Empty,
}
