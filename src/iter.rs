//! Iterators over a [`Tree`][crate::Tree].
//!
//! None of these recurse. Each keeps its own stack (or queue) of pending nodes so that walking a
//! badly unbalanced tree costs heap, not call stack.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::tree::{Link, Node};

/// Preorder iterator (node, then left subtree, then right subtree). Created by
/// [`Tree::preorder`][crate::Tree::preorder] and [`Tree::iter`][crate::Tree::iter].
pub struct Preorder<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Preorder<'a, T> {
    pub(crate) fn new(root: &'a Link<T>) -> Self {
        Self {
            stack: root.as_deref().into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for Preorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right goes on first so the left subtree pops first.
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        Some(&node.value)
    }
}

impl<T> FusedIterator for Preorder<'_, T> {}

/// Inorder iterator yielding elements in ascending order. Created by
/// [`Tree::inorder`][crate::Tree::inorder].
pub struct Inorder<'a, T> {
    /// Nodes whose left subtree is being (or has been) visited but which haven't been yielded.
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Inorder<'a, T> {
    pub(crate) fn new(root: &'a Link<T>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Inorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.value)
    }
}

impl<T> FusedIterator for Inorder<'_, T> {}

/// Postorder iterator (left subtree, right subtree, then node). Created by
/// [`Tree::postorder`][crate::Tree::postorder].
pub struct Postorder<'a, T> {
    /// The flag is set once a node's children have been pushed.
    stack: Vec<(&'a Node<T>, bool)>,
}

impl<'a, T> Postorder<'a, T> {
    pub(crate) fn new(root: &'a Link<T>) -> Self {
        Self {
            stack: root.as_deref().map(|n| (n, false)).into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for Postorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                return Some(&node.value);
            }
            self.stack.push((node, true));
            self.stack.extend(node.right.as_deref().map(|n| (n, false)));
            self.stack.extend(node.left.as_deref().map(|n| (n, false)));
        }
    }
}

impl<T> FusedIterator for Postorder<'_, T> {}

/// Breadth-first iterator, one level at a time from the root, left to right within a level.
/// Created by [`Tree::levelorder`][crate::Tree::levelorder].
pub struct Levelorder<'a, T> {
    queue: VecDeque<&'a Node<T>>,
}

impl<'a, T> Levelorder<'a, T> {
    pub(crate) fn new(root: &'a Link<T>) -> Self {
        Self {
            queue: root.as_deref().into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for Levelorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left.as_deref());
        self.queue.extend(node.right.as_deref());
        Some(&node.value)
    }
}

impl<T> FusedIterator for Levelorder<'_, T> {}

/// An owning preorder iterator. Created by calling `into_iter` on a [`Tree`][crate::Tree].
pub struct IntoIter<T> {
    stack: Vec<Box<Node<T>>>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(root: Link<T>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.stack.extend(node.right.take());
        self.stack.extend(node.left.take());
        Some(node.value)
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Unlink the remaining nodes one at a time instead of letting `Box` drop them
        // recursively.
        for _ in self {}
    }
}
