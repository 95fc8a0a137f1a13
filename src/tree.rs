//! A plain, owned Binary Search Tree. Nodes own their children through `Box`es and there are no
//! parent pointers: anything that has to modify a parent's link (like deletion) walks down with a
//! mutable cursor over the links instead.
//!
//! The tree never rebalances itself. Inserting sorted data produces a tree that is really a
//! linked list; [`Tree::rebalance`] rebuilds it into a tree of minimal height on request.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::{Tree, TreeError};
//!
//! let mut tree = Tree::new();
//! for x in [50, 30, 70, 20, 40, 60, 80] {
//!     tree.insert(x);
//! }
//!
//! assert!(tree.find(&40));
//! assert_eq!(tree.successor(&45), Some(&50));
//! assert_eq!(tree.predecessor(&45), Some(&40));
//! assert_eq!(tree.range_find(&25, &65), vec![&30, &40, &50, &60]);
//!
//! // Removing returns the stored element.
//! assert_eq!(tree.remove(&30), Ok(30));
//! assert_eq!(tree.remove(&30), Err(TreeError::NotFound));
//! assert_eq!(tree.len(), 6);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::error::TreeError;
use crate::iter::{Inorder, IntoIter, Levelorder, Postorder, Preorder};
use crate::util;

/// An owned, possibly empty, child slot.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

/// An ordered collection backed by an unbalanced Binary Search Tree.
///
/// Elements that compare less than a node go to its left, everything else (including equal
/// elements) goes to its right. Duplicates are kept.
pub struct Tree<T> {
    root: Link<T>,
    size: usize,
}

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
        })
    }

    /// Overwrites this node's value with the largest value in its left subtree and unlinks the
    /// node that held it, which is replaced by its own left child. Returns the overwritten value.
    ///
    /// Returns `None` and leaves the node untouched if there is no left subtree.
    fn lift_max_in_left_subtree(&mut self) -> Option<T> {
        let mut link = &mut self.left;
        loop {
            let has_right = match link.as_deref() {
                Some(node) => node.right.is_some(),
                None => return None,
            };
            if !has_right {
                break;
            }
            let Some(node) = link else { return None };
            link = &mut node.right;
        }

        let mut max = link.take()?;
        *link = max.left.take();
        Some(mem::replace(&mut self.value, max.value))
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        drop(IntoIter::new(self.root.take()));
    }
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }

    /// The number of elements in the tree, duplicates included.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        log::trace!("clearing {} elements", self.size);
        drop(IntoIter::new(self.root.take()));
        self.size = 0;
    }

    /// Iterates over the elements in the default (preorder) order.
    pub fn iter(&self) -> Preorder<'_, T> {
        self.preorder()
    }

    /// Iterates over the elements visiting each node before its left subtree and its left
    /// subtree before its right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let tree: Tree<_> = [2, 1, 3].into_iter().collect();
    /// assert_eq!(tree.preorder().collect::<Vec<_>>(), vec![&2, &1, &3]);
    /// ```
    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder::new(&self.root)
    }

    /// Iterates over the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let tree: Tree<_> = [2, 1, 3].into_iter().collect();
    /// assert_eq!(tree.inorder().collect::<Vec<_>>(), vec![&1, &2, &3]);
    /// ```
    pub fn inorder(&self) -> Inorder<'_, T> {
        Inorder::new(&self.root)
    }

    /// Iterates over the elements visiting both subtrees of a node before the node itself.
    pub fn postorder(&self) -> Postorder<'_, T> {
        Postorder::new(&self.root)
    }

    /// Iterates over the elements level by level, starting at the root.
    pub fn levelorder(&self) -> Levelorder<'_, T> {
        Levelorder::new(&self.root)
    }

    /// The number of edges on the longest path from the root to a leaf. A tree with a single
    /// element has a height of 0.
    ///
    /// An empty tree has no height and yields [`TreeError::Empty`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{Tree, TreeError};
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.height(), Err(TreeError::Empty));
    ///
    /// tree.insert(1);
    /// assert_eq!(tree.height(), Ok(0));
    ///
    /// tree.insert(2);
    /// tree.insert(3);
    /// assert_eq!(tree.height(), Ok(2));
    /// ```
    pub fn height(&self) -> Result<usize, TreeError> {
        let root = self.root.as_deref().ok_or(TreeError::Empty)?;

        // Walk one level at a time; the height is the number of levels below the root.
        let mut level = vec![root];
        let mut height = 0;
        loop {
            let next: Vec<&Node<T>> = level
                .iter()
                .copied()
                .flat_map(|node| node.left.as_deref().into_iter().chain(node.right.as_deref()))
                .collect();
            if next.is_empty() {
                return Ok(height);
            }
            height += 1;
            level = next;
        }
    }

    /// Whether the height is reasonably close to the smallest possible height for this many
    /// elements, namely `height < 2 * lg(len + 1) - 1`. This is a rule of thumb rather than
    /// the strict per-node AVL condition.
    ///
    /// An empty tree is balanced.
    pub fn is_balanced(&self) -> bool {
        match self.height() {
            Ok(height) => (height as f64) < 2.0 * ((self.size + 1) as f64).log2() - 1.0,
            Err(_) => true,
        }
    }

    /// Removes every element and returns them in ascending order.
    fn drain_sorted(&mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.size);
        let mut stack = Vec::new();
        let mut link = self.root.take();
        self.size = 0;

        loop {
            while let Some(mut node) = link.take() {
                link = node.left.take();
                stack.push(node);
            }
            let Some(mut node) = stack.pop() else { break };
            link = node.right.take();
            sorted.push(node.value);
        }

        sorted
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    /// Inserts `item` as a new leaf. Equal elements are kept and placed to the right of the ones
    /// already stored. This never reshapes the existing tree.
    pub fn insert(&mut self, item: T) {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = if item < node.value {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(Node::new_boxed(item));
        self.size += 1;
    }

    /// Whether an element equal to `item` is stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("apple");
    ///
    /// assert!(tree.find(&"apple"));
    /// assert!(!tree.find(&"banana"));
    /// ```
    pub fn find(&self, item: &T) -> bool {
        self.get(item).is_some()
    }

    /// Same as [`Tree::find`].
    pub fn contains(&self, item: &T) -> bool {
        self.find(item)
    }

    /// Returns the stored element equal to `item`, if any.
    pub fn get(&self, item: &T) -> Option<&T> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            match item.cmp(&n.value) {
                Ordering::Equal => return Some(&n.value),
                Ordering::Less => node = n.left.as_deref(),
                Ordering::Greater => node = n.right.as_deref(),
            }
        }
        None
    }

    /// How many stored elements are equal to `item`.
    pub fn count(&self, item: &T) -> usize {
        self.inorder().filter(|x| *x == item).count()
    }

    /// Removes an element equal to `item` and returns it. Returns [`TreeError::NotFound`] if
    /// there is none, in which case the tree is left alone.
    ///
    /// A node with two children isn't unlinked itself. It takes over the largest value of its
    /// left subtree and the node that held that value is unlinked instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{Tree, TreeError};
    ///
    /// let mut tree: Tree<_> = [2, 1, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.remove(&2), Ok(2));
    /// assert_eq!(tree.remove(&2), Err(TreeError::NotFound));
    ///
    /// // 1 was lifted into the old root.
    /// assert_eq!(tree.preorder().collect::<Vec<_>>(), vec![&1, &3]);
    /// ```
    pub fn remove(&mut self, item: &T) -> Result<T, TreeError> {
        let link = Self::search_link(&mut self.root, item);
        let Some(mut target) = link.take() else {
            log::trace!("remove: item not in tree");
            return Err(TreeError::NotFound);
        };

        let removed = if target.right.is_none() {
            *link = target.left.take();
            target.value
        } else {
            match target.lift_max_in_left_subtree() {
                Some(removed) => {
                    *link = Some(target);
                    removed
                }
                None => {
                    *link = target.right.take();
                    target.value
                }
            }
        };

        self.size -= 1;
        Ok(removed)
    }

    /// Overwrites the stored element equal to `item` with `new_item` and returns the old
    /// element, or `None` if there is no such element.
    ///
    /// The node isn't moved, so `new_item` must sort the same way `item` did or the tree stops
    /// being searchable.
    pub fn replace(&mut self, item: &T, new_item: T) -> Option<T> {
        let node = Self::search_link(&mut self.root, item).as_deref_mut()?;
        Some(mem::replace(&mut node.value, new_item))
    }

    /// The smallest stored element strictly greater than `item`, whether or not `item` itself is
    /// stored.
    pub fn successor(&self, item: &T) -> Option<&T> {
        let mut node = self.root.as_deref();
        let mut successor = None;
        while let Some(n) = node {
            if n.value > *item {
                successor = Some(&n.value);
                node = n.left.as_deref();
            } else {
                node = n.right.as_deref();
            }
        }
        successor
    }

    /// The largest stored element strictly less than `item`, whether or not `item` itself is
    /// stored.
    pub fn predecessor(&self, item: &T) -> Option<&T> {
        let mut node = self.root.as_deref();
        let mut predecessor = None;
        while let Some(n) = node {
            if n.value < *item {
                predecessor = Some(&n.value);
                node = n.right.as_deref();
            } else {
                node = n.left.as_deref();
            }
        }
        predecessor
    }

    /// All stored elements `x` with `low <= x <= high`, in ascending order.
    ///
    /// This filters a full inorder walk so it is `O(len)` no matter how narrow the range is.
    pub fn range_find(&self, low: &T, high: &T) -> Vec<&T> {
        self.inorder().filter(|x| low <= *x && *x <= high).collect()
    }

    /// Rebuilds the tree with the smallest possible height for the number of elements it holds.
    ///
    /// The elements are taken out in order and re-inserted (with the ordinary [`Tree::insert`])
    /// middle first, then the middles of each half and so on. Each insert therefore lands where
    /// it would sit in a perfectly balanced tree. Runs in `O(n lg n)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::Tree;
    ///
    /// let mut tree: Tree<_> = (0..7).collect();
    /// assert_eq!(tree.height(), Ok(6));
    ///
    /// tree.rebalance();
    /// assert_eq!(tree.height(), Ok(2));
    /// assert_eq!(tree.preorder().collect::<Vec<_>>(), vec![&3, &1, &0, &2, &5, &4, &6]);
    /// ```
    pub fn rebalance(&mut self) {
        log::debug!(
            "rebalancing {} elements, height before: {:?}",
            self.size,
            self.height()
        );

        let mut slots: Vec<Option<T>> = self.drain_sorted().into_iter().map(Some).collect();
        for index in util::median_order(slots.len()) {
            if let Some(item) = slots[index].take() {
                self.insert(item);
            }
        }

        log::debug!("rebalanced, height after: {:?}", self.height());
    }

    /// Walks from `link` towards `item` and returns the link that holds an element equal to
    /// `item`, or the empty link where the search ran out.
    fn search_link<'a>(mut link: &'a mut Link<T>, item: &T) -> &'a mut Link<T> {
        loop {
            // Only a shared borrow is held while deciding, so `link` can still be returned.
            let go_left = match link.as_deref().map(|node| item.cmp(&node.value)) {
                Some(Ordering::Less) => true,
                Some(Ordering::Greater) => false,
                Some(Ordering::Equal) | None => return link,
            };
            let Some(node) = link else { return link };
            link = if go_left {
                &mut node.left
            } else {
                &mut node.right
            };
        }
    }
}

/// Draws the tree on its side: the root is in the first column, right subtrees are above their
/// parent and left subtrees below. Each level of depth is indented by `"| "`.
impl<T> fmt::Display for Tree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<(&Node<T>, usize)> = Vec::new();
        let mut next = self.root.as_deref().map(|node| (node, 0));
        loop {
            while let Some((node, depth)) = next {
                stack.push((node, depth));
                next = node.right.as_deref().map(|right| (right, depth + 1));
            }
            let Some((node, depth)) = stack.pop() else {
                return Ok(());
            };
            writeln!(f, "{}{}", "| ".repeat(depth), node.value)?;
            next = node.left.as_deref().map(|left| (left, depth + 1));
        }
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inorder()).finish()
    }
}

/// Two trees are equal when they hold equal elements in the same preorder sequence. Trees built
/// from the same elements inserted in different orders usually compare unequal.
impl<T> PartialEq for Tree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<T> Eq for Tree<T> where T: Eq {}

/// Copies the tree node for node, so the clone has exactly the same shape.
impl<T> Clone for Tree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        // Source nodes are visited in postorder. Every finished subtree (or empty slot) is pushed
        // onto `built`, so a node's right and left copies are the two topmost entries when the
        // node itself is finished.
        let mut pending = vec![(self.root.as_deref(), false)];
        let mut built: Vec<Link<T>> = Vec::new();
        while let Some((node, expanded)) = pending.pop() {
            match (node, expanded) {
                (None, _) => built.push(None),
                (Some(node), false) => {
                    pending.push((Some(node), true));
                    pending.push((node.right.as_deref(), false));
                    pending.push((node.left.as_deref(), false));
                }
                (Some(node), true) => {
                    let right = built.pop().flatten();
                    let left = built.pop().flatten();
                    built.push(Some(Box::new(Node {
                        value: node.value.clone(),
                        left,
                        right,
                    })));
                }
            }
        }

        Self {
            root: built.pop().flatten(),
            size: self.size,
        }
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Preorder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.preorder()
    }
}

impl<T> IntoIterator for Tree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter::new(self.root.take())
    }
}
