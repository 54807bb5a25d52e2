//! Bidirectional cursors over a tree.
//!
//! A [`Cursor`] does not borrow its tree. It remembers the tree's identity and
//! shape version instead, so using it after an insert, a remove or a clear is
//! reported as [`Error::StaleCursor`] rather than walking freed nodes.

use crate::arena::NodeId;
use crate::error::{Error, Result};
use crate::tree::{self, AvlTree, Link};

/// A position in an [`AvlTree`], obtained from [`AvlTree::first`] or [`AvlTree::last`].
///
/// ```
/// use ordtree::AvlTree;
/// let mut tree = AvlTree::new();
/// for x in [2, 1, 3] {
///     tree.insert(x).unwrap();
/// }
/// let mut cursor = tree.first();
/// let mut seen = Vec::new();
/// while cursor.is_valid() {
///     seen.push(*cursor.get(&tree).unwrap());
///     cursor.move_next(&tree).unwrap();
/// }
/// assert_eq!(seen, [1, 2, 3]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    current: Option<NodeId>,
    tree_id: u64,
    generation: u64,
}

impl Cursor {
    pub(crate) fn new<T, C>(tree: &AvlTree<T, C>, current: Link) -> Self {
        let (tree_id, generation) = tree.stamp();
        Self {
            current,
            tree_id,
            generation,
        }
    }

    /// Returns true while the cursor points at an element.
    pub fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the element under the cursor.
    pub fn get<'a, T, C>(&self, tree: &'a AvlTree<T, C>) -> Result<&'a T> {
        self.check(tree)?;
        match self.current {
            Some(id) => Ok(&tree.nodes().get(id).value),
            None => Err(Error::CursorExhausted),
        }
    }

    /// Advances to the in-order successor.
    /// Moving past the largest element invalidates the cursor; moving an invalid
    /// cursor does nothing.
    pub fn move_next<T, C>(&mut self, tree: &AvlTree<T, C>) -> Result<()> {
        self.check(tree)?;
        if let Some(id) = self.current {
            self.current = tree::successor(tree.nodes(), id);
        }
        Ok(())
    }

    /// Steps back to the in-order predecessor.
    /// Moving before the smallest element invalidates the cursor; moving an
    /// invalid cursor does nothing.
    pub fn move_prev<T, C>(&mut self, tree: &AvlTree<T, C>) -> Result<()> {
        self.check(tree)?;
        if let Some(id) = self.current {
            self.current = tree::predecessor(tree.nodes(), id);
        }
        Ok(())
    }

    fn check<T, C>(&self, tree: &AvlTree<T, C>) -> Result<()> {
        if tree.stamp() != (self.tree_id, self.generation) {
            return Err(Error::StaleCursor);
        }
        debug_assert!(self.current.map_or(true, |id| tree.nodes().contains(id)));
        Ok(())
    }
}
