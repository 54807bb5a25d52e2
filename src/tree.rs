//! The AVL tree engine.

use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use compare::{Compare, Natural};

use crate::arena::{Arena, NodeId};
use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// An ordered collection of unique elements kept in an AVL-balanced binary search tree.
///
/// Elements are ordered by a [`Compare`] implementation; two elements comparing equal are
/// duplicates and cannot both be stored.
///
/// ```
/// use ordtree::{AvlTree, Error};
/// let mut tree = AvlTree::new();
/// tree.insert(10).unwrap();
/// tree.insert(5).unwrap();
/// assert_eq!(tree.insert(10), Err(Error::AlreadyExists));
/// assert_eq!(tree.min(), Some(&5));
/// assert_eq!(tree.remove(&5), Some(5));
/// assert_eq!(tree.len(), 1);
/// ```
pub struct AvlTree<T, C = Natural<T>> {
    nodes: Arena<Node<T>>,
    root: Link,
    num_nodes: usize,
    comparator: C,
    id: u64,
    generation: u64,
}

/// Traversal orders accepted by [`AvlTree::visit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitOrder {
    PreOrder,
    InOrder,
    PostOrder,
}

/// An in-order iterator over the elements of a tree.
pub struct Iter<'a, T> {
    nodes: &'a Arena<Node<T>>,
    front: Link,
    back: Link,
    remaining: usize,
}

pub(crate) type Link = Option<NodeId>;

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    parent: Link,
    left: Link,
    right: Link,
    height: usize,
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

fn next_tree_id() -> u64 {
    NEXT_TREE_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

impl<T: Ord> AvlTree<T> {
    /// Creates an empty tree ordered by `T`'s `Ord` impl.
    /// No memory is allocated until the first element is inserted.
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }
}

impl<T, C> AvlTree<T, C> {
    /// Returns true if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single element.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    /// Returns the ordering the tree was created with.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Removes all elements, deallocating node storage.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.num_nodes = 0;
        self.generation += 1;
    }

    /// Returns the smallest element.
    pub fn min(&self) -> Option<&T> {
        self.root
            .map(|root| &self.nodes.get(min_in(&self.nodes, root)).value)
    }

    /// Returns the largest element.
    pub fn max(&self) -> Option<&T> {
        self.root
            .map(|root| &self.nodes.get(max_in(&self.nodes, root)).value)
    }

    /// Calls `visitor` once for every element in the given order.
    ///
    /// Any accumulator is captured by the closure:
    ///
    /// ```
    /// use ordtree::{AvlTree, VisitOrder};
    /// let mut tree = AvlTree::new();
    /// for x in [2, 1, 3] {
    ///     tree.insert(x).unwrap();
    /// }
    /// let mut pre = Vec::new();
    /// tree.visit(VisitOrder::PreOrder, |x| pre.push(*x));
    /// assert_eq!(pre, [2, 1, 3]);
    /// ```
    pub fn visit<'a, F>(&'a self, order: VisitOrder, mut visitor: F)
    where
        F: FnMut(&'a T),
    {
        let nodes = &self.nodes;
        let mut visit = |id: NodeId| visitor(&nodes.get(id).value);
        match order {
            VisitOrder::PreOrder => self.traverse(&mut visit, |_| {}, |_| {}),
            VisitOrder::InOrder => self.traverse(|_| {}, &mut visit, |_| {}),
            VisitOrder::PostOrder => self.traverse(|_| {}, |_| {}, &mut visit),
        }
    }

    /// Returns an in-order iterator over the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.root.map(|root| min_in(&self.nodes, root)),
            back: self.root.map(|root| max_in(&self.nodes, root)),
            remaining: self.num_nodes,
        }
    }

    /// Returns a cursor positioned at the smallest element.
    /// The cursor is invalid if the tree is empty.
    pub fn first(&self) -> Cursor {
        Cursor::new(self, self.root.map(|root| min_in(&self.nodes, root)))
    }

    /// Returns a cursor positioned at the largest element.
    /// The cursor is invalid if the tree is empty.
    pub fn last(&self) -> Cursor {
        Cursor::new(self, self.root.map(|root| max_in(&self.nodes, root)))
    }

    pub(crate) fn nodes(&self) -> &Arena<Node<T>> {
        &self.nodes
    }

    /// Identity and shape version, used to detect stale cursors.
    pub(crate) fn stamp(&self) -> (u64, u64) {
        (self.id, self.generation)
    }

    pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes.get_mut(id).value
    }

    /// Descends from the root; `probe` compares the target against a stored element.
    pub(crate) fn find_by<F>(&self, mut probe: F) -> Link
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.nodes.get(id);
            current = match probe(&node.value) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        current
    }

    /// Unlinks the node and returns the element that was stored in it.
    ///
    /// A node with two children takes over its in-order successor's element and
    /// the successor, which has no left child, is spliced out instead.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> T {
        debug_assert!(self.num_nodes >= 1);
        let node = self.nodes.get(id);
        let target = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let successor = min_in(&self.nodes, right);
                let (node, successor_node) = self.nodes.get2_mut(id, successor);
                mem::swap(&mut node.value, &mut successor_node.value);
                successor
            }
            _ => id,
        };

        let node = self.nodes.get(target);
        debug_assert!(node.left.is_none() || node.right.is_none());
        let parent = node.parent;
        let child = node.left.or(node.right);
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = parent;
        }
        self.replace_child(parent, target, child);

        let removed = self.nodes.take(target);
        self.num_nodes -= 1;
        self.generation += 1;
        debug_assert_eq!(self.nodes.len(), self.num_nodes);
        if self.num_nodes == 0 {
            // Last node was the root; drop the vacant slots too.
            debug_assert!(parent.is_none());
            self.nodes.clear();
            self.root = None;
        }
        self.rebalance_after_remove(parent);
        removed.value
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        self.nodes.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.nodes.get_mut(id)
    }

    fn height_of(&self, link: Link) -> usize {
        match link {
            None => 0,
            Some(id) => self.node(id).height,
        }
    }

    fn balance(&self, id: NodeId) -> isize {
        let node = self.node(id);
        self.height_of(node.left) as isize - self.height_of(node.right) as isize
    }

    fn adjust_height(&mut self, id: NodeId) {
        let node = self.node(id);
        let height = 1 + cmp::max(self.height_of(node.left), self.height_of(node.right));
        self.node_mut(id).height = height;
    }

    // Points `parent`'s link that refers to `old` (or the root) at `new`.
    fn replace_child(&mut self, parent: Link, old: NodeId, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent_id) => {
                let parent_node = self.node_mut(parent_id);
                if parent_node.left == Some(old) {
                    parent_node.left = new;
                } else {
                    debug_assert_eq!(parent_node.right, Some(old));
                    parent_node.right = new;
                }
            }
        }
    }

    fn rotate_left(&mut self, id: NodeId) {
        if let Some(right) = self.node(id).right {
            let right_left = self.node(right).left;
            self.node_mut(id).right = right_left;
            if let Some(right_left) = right_left {
                self.node_mut(right_left).parent = Some(id);
            }

            let parent = self.node(id).parent;
            self.node_mut(right).parent = parent;
            self.replace_child(parent, id, Some(right));

            self.node_mut(right).left = Some(id);
            self.node_mut(id).parent = Some(right);

            self.adjust_height(id);
            self.adjust_height(right);
        }
    }

    fn rotate_right(&mut self, id: NodeId) {
        if let Some(left) = self.node(id).left {
            let left_right = self.node(left).right;
            self.node_mut(id).left = left_right;
            if let Some(left_right) = left_right {
                self.node_mut(left_right).parent = Some(id);
            }

            let parent = self.node(id).parent;
            self.node_mut(left).parent = parent;
            self.replace_child(parent, id, Some(left));

            self.node_mut(left).right = Some(id);
            self.node_mut(id).parent = Some(left);

            self.adjust_height(id);
            self.adjust_height(left);
        }
    }

    // After a removal there is no new element to steer by, so the case is
    // picked by the balance of the child on the taller side.
    fn rebalance_after_remove(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(id) = current {
            let parent = self.node(id).parent;
            self.adjust_height(id);
            let balance = self.balance(id);
            debug_assert!((-2..=2).contains(&balance));
            if balance > 1 {
                if let Some(left) = self.node(id).left {
                    if self.balance(left) < 0 {
                        self.rotate_left(left);
                    }
                }
                self.rotate_right(id);
            } else if balance < -1 {
                if let Some(right) = self.node(id).right {
                    if self.balance(right) > 0 {
                        self.rotate_right(right);
                    }
                }
                self.rotate_left(id);
            }
            current = parent;
        }
    }

    fn traverse<Pre, In, Post>(&self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(NodeId),
        In: FnMut(NodeId),
        Post: FnMut(NodeId),
    {
        if let Some(mut id) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                let node = self.node(id);
                match dir {
                    Direction::FromParent => {
                        preorder(id);
                        if let Some(left) = node.left {
                            id = left;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(id);
                        if let Some(right) = node.right {
                            id = right;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        postorder(id);
                        match node.parent {
                            Some(parent) => {
                                if self.node(parent).left == Some(id) {
                                    dir = Direction::FromLeft;
                                } else {
                                    dir = Direction::FromRight;
                                }
                                id = parent;
                            }
                            None => break,
                        }
                    }
                }
            }
        }
    }
}

impl<T, C: Compare<T>> AvlTree<T, C> {
    /// Creates an empty tree ordered by `comparator`.
    ///
    /// ```
    /// use ordtree::AvlTree;
    /// let mut tree = AvlTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// for x in [1, 3, 2] {
    ///     tree.insert(x).unwrap();
    /// }
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            num_nodes: 0,
            comparator,
            id: next_tree_id(),
            generation: 0,
        }
    }

    /// Returns true if an element equal to `value` is stored.
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Returns the stored element equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find(value).map(|id| &self.node(id).value)
    }

    /// Inserts an element.
    ///
    /// Fails with [`Error::AlreadyExists`] if an equal element is stored and with
    /// [`Error::AllocationFailed`] if no node could be allocated. In both cases the
    /// tree is unchanged.
    pub fn insert(&mut self, value: T) -> Result<()> {
        let (parent, side) = self.find_insert_pos(&value)?;
        let id = self.nodes.try_alloc(Node {
            value,
            parent,
            left: None,
            right: None,
            height: 1,
        })?;
        match (parent, side) {
            (None, _) => self.root = Some(id),
            (Some(parent_id), Side::Left) => self.node_mut(parent_id).left = Some(id),
            (Some(parent_id), Side::Right) => self.node_mut(parent_id).right = Some(id),
        }
        self.num_nodes += 1;
        self.generation += 1;
        self.rebalance_after_insert(id);
        Ok(())
    }

    /// Removes the element equal to `value` and returns it.
    /// Returns `None`, leaving the tree untouched, if there is no such element.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let id = self.find(value)?;
        Some(self.remove_node(id))
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        // Check root link
        if let Some(root) = self.root {
            assert!(self.node(root).parent.is_none());
        }

        // Check tree nodes
        let mut num_nodes = 0;
        self.traverse(
            |id| {
                let node = self.node(id);

                // Check link for left child node
                if let Some(left) = node.left {
                    assert_eq!(self.node(left).parent, Some(id));
                    assert_eq!(
                        self.comparator.compare(&self.node(left).value, &node.value),
                        Ordering::Less
                    );
                }

                // Check link for right child node
                if let Some(right) = node.right {
                    assert_eq!(self.node(right).parent, Some(id));
                    assert_eq!(
                        self.comparator.compare(&self.node(right).value, &node.value),
                        Ordering::Greater
                    );
                }

                // Check height
                let left_height = self.height_of(node.left);
                let right_height = self.height_of(node.right);
                assert_eq!(node.height, 1 + cmp::max(left_height, right_height));

                // Check AVL condition (nearly balance)
                assert!(left_height <= right_height + 1);
                assert!(right_height <= left_height + 1);

                num_nodes += 1;
            },
            |_| {},
            |_| {},
        );

        // Check global order, not only parent/child pairs
        let mut prev: Option<&T> = None;
        for value in self.iter() {
            if let Some(prev) = prev {
                assert_eq!(self.comparator.compare(prev, value), Ordering::Less);
            }
            prev = Some(value);
        }

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
        assert_eq!(self.nodes.len(), self.num_nodes);
    }

    fn find(&self, value: &T) -> Link {
        let comparator = &self.comparator;
        self.find_by(|stored| comparator.compare(value, stored))
    }

    fn find_insert_pos(&self, value: &T) -> Result<(Link, Side)> {
        let mut parent: Link = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            parent = Some(id);
            current = match self.comparator.compare(value, &node.value) {
                Ordering::Equal => return Err(Error::AlreadyExists),
                Ordering::Less => {
                    side = Side::Left;
                    node.left
                }
                Ordering::Greater => {
                    side = Side::Right;
                    node.right
                }
            };
        }
        Ok((parent, side))
    }

    // Walks from the new leaf's parent to the root. An unbalanced ancestor is
    // fixed by comparing the new element against the child on the taller side:
    // outside grandchild -> single rotation, inside grandchild -> double rotation.
    fn rebalance_after_insert(&mut self, inserted: NodeId) {
        let mut current = self.node(inserted).parent;
        while let Some(id) = current {
            let parent = self.node(id).parent;
            self.adjust_height(id);
            let balance = self.balance(id);
            debug_assert!((-2..=2).contains(&balance));
            if balance > 1 {
                if let Some(left) = self.node(id).left {
                    let ord = self
                        .comparator
                        .compare(&self.node(inserted).value, &self.node(left).value);
                    if ord == Ordering::Greater {
                        self.rotate_left(left);
                    }
                    self.rotate_right(id);
                }
            } else if balance < -1 {
                if let Some(right) = self.node(id).right {
                    let ord = self
                        .comparator
                        .compare(&self.node(inserted).value, &self.node(right).value);
                    if ord == Ordering::Less {
                        self.rotate_right(right);
                    }
                    self.rotate_left(id);
                }
            }
            current = parent;
        }
    }
}

// Leftmost node of the subtree rooted at `id`.
pub(crate) fn min_in<T>(nodes: &Arena<Node<T>>, mut id: NodeId) -> NodeId {
    while let Some(left) = nodes.get(id).left {
        id = left;
    }
    id
}

// Rightmost node of the subtree rooted at `id`.
pub(crate) fn max_in<T>(nodes: &Arena<Node<T>>, mut id: NodeId) -> NodeId {
    while let Some(right) = nodes.get(id).right {
        id = right;
    }
    id
}

/// In-order successor: leftmost node of the right subtree, or the first
/// ancestor reached through a left-child edge.
pub(crate) fn successor<T>(nodes: &Arena<Node<T>>, id: NodeId) -> Link {
    if let Some(right) = nodes.get(id).right {
        return Some(min_in(nodes, right));
    }
    let mut child = id;
    let mut parent = nodes.get(id).parent;
    while let Some(parent_id) = parent {
        if nodes.get(parent_id).left == Some(child) {
            break;
        }
        child = parent_id;
        parent = nodes.get(parent_id).parent;
    }
    parent
}

/// In-order predecessor, mirror of [`successor`].
pub(crate) fn predecessor<T>(nodes: &Arena<Node<T>>, id: NodeId) -> Link {
    if let Some(left) = nodes.get(id).left {
        return Some(max_in(nodes, left));
    }
    let mut child = id;
    let mut parent = nodes.get(id).parent;
    while let Some(parent_id) = parent {
        if nodes.get(parent_id).right == Some(child) {
            break;
        }
        child = parent_id;
        parent = nodes.get(parent_id).parent;
    }
    parent
}

impl<T: Ord> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Clone> Clone for AvlTree<T, C> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            num_nodes: self.num_nodes,
            comparator: self.comparator.clone(),
            id: next_tree_id(),
            generation: 0,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTree<T, C> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Auto derived clone would require T: Clone
impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = successor(self.nodes, id);
        Some(&self.nodes.get(id).value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = predecessor(self.nodes, id);
        Some(&self.nodes.get(id).value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
