//! An ordered map built on the AVL tree.
//!
//! Each node stores one `(key, value)` entry and only the key takes part in the
//! ordering. The map reuses the tree's comparator plumbing, traversal and
//! cursors; lookups descend with a key-only probe.

use std::cmp::Ordering;
use std::fmt;

use compare::{Compare, Natural};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::tree::{self, AvlTree, Link, VisitOrder};

/// An ordered map implemented with an AVL tree.
///
/// Keys are unique and there is no upsert: inserting an existing key fails.
///
/// ```
/// use ordtree::{Error, TreeMap};
/// let mut map = TreeMap::new();
/// map.insert(2, "two").unwrap();
/// map.insert(1, "one").unwrap();
/// assert_eq!(map.insert(1, "uno"), Err(Error::AlreadyExists));
/// assert_eq!(map.get(&1), Some(&"one"));
/// assert_eq!(map.keys(), [&1, &2]);
/// assert_eq!(map.remove(&1), Some("one"));
/// ```
pub struct TreeMap<K, V, C = Natural<K>> {
    tree: AvlTree<Entry<K, V>, KeyOrder<C>>,
}

#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    key: K,
    value: V,
}

/// Orders entries by key, ignoring values.
#[derive(Clone)]
pub(crate) struct KeyOrder<C>(C);

impl<K, V, C: Compare<K>> Compare<Entry<K, V>> for KeyOrder<C> {
    #[inline]
    fn compare(&self, lhs: &Entry<K, V>, rhs: &Entry<K, V>) -> Ordering {
        self.0.compare(&lhs.key, &rhs.key)
    }
}

/// An in-order iterator over the entries of a map.
pub struct Iter<'a, K, V> {
    tree_iter: tree::Iter<'a, Entry<K, V>>,
}

/// An in-order iterator over the values of a map.
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

/// A position in a [`TreeMap`], obtained from [`TreeMap::first`] or [`TreeMap::last`].
///
/// Behaves like [`Cursor`], yielding `(key, value)` pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapCursor {
    cursor: Cursor,
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Creates an empty map ordered by `K`'s `Ord` impl.
    /// No memory is allocated until the first entry is inserted.
    pub fn new() -> Self {
        Self::with_comparator(compare::natural())
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// Returns true if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns the key ordering the map was created with.
    pub fn comparator(&self) -> &C {
        &self.tree.comparator().0
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the keys in ascending order.
    pub fn keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        self.tree
            .visit(VisitOrder::InOrder, |entry| keys.push(&entry.key));
        keys
    }

    /// Returns an iterator over the values, in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { iter: self.iter() }
    }

    /// Returns an iterator over the entries, in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree_iter: self.tree.iter(),
        }
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.min().map(Entry::pair)
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.max().map(Entry::pair)
    }

    /// Calls `visitor` once for every entry in the given order.
    pub fn visit<'a, F>(&'a self, order: VisitOrder, mut visitor: F)
    where
        F: FnMut(&'a K, &'a V),
    {
        self.tree
            .visit(order, |entry| visitor(&entry.key, &entry.value));
    }

    /// Returns a cursor positioned at the entry with the smallest key.
    pub fn first(&self) -> MapCursor {
        MapCursor {
            cursor: self.tree.first(),
        }
    }

    /// Returns a cursor positioned at the entry with the largest key.
    pub fn last(&self) -> MapCursor {
        MapCursor {
            cursor: self.tree.last(),
        }
    }
}

impl<K, V, C: Compare<K>> TreeMap<K, V, C> {
    /// Creates an empty map whose keys are ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            tree: AvlTree::with_comparator(KeyOrder(comparator)),
        }
    }

    /// Inserts a key-value pair into the map.
    /// Fails with [`Error::AlreadyExists`](crate::Error::AlreadyExists) if the key
    /// is present; the stored value is left as it was.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        self.tree.insert(Entry { key, value })
    }

    /// Returns true if the map contains the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let id = self.find(key)?;
        Some(self.tree.nodes().get(id).value.pair())
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.tree.value_mut(id).value)
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.find(key)?;
        let Entry { key, value } = self.tree.remove_node(id);
        Some((key, value))
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.tree.check_consistency()
    }

    fn find(&self, key: &K) -> Link {
        let comparator = self.comparator();
        self.tree
            .find_by(|entry| comparator.compare(key, &entry.key))
    }
}

impl<K, V> Entry<K, V> {
    fn pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }
}

impl MapCursor {
    /// Returns true while the cursor points at an entry.
    pub fn is_valid(&self) -> bool {
        self.cursor.is_valid()
    }

    /// Returns the entry under the cursor.
    pub fn get<'a, K, V, C>(&self, map: &'a TreeMap<K, V, C>) -> Result<(&'a K, &'a V)> {
        self.cursor.get(&map.tree).map(Entry::pair)
    }

    /// Advances to the entry with the next larger key.
    pub fn move_next<K, V, C>(&mut self, map: &TreeMap<K, V, C>) -> Result<()> {
        self.cursor.move_next(&map.tree)
    }

    /// Steps back to the entry with the next smaller key.
    pub fn move_prev<K, V, C>(&mut self, map: &TreeMap<K, V, C>) -> Result<()> {
        self.cursor.move_prev(&map.tree)
    }
}

impl<K: Ord, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for TreeMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree_iter: self.tree_iter.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next().map(Entry::pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree_iter.next_back().map(Entry::pair)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, value)| value)
    }
}
