//! An AVL tree and an ordered map with a caller-supplied total order.
//!
//! [`AvlTree`] stores unique elements, keeps every node's subtree heights within
//! one of each other and supports search, min/max, pre/in/post-order visits and
//! bidirectional [`Cursor`]s. [`TreeMap`] stores `(key, value)` entries in the
//! same tree, ordered by key only.
//!
//! Orderings are [`Compare`] implementations from the `compare` crate; any
//! `Fn(&T, &T) -> Ordering` closure qualifies and [`Natural`] defers to `Ord`.
//!
//! Nodes live in an index-addressed arena, so rotations and removals never
//! leave dangling links, and cursors carry a version stamp that turns use after
//! modification into [`Error::StaleCursor`].
//!
//! ```
//! use ordtree::{AvlTree, TreeMap};
//!
//! let mut tree = AvlTree::new();
//! for x in [10, 0, 5, 13, 12, 15] {
//!     tree.insert(x).unwrap();
//! }
//! tree.remove(&13);
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [0, 5, 10, 12, 15]);
//!
//! let mut map = TreeMap::new();
//! map.insert("b", 2).unwrap();
//! map.insert("a", 1).unwrap();
//! for (k, v) in &map {
//!     println!("{k} => {v}");
//! }
//! ```

mod arena;
mod cursor;
mod error;
pub mod map;
mod tree;

pub use compare::{natural, Compare, Natural};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use map::{MapCursor, TreeMap};
pub use tree::{AvlTree, Iter, VisitOrder};

#[cfg(test)]
mod tests;
