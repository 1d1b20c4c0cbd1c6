//! Ordered map backed by an arena-indexed red-black tree.
//!
//! Keys are held in comparator order with O(log n) insert, lookup, and
//! removal. Nodes live in a [`SlotArena`] and reference each other by
//! `Option<SlotId>`, so rotations are index reassignments and the tree
//! carries no raw pointers and no ownership cycles.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<K, V>>)
//!   ┌────────┬──────────────────────────────────────────────────────────┐
//!   │ SlotId │ Node { key, value, color, parent, left, right }          │
//!   ├────────┼──────────────────────────────────────────────────────────┤
//!   │ id_0   │ { key: 2, Black, parent: None,  left: id_1, right: id_2 }│
//!   │ id_1   │ { key: 1, Red,   parent: id_0,  left: None, right: None }│
//!   │ id_2   │ { key: 3, Red,   parent: id_0,  left: None, right: None }│
//!   └────────┴──────────────────────────────────────────────────────────┘
//!
//!                 root ──► [2 B]
//!                          /    \
//!                      [1 R]    [3 R]
//! ```
//!
//! ## Red-black invariants
//!
//! Maintained after every mutation:
//!
//! 1. Every node is red or black (absent children count as black).
//! 2. The root is black.
//! 3. No red node has a red child.
//! 4. Every path from a node to a leaf crosses the same number of black
//!    nodes.
//! 5. In-order traversal yields keys in strictly increasing comparator
//!    order, with no duplicates.
//!
//! ## Performance Characteristics
//!
//! | Operation                  | Time     | Notes                          |
//! |----------------------------|----------|--------------------------------|
//! | `insert` / `remove`        | O(log n) | At most three rotations        |
//! | `get` / `contains_key`     | O(log n) | Binary descent                 |
//! | `first_key_value` / `last` | O(log n) | Leftmost/rightmost descent     |
//! | `iter` / `keys` / `values` | O(n)     | Parent-link successor walk     |
//! | `clear`                    | O(n)     | Arena reset                    |
//!
//! ## Comparator contract
//!
//! The comparator must define a strict total order over keys. The tree does
//! not validate this; an inconsistent comparator silently corrupts the
//! ordering invariant. `check_invariants()` (debug/test builds) will detect
//! the corruption after the fact.
//!
//! ## Thread Safety
//!
//! `OrderedMap` is not thread-safe. Wrap it in a lock for concurrent use.
//!
//! ## Example Usage
//!
//! ```
//! use orderkit::map::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert_eq!(map.get(&2), Some(&"two"));
//!
//! map.remove(&2);
//! assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![1, 3]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::arena::{SlotArena, SlotId};
#[cfg(any(test, debug_assertions))]
use crate::error::InvariantError;

pub mod set;

pub use set::OrderedSet;

/// Caller-supplied strict total order over keys.
///
/// Shared by clones of a map, so cloning never re-captures comparator state.
pub type Comparator<K> = Arc<dyn Fn(&K, &K) -> Ordering + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: Option<SlotId>,
    left: Option<SlotId>,
    right: Option<SlotId>,
}

/// Ordered key-value map over an arena-indexed red-black tree.
pub struct OrderedMap<K, V> {
    arena: SlotArena<Node<K, V>>,
    root: Option<SlotId>,
    cmp: Comparator<K>,
}

impl<K: Ord + 'static, V> OrderedMap<K, V> {
    /// Creates an empty map ordered by the key type's natural order.
    pub fn new() -> Self {
        Self::with_comparator(Arc::new(|a: &K, b: &K| a.cmp(b)))
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map with a caller-supplied comparator.
    ///
    /// The comparator must define a strict total order; `Ordering::Equal`
    /// always means "same key, overwrite value".
    pub fn with_comparator(cmp: Comparator<K>) -> Self {
        Self {
            arena: SlotArena::new(),
            root: None,
            cmp,
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Drops every entry. The comparator is retained.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Inserts or overwrites; returns the previous value for the key.
    ///
    /// New keys are inserted red and the insertion fixup restores the
    /// red-black invariants. Overwrites replace the value in place with no
    /// rebalance.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut current = match self.root {
            Some(id) => id,
            None => {
                let id = self.arena.insert(Node {
                    key,
                    value,
                    color: Color::Black,
                    parent: None,
                    left: None,
                    right: None,
                });
                self.root = Some(id);
                return None;
            }
        };

        loop {
            let ordering = {
                let node = self.node(current)?;
                (self.cmp)(&key, &node.key)
            };
            match ordering {
                Ordering::Equal => {
                    let node = self.arena.get_mut(current)?;
                    return Some(std::mem::replace(&mut node.value, value));
                }
                Ordering::Less => match self.left_of(Some(current)) {
                    Some(left) => current = left,
                    None => {
                        let id = self.attach_leaf(key, value, current);
                        self.set_left(current, Some(id));
                        self.fix_after_insert(id);
                        return None;
                    }
                },
                Ordering::Greater => match self.right_of(Some(current)) {
                    Some(right) => current = right,
                    None => {
                        let id = self.attach_leaf(key, value, current);
                        self.set_right(current, Some(id));
                        self.fix_after_insert(id);
                        return None;
                    }
                },
            }
        }
    }

    /// Returns a reference to the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.find(key)?;
        self.node(id).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` and returns its value.
    ///
    /// A node with two children swaps payload with its in-order successor
    /// and the successor node (at most one child) is spliced out instead.
    /// Removing a black node triggers the deletion fixup.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.find(key)?;
        self.delete_node(id)
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let id = self.leftmost(self.root)?;
        self.node(id).map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let id = self.rightmost(self.root)?;
        self.node(id).map(|node| (&node.key, &node.value))
    }

    /// Returns the smallest key.
    pub fn first_key(&self) -> Option<&K> {
        self.first_key_value().map(|(k, _)| k)
    }

    /// Returns the largest key.
    pub fn last_key(&self) -> Option<&K> {
        self.last_key_value().map(|(k, _)| k)
    }

    /// Iterates entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            map: self,
            next: self.leftmost(self.root),
        }
    }

    /// Iterates keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Visits entries in ascending key order until `f` returns `false`.
    ///
    /// The traversal is not resumable; callers restart from the beginning.
    pub fn scan(&self, mut f: impl FnMut(&K, &V) -> bool) {
        let mut current = self.leftmost(self.root);
        while let Some(id) = current {
            let Some(node) = self.node(id) else { break };
            if !f(&node.key, &node.value) {
                break;
            }
            current = self.successor(id);
        }
    }

    /// Validates the red-black and ordering invariants.
    ///
    /// Intended for debug builds and tests after suspect operation
    /// sequences; all public operations preserve these invariants.
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.color(self.root) == Color::Red {
            return Err(InvariantError::new("root is red"));
        }
        if let Some(root) = self.root {
            if self.parent_of(Some(root)).is_some() {
                return Err(InvariantError::new("root has a parent link"));
            }
        }

        let counted = self.validate_subtree(self.root)?;
        if counted != self.arena.len() {
            return Err(InvariantError::new(format!(
                "reachable node count {} != arena len {}",
                counted,
                self.arena.len()
            )));
        }

        let mut prev: Option<&K> = None;
        let mut current = self.leftmost(self.root);
        while let Some(id) = current {
            let node = self
                .node(id)
                .ok_or_else(|| InvariantError::new("dangling node id in traversal"))?;
            if let Some(prev_key) = prev {
                if (self.cmp)(prev_key, &node.key) != Ordering::Less {
                    return Err(InvariantError::new("in-order keys not strictly increasing"));
                }
            }
            prev = Some(&node.key);
            current = self.successor(id);
        }
        Ok(())
    }

    // Returns the number of nodes in the subtree, verifying colors, black
    // heights, and parent back-links.
    #[cfg(any(test, debug_assertions))]
    fn validate_subtree(&self, id: Option<SlotId>) -> Result<usize, InvariantError> {
        self.black_height_and_count(id).map(|(_, count)| count)
    }

    #[cfg(any(test, debug_assertions))]
    fn black_height_and_count(
        &self,
        id: Option<SlotId>,
    ) -> Result<(usize, usize), InvariantError> {
        let Some(id) = id else {
            return Ok((1, 0));
        };
        let node = self
            .node(id)
            .ok_or_else(|| InvariantError::new("dangling child link"))?;

        if node.color == Color::Red
            && (self.color(node.left) == Color::Red || self.color(node.right) == Color::Red)
        {
            return Err(InvariantError::new("red node has a red child"));
        }
        for child in [node.left, node.right].into_iter().flatten() {
            if self.parent_of(Some(child)) != Some(id) {
                return Err(InvariantError::new("child parent link does not point back"));
            }
        }

        let (lh, lc) = self.black_height_and_count(node.left)?;
        let (rh, rc) = self.black_height_and_count(node.right)?;
        if lh != rh {
            return Err(InvariantError::new("black height mismatch"));
        }
        let own = if node.color == Color::Black { 1 } else { 0 };
        Ok((lh + own, lc + rc + 1))
    }

    // ------------------------------------------------------------------
    // Descent and traversal helpers
    // ------------------------------------------------------------------

    fn find(&self, key: &K) -> Option<SlotId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id)?;
            match (self.cmp)(key, &node.key) {
                Ordering::Equal => return Some(id),
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        None
    }

    fn leftmost(&self, mut current: Option<SlotId>) -> Option<SlotId> {
        let mut result = None;
        while let Some(id) = current {
            result = Some(id);
            current = self.left_of(Some(id));
        }
        result
    }

    fn rightmost(&self, mut current: Option<SlotId>) -> Option<SlotId> {
        let mut result = None;
        while let Some(id) = current {
            result = Some(id);
            current = self.right_of(Some(id));
        }
        result
    }

    // In-order successor via parent links: leftmost of the right subtree,
    // or the nearest ancestor reached from a left child.
    fn successor(&self, id: SlotId) -> Option<SlotId> {
        if let Some(right) = self.right_of(Some(id)) {
            return self.leftmost(Some(right));
        }
        let mut child = id;
        let mut parent = self.parent_of(Some(id));
        while let Some(p) = parent {
            if self.left_of(Some(p)) == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.parent_of(Some(p));
        }
        None
    }

    // ------------------------------------------------------------------
    // Null-safe link accessors (absent nodes read as black leaves)
    // ------------------------------------------------------------------

    fn node(&self, id: SlotId) -> Option<&Node<K, V>> {
        self.arena.get(id)
    }

    fn color(&self, id: Option<SlotId>) -> Color {
        id.and_then(|id| self.arena.get(id))
            .map(|node| node.color)
            .unwrap_or(Color::Black)
    }

    fn set_color(&mut self, id: Option<SlotId>, color: Color) {
        if let Some(node) = id.and_then(|id| self.arena.get_mut(id)) {
            node.color = color;
        }
    }

    fn parent_of(&self, id: Option<SlotId>) -> Option<SlotId> {
        id.and_then(|id| self.arena.get(id)).and_then(|n| n.parent)
    }

    fn left_of(&self, id: Option<SlotId>) -> Option<SlotId> {
        id.and_then(|id| self.arena.get(id)).and_then(|n| n.left)
    }

    fn right_of(&self, id: Option<SlotId>) -> Option<SlotId> {
        id.and_then(|id| self.arena.get(id)).and_then(|n| n.right)
    }

    fn set_parent(&mut self, id: Option<SlotId>, parent: Option<SlotId>) {
        if let Some(node) = id.and_then(|id| self.arena.get_mut(id)) {
            node.parent = parent;
        }
    }

    fn set_left(&mut self, id: SlotId, child: Option<SlotId>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.left = child;
        }
    }

    fn set_right(&mut self, id: SlotId, child: Option<SlotId>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.right = child;
        }
    }

    fn attach_leaf(&mut self, key: K, value: V, parent: SlotId) -> SlotId {
        self.arena.insert(Node {
            key,
            value,
            color: Color::Red,
            parent: Some(parent),
            left: None,
            right: None,
        })
    }

    // ------------------------------------------------------------------
    // Rotations
    // ------------------------------------------------------------------

    fn rotate_left(&mut self, p: SlotId) {
        let Some(r) = self.right_of(Some(p)) else {
            return;
        };
        let rl = self.left_of(Some(r));
        self.set_right(p, rl);
        self.set_parent(rl, Some(p));

        let parent = self.parent_of(Some(p));
        self.set_parent(Some(r), parent);
        match parent {
            None => self.root = Some(r),
            Some(gp) if self.left_of(Some(gp)) == Some(p) => self.set_left(gp, Some(r)),
            Some(gp) => self.set_right(gp, Some(r)),
        }
        self.set_left(r, Some(p));
        self.set_parent(Some(p), Some(r));
    }

    fn rotate_right(&mut self, p: SlotId) {
        let Some(l) = self.left_of(Some(p)) else {
            return;
        };
        let lr = self.right_of(Some(l));
        self.set_left(p, lr);
        self.set_parent(lr, Some(p));

        let parent = self.parent_of(Some(p));
        self.set_parent(Some(l), parent);
        match parent {
            None => self.root = Some(l),
            Some(gp) if self.right_of(Some(gp)) == Some(p) => self.set_right(gp, Some(l)),
            Some(gp) => self.set_left(gp, Some(l)),
        }
        self.set_right(l, Some(p));
        self.set_parent(Some(p), Some(l));
    }

    // ------------------------------------------------------------------
    // Fixups
    // ------------------------------------------------------------------

    // Restores invariants after inserting the red node `x`. Red uncle:
    // recolor and ascend two levels. Black uncle: one or two rotations and
    // the loop terminates.
    fn fix_after_insert(&mut self, x: SlotId) {
        let mut x = Some(x);
        while x != self.root && self.color(self.parent_of(x)) == Color::Red {
            let parent = self.parent_of(x);
            let grand = self.parent_of(parent);
            if parent == self.left_of(grand) {
                let uncle = self.right_of(grand);
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand, Color::Red);
                    x = grand;
                } else {
                    if x == self.right_of(parent) {
                        x = parent;
                        if let Some(id) = x {
                            self.rotate_left(id);
                        }
                    }
                    let parent = self.parent_of(x);
                    let grand = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grand, Color::Red);
                    if let Some(id) = grand {
                        self.rotate_right(id);
                    }
                }
            } else {
                let uncle = self.left_of(grand);
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand, Color::Red);
                    x = grand;
                } else {
                    if x == self.left_of(parent) {
                        x = parent;
                        if let Some(id) = x {
                            self.rotate_right(id);
                        }
                    }
                    let parent = self.parent_of(x);
                    let grand = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grand, Color::Red);
                    if let Some(id) = grand {
                        self.rotate_left(id);
                    }
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    // Restores the black-height balance after splicing out a black node.
    // `x` carries the deficit: red sibling rotates into the black-sibling
    // cases; a black sibling with two black children recolors and
    // propagates; a black sibling with a usable red child fixes the deficit
    // with one or two rotations and terminates.
    fn fix_after_delete(&mut self, x: SlotId) {
        let mut x = Some(x);
        while x != self.root && self.color(x) == Color::Black {
            let parent = self.parent_of(x);
            if x == self.left_of(parent) {
                let mut sib = self.right_of(parent);
                if self.color(sib) == Color::Red {
                    self.set_color(sib, Color::Black);
                    self.set_color(parent, Color::Red);
                    if let Some(id) = parent {
                        self.rotate_left(id);
                    }
                    sib = self.right_of(parent);
                }
                if self.color(self.left_of(sib)) == Color::Black
                    && self.color(self.right_of(sib)) == Color::Black
                {
                    self.set_color(sib, Color::Red);
                    x = parent;
                } else {
                    if self.color(self.right_of(sib)) == Color::Black {
                        self.set_color(self.left_of(sib), Color::Black);
                        self.set_color(sib, Color::Red);
                        if let Some(id) = sib {
                            self.rotate_right(id);
                        }
                        sib = self.right_of(parent);
                    }
                    self.set_color(sib, self.color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.right_of(sib), Color::Black);
                    if let Some(id) = parent {
                        self.rotate_left(id);
                    }
                    x = self.root;
                }
            } else {
                let mut sib = self.left_of(parent);
                if self.color(sib) == Color::Red {
                    self.set_color(sib, Color::Black);
                    self.set_color(parent, Color::Red);
                    if let Some(id) = parent {
                        self.rotate_right(id);
                    }
                    sib = self.left_of(parent);
                }
                if self.color(self.left_of(sib)) == Color::Black
                    && self.color(self.right_of(sib)) == Color::Black
                {
                    self.set_color(sib, Color::Red);
                    x = parent;
                } else {
                    if self.color(self.left_of(sib)) == Color::Black {
                        self.set_color(self.right_of(sib), Color::Black);
                        self.set_color(sib, Color::Red);
                        if let Some(id) = sib {
                            self.rotate_left(id);
                        }
                        sib = self.left_of(parent);
                    }
                    self.set_color(sib, self.color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.left_of(sib), Color::Black);
                    if let Some(id) = parent {
                        self.rotate_right(id);
                    }
                    x = self.root;
                }
            }
        }
        self.set_color(x, Color::Black);
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    fn delete_node(&mut self, mut p: SlotId) -> Option<V> {
        // Two children: move the in-order successor's payload into p and
        // splice out the successor instead. The successor carries p's old
        // payload out through the arena removal below.
        if self.left_of(Some(p)).is_some() && self.right_of(Some(p)).is_some() {
            let s = self.leftmost(self.right_of(Some(p)))?;
            let (p_node, s_node) = self.arena.get2_mut(p, s)?;
            std::mem::swap(&mut p_node.key, &mut s_node.key);
            std::mem::swap(&mut p_node.value, &mut s_node.value);
            p = s;
        }

        let replacement = self.left_of(Some(p)).or(self.right_of(Some(p)));
        if let Some(r) = replacement {
            // Splice p out, linking its single child to its parent.
            let parent = self.parent_of(Some(p));
            self.set_parent(Some(r), parent);
            match parent {
                None => self.root = Some(r),
                Some(gp) if self.left_of(Some(gp)) == Some(p) => self.set_left(gp, Some(r)),
                Some(gp) => self.set_right(gp, Some(r)),
            }
            if self.color(Some(p)) == Color::Black {
                self.fix_after_delete(r);
            }
        } else if self.parent_of(Some(p)).is_none() {
            self.root = None;
        } else {
            // Leaf: run the fixup with p still linked so sibling lookups
            // work, then detach it.
            if self.color(Some(p)) == Color::Black {
                self.fix_after_delete(p);
            }
            let parent = self.parent_of(Some(p));
            if let Some(gp) = parent {
                if self.left_of(Some(gp)) == Some(p) {
                    self.set_left(gp, None);
                } else if self.right_of(Some(gp)) == Some(p) {
                    self.set_right(gp, None);
                }
            }
        }

        self.arena.remove(p).map(|node| node.value)
    }
}

impl<K: Ord + 'static, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for OrderedMap<K, V> {
    /// Produces a structurally independent copy sharing the comparator.
    ///
    /// Entries are re-inserted into a fresh tree rather than copying the
    /// node graph, so no internal state aliases the source.
    fn clone(&self) -> Self {
        let mut copy = Self::with_comparator(Arc::clone(&self.cmp));
        for (key, value) in self.iter() {
            copy.insert(key.clone(), value.clone());
        }
        copy
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// In-order entry iterator over an [`OrderedMap`].
pub struct Iter<'a, K, V> {
    map: &'a OrderedMap<K, V>,
    next: Option<SlotId>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.map.node(id)?;
        self.next = self.map.successor(id);
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
