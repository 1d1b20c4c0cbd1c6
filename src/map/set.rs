//! Ordered set as a unit-value projection of [`OrderedMap`].

use std::fmt;

use super::{Comparator, OrderedMap};

/// Ordered set of keys; a thin wrapper over `OrderedMap<K, ()>`.
pub struct OrderedSet<K> {
    map: OrderedMap<K, ()>,
}

impl<K: Ord + 'static> OrderedSet<K> {
    /// Creates an empty set ordered by the key type's natural order.
    pub fn new() -> Self {
        Self {
            map: OrderedMap::new(),
        }
    }
}

impl<K> OrderedSet<K> {
    /// Creates an empty set with a caller-supplied comparator.
    pub fn with_comparator(cmp: Comparator<K>) -> Self {
        Self {
            map: OrderedMap::with_comparator(cmp),
        }
    }

    /// Adds `key`; returns `true` if it was not already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.map.insert(key, ()).is_none()
    }

    /// Removes `key`; returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the smallest key.
    pub fn first(&self) -> Option<&K> {
        self.map.first_key()
    }

    /// Returns the largest key.
    pub fn last(&self) -> Option<&K> {
        self.map.last_key()
    }

    /// Iterates keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Visits keys in ascending order until `f` returns `false`.
    pub fn scan(&self, mut f: impl FnMut(&K) -> bool) {
        self.map.scan(|k, _| f(k));
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K: Ord + 'static> Default for OrderedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Clone for OrderedSet<K> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for OrderedSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord + 'static> FromIterator<K> for OrderedSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}
