//! LRU cache: hash index + arena-backed intrusive recency list.
//!
//! [`LruCore`] is the single-threaded core; [`LruCache`] wraps it in a
//! `parking_lot::RwLock` and is the type intended for shared use.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         LruCore<K, V>                            │
//!   │                                                                  │
//!   │   index: FxHashMap<K, SlotId>                                    │
//!   │   ┌─────────┬─────────┐                                          │
//!   │   │  key a  │  id_0   │──────────────┐                           │
//!   │   │  key b  │  id_1   │────────┐     │                           │
//!   │   │  key c  │  id_2   │──┐     │     │                           │
//!   │   └─────────┴─────────┘  │     │     │                           │
//!   │                          ▼     ▼     ▼                           │
//!   │   arena (Entry { key, value, prev, next })                       │
//!   │                                                                  │
//!   │   head ──► [c] ◄──► [b] ◄──► [a] ◄── tail                        │
//!   │           (MRU)                (LRU)                             │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The index keyset and the list membership are always identical; list
//! order is recency of the last touching access; `len() <= capacity()` at
//! all times. Eviction is strict recency: the tail entry goes first, with
//! no frequency weighting.
//!
//! ## Lock discipline (`LruCache`)
//!
//! | Method                 | Lock  | Reason                             |
//! |------------------------|-------|------------------------------------|
//! | `get`                  | Write | Moves the entry to the MRU head    |
//! | `insert`               | Write | May evict + relink                 |
//! | `get_or_insert_with`   | Write | Loader runs under the lock         |
//! | `remove` / `pop_lru`   | Write | Unlinks                            |
//! | `resize` / `clear`     | Write | Evicts                             |
//! | `peek` / `contains`    | Read  | No reordering                      |
//! | `len` / `keys` / ...   | Read  | No reordering                      |
//!
//! A single lock covers index and list together; there is no per-entry
//! locking and no lock-free fast path. Under heavy concurrent writes the
//! lock is the throughput bound.
//!
//! ## Performance Characteristics
//!
//! | Operation  | Time     | Notes                        |
//! |------------|----------|------------------------------|
//! | `get`      | O(1) avg | Index lookup + list relink   |
//! | `insert`   | O(1) avg | May evict the tail first     |
//! | `peek`     | O(1) avg | Index lookup only            |
//! | `remove`   | O(1) avg | Index remove + unlink        |
//! | `keys`     | O(n)     | Walks the list MRU → LRU     |
//!
//! ## Example Usage
//!
//! ```
//! use orderkit::lru::LruCache;
//!
//! let cache: LruCache<&str, i32> = LruCache::new(3);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.insert("c", 3);
//! cache.get(&"a");        // protects "a" from the next eviction
//! cache.insert("d", 4);   // evicts "b", the least recently used
//!
//! assert!(!cache.contains(&"b"));
//! assert!(cache.contains(&"a"));
//! ```

use std::fmt;
use std::hash::Hash;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::arena::{SlotArena, SlotId};

struct Entry<K, V> {
    key: K,
    value: V,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Single-threaded LRU core: FxHashMap index into an arena-linked
/// recency list. Not thread-safe; see [`LruCache`] for shared use.
pub struct LruCore<K, V> {
    index: FxHashMap<K, SlotId>,
    arena: SlotArena<Entry<K, V>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a core holding at most `capacity` entries.
    ///
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Looks up `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = self.index.get(key).copied()?;
        self.move_to_head(id);
        self.arena.get(id).map(|entry| &entry.value)
    }

    /// Looks up `key` without altering recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = self.index.get(key).copied()?;
        self.arena.get(id).map(|entry| &entry.value)
    }

    /// Returns `true` if `key` is cached. Does not touch recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or overwrites; returns the previous value for the key.
    ///
    /// An existing key is overwritten and moved to the MRU head. A new key
    /// evicts the LRU tail first when the cache is full.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(id) = self.index.get(&key).copied() {
            self.move_to_head(id);
            let entry = self.arena.get_mut(id)?;
            return Some(std::mem::replace(&mut entry.value, value));
        }
        if self.len() >= self.capacity {
            self.pop_lru();
        }
        self.link_new(key, value);
        None
    }

    /// Returns the cached value for `key`, running `loader` on a miss.
    ///
    /// A hit counts as a touch. On a miss `loader` is invoked exactly once
    /// and its result is inserted (evicting the tail if needed).
    pub fn get_or_insert_with(&mut self, key: K, loader: impl FnOnce() -> V) -> &V {
        let id = if let Some(id) = self.index.get(&key).copied() {
            self.move_to_head(id);
            id
        } else {
            let value = loader();
            if self.len() >= self.capacity {
                self.pop_lru();
            }
            self.link_new(key, value)
        };
        // The entry was found or linked just above.
        &self.arena.get(id).expect("lru entry present").value
    }

    /// Removes `key` and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.detach(id);
        self.arena.remove(id).map(|entry| entry.value)
    }

    /// Evicts and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let id = self.tail?;
        self.detach(id);
        let entry = self.arena.remove(id)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Changes the capacity, evicting LRU entries until the cache fits.
    ///
    /// A capacity of 0 is clamped to 1.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.len() > self.capacity {
            self.pop_lru();
        }
    }

    /// Drops every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.index.clear();
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Returns keys ordered most recently used → least recently used.
    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut current = self.head;
        while let Some(id) = current {
            let Some(entry) = self.arena.get(id) else {
                break;
            };
            keys.push(entry.key.clone());
            current = entry.next;
        }
        keys
    }

    fn link_new(&mut self, key: K, value: V) -> SlotId {
        let id = self.arena.insert(Entry {
            key: key.clone(),
            value,
            prev: None,
            next: self.head,
        });
        if let Some(head) = self.head {
            if let Some(entry) = self.arena.get_mut(head) {
                entry.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        self.index.insert(key, id);
        id
    }

    fn detach(&mut self, id: SlotId) {
        let (prev, next) = match self.arena.get(id) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };
        match prev {
            Some(prev_id) => {
                if let Some(prev_entry) = self.arena.get_mut(prev_id) {
                    prev_entry.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_id) => {
                if let Some(next_entry) = self.arena.get_mut(next_id) {
                    next_entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(entry) = self.arena.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
    }

    fn move_to_head(&mut self, id: SlotId) {
        if self.head == Some(id) {
            return;
        }
        self.detach(id);
        let old_head = self.head;
        if let Some(entry) = self.arena.get_mut(id) {
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(old_head) = old_head {
            if let Some(head_entry) = self.arena.get_mut(old_head) {
                head_entry.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.capacity >= 1);
        assert!(self.len() <= self.capacity);
        assert_eq!(self.index.len(), self.arena.len());

        let mut seen = 0usize;
        let mut current = self.head;
        let mut prev = None;
        while let Some(id) = current {
            let entry = self.arena.get(id).expect("list node missing from arena");
            assert_eq!(entry.prev, prev);
            assert_eq!(self.index.get(&entry.key), Some(&id));
            prev = Some(id);
            current = entry.next;
            seen += 1;
            assert!(seen <= self.len());
        }
        assert_eq!(self.tail, prev);
        assert_eq!(seen, self.len());
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("keys_mru", &self.keys())
            .finish()
    }
}

/// Thread-safe LRU cache: [`LruCore`] behind a `parking_lot::RwLock`.
///
/// One lock covers the index and the recency list as a single critical
/// section. `get` takes the write lock because a hit reorders the list;
/// `peek` and the size accessors take the read lock.
pub struct LruCache<K, V> {
    inner: RwLock<LruCore<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries (0 clamps to 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(LruCore::new(capacity)),
        }
    }

    /// Looks up `key`, marking it most recently used on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut core = self.inner.write();
        core.get(key).cloned()
    }

    /// Looks up `key` without altering recency order.
    pub fn peek(&self, key: &K) -> Option<V> {
        let core = self.inner.read();
        core.peek(key).cloned()
    }

    /// Returns `true` if `key` is cached. Does not touch recency order.
    pub fn contains(&self, key: &K) -> bool {
        let core = self.inner.read();
        core.contains(key)
    }

    /// Inserts or overwrites; returns the previous value for the key.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let mut core = self.inner.write();
        core.insert(key, value)
    }

    /// Returns the cached value for `key`, running `loader` on a miss.
    ///
    /// `loader` executes while the write lock is held: keep it fast, and
    /// never call back into the same cache from inside it.
    pub fn get_or_insert_with(&self, key: K, loader: impl FnOnce() -> V) -> V {
        let mut core = self.inner.write();
        core.get_or_insert_with(key, loader).clone()
    }

    /// Removes `key` and returns its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut core = self.inner.write();
        core.remove(key)
    }

    /// Evicts and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, V)> {
        let mut core = self.inner.write();
        core.pop_lru()
    }

    /// Changes the capacity (0 clamps to 1), evicting LRU entries to fit.
    pub fn resize(&self, capacity: usize) {
        let mut core = self.inner.write();
        core.resize(capacity);
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let mut core = self.inner.write();
        core.clear();
    }

    /// Returns keys ordered most recently used → least recently used.
    pub fn keys(&self) -> Vec<K> {
        let core = self.inner.read();
        core.keys()
    }

    pub fn len(&self) -> usize {
        let core = self.inner.read();
        core.len()
    }

    pub fn is_empty(&self) -> bool {
        let core = self.inner.read();
        core.is_empty()
    }

    pub fn capacity(&self) -> usize {
        let core = self.inner.read();
        core.capacity()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.read();
        f.debug_struct("LruCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_zero_is_clamped_to_one() {
        let mut core: LruCore<u32, u32> = LruCore::new(0);
        assert_eq!(core.capacity(), 1);
        core.insert(1, 10);
        core.insert(2, 20);
        assert_eq!(core.len(), 1);
        assert!(core.contains(&2));
        core.debug_validate_invariants();
    }

    #[test]
    fn eviction_is_strict_recency() {
        // capacity 3: a b c, touch a, insert d => b evicted.
        let mut core = LruCore::new(3);
        core.insert("a", 1);
        core.insert("b", 2);
        core.insert("c", 3);
        assert_eq!(core.get(&"a"), Some(&1));
        core.insert("d", 4);

        assert!(!core.contains(&"b"));
        assert!(core.contains(&"a"));
        assert!(core.contains(&"c"));
        assert!(core.contains(&"d"));
        core.debug_validate_invariants();
    }

    #[test]
    fn insert_overwrites_and_touches() {
        let mut core = LruCore::new(2);
        assert_eq!(core.insert(1, "a"), None);
        assert_eq!(core.insert(2, "b"), None);
        assert_eq!(core.insert(1, "a2"), Some("a"));
        // 1 is now MRU, so inserting 3 evicts 2.
        core.insert(3, "c");
        assert!(core.contains(&1));
        assert!(!core.contains(&2));
        core.debug_validate_invariants();
    }

    #[test]
    fn peek_and_contains_do_not_touch() {
        let mut core = LruCore::new(2);
        core.insert(1, "a");
        core.insert(2, "b");
        assert_eq!(core.peek(&1), Some(&"a"));
        assert!(core.contains(&1));
        // 1 was only peeked, so it is still LRU and gets evicted.
        core.insert(3, "c");
        assert!(!core.contains(&1));
        core.debug_validate_invariants();
    }

    #[test]
    fn get_or_insert_with_runs_loader_once() {
        let mut core = LruCore::new(2);
        let mut calls = 0;
        let v = *core.get_or_insert_with(1, || {
            calls += 1;
            10
        });
        assert_eq!(v, 10);
        assert_eq!(calls, 1);

        let mut calls2 = 0;
        let v = *core.get_or_insert_with(1, || {
            calls2 += 1;
            99
        });
        assert_eq!(v, 10);
        assert_eq!(calls2, 0);
        core.debug_validate_invariants();
    }

    #[test]
    fn remove_and_pop_lru() {
        let mut core = LruCore::new(3);
        core.insert(1, "a");
        core.insert(2, "b");
        core.insert(3, "c");

        assert_eq!(core.remove(&2), Some("b"));
        assert_eq!(core.remove(&2), None);
        assert_eq!(core.pop_lru(), Some((1, "a")));
        assert_eq!(core.pop_lru(), Some((3, "c")));
        assert_eq!(core.pop_lru(), None);
        assert!(core.is_empty());
        core.debug_validate_invariants();
    }

    #[test]
    fn resize_shrink_evicts_lru_entries() {
        let mut core = LruCore::new(4);
        for k in 1..=4 {
            core.insert(k, k);
        }
        core.get(&1);
        core.resize(2);
        assert_eq!(core.capacity(), 2);
        assert_eq!(core.len(), 2);
        // Survivors: the two most recently used (4, then the touched 1).
        assert!(core.contains(&1));
        assert!(core.contains(&4));
        core.debug_validate_invariants();

        core.resize(0);
        assert_eq!(core.capacity(), 1);
        assert_eq!(core.len(), 1);
    }

    #[test]
    fn keys_are_mru_to_lru() {
        let mut core = LruCore::new(3);
        core.insert("a", 1);
        core.insert("b", 2);
        core.insert("c", 3);
        assert_eq!(core.keys(), vec!["c", "b", "a"]);
        core.get(&"a");
        assert_eq!(core.keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn clear_resets_but_keeps_capacity() {
        let mut core = LruCore::new(2);
        core.insert(1, "a");
        core.clear();
        assert!(core.is_empty());
        assert_eq!(core.capacity(), 2);
        core.insert(2, "b");
        assert_eq!(core.get(&2), Some(&"b"));
        core.debug_validate_invariants();
    }

    #[test]
    fn concurrent_wrapper_basic_ops() {
        let cache: LruCache<u32, String> = LruCache::new(2);
        assert_eq!(cache.insert(1, "a".into()), None);
        assert_eq!(cache.get(&1), Some("a".into()));
        assert_eq!(cache.peek(&1), Some("a".into()));

        cache.insert(2, "b".into());
        cache.insert(3, "c".into());
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert_eq!(cache.len(), 2);

        let loaded = cache.get_or_insert_with(9, || "loaded".into());
        assert_eq!(loaded, "loaded");
        assert_eq!(cache.remove(&9), Some("loaded".into()));
        cache.clear();
        assert!(cache.is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(u8, u16),
        Get(u8),
        Peek(u8),
        Remove(u8),
        PopLru,
        Resize(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
            any::<u8>().prop_map(Op::Get),
            any::<u8>().prop_map(Op::Peek),
            any::<u8>().prop_map(Op::Remove),
            Just(Op::PopLru),
            (1u8..16).prop_map(Op::Resize),
        ]
    }

    proptest! {
        /// Property: invariants hold and len never exceeds capacity across
        /// arbitrary operation sequences.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_invariants_always_hold(
            capacity in 1usize..8,
            ops in prop::collection::vec(op_strategy(), 0..200),
        ) {
            let mut core: LruCore<u8, u16> = LruCore::new(capacity);
            for op in ops {
                match op {
                    Op::Insert(k, v) => { core.insert(k, v); }
                    Op::Get(k) => { core.get(&k); }
                    Op::Peek(k) => { core.peek(&k); }
                    Op::Remove(k) => { core.remove(&k); }
                    Op::PopLru => { core.pop_lru(); }
                    Op::Resize(c) => { core.resize(c as usize); }
                }
                core.debug_validate_invariants();
                prop_assert!(core.len() <= core.capacity());
            }
        }

        /// Property: keys() order equals the reverse access order of the
        /// surviving keys.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_keys_match_recency_model(
            inserts in prop::collection::vec(any::<u8>(), 1..64),
        ) {
            let mut core: LruCore<u8, ()> = LruCore::new(8);
            let mut model: Vec<u8> = Vec::new();

            for k in inserts {
                core.insert(k, ());
                model.retain(|&m| m != k);
                model.insert(0, k);
                model.truncate(8);
            }
            prop_assert_eq!(core.keys(), model);
        }
    }
}
