//! orderkit: ordered and associative container primitives.
//!
//! Four independent components: [`map::OrderedMap`] / [`map::OrderedSet`]
//! (arena-indexed red-black tree), [`lru::LruCache`] (hash index + intrusive
//! recency list, internally synchronized), [`deque::RingDeque`] (power-of-two
//! ring buffer), and [`heap::PriorityQueue`] (binary heap with a supplied
//! priority predicate).
//!
//! Absence is always an `Option`, never a sentinel. Only the LRU cache is
//! thread-safe; the other containers expect external synchronization when
//! shared.

pub mod arena;
pub mod deque;
pub mod error;
pub mod heap;
pub mod lru;
pub mod map;
pub mod prelude;
