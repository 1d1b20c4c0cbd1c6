pub use crate::arena::{SlotArena, SlotId};
pub use crate::deque::RingDeque;
pub use crate::error::InvariantError;
pub use crate::heap::{LessFn, PriorityQueue};
pub use crate::lru::{LruCache, LruCore};
pub use crate::map::{Comparator, OrderedMap, OrderedSet};
