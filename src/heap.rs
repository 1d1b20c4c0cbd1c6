//! Binary-heap priority queue over a dynamic array.
//!
//! Ordering comes from a caller-supplied `less(a, b)` predicate meaning
//! "`a` outranks `b`"; index 0 always holds the highest-priority element.
//!
//! ## Architecture
//!
//! ```text
//!   items: [ 1, 3, 2, 7, 4, 9 ]        parent(i) = (i - 1) / 2
//!                                      children(i) = 2i+1, 2i+2
//!                  1
//!                /   \
//!               3     2
//!              / \   /
//!             7   4 9
//!
//!   Invariant: for every non-root i, !less(items[i], items[parent(i)])
//! ```
//!
//! ## Performance Characteristics
//!
//! | Operation       | Time       |
//! |-----------------|------------|
//! | `push`          | O(log n)   |
//! | `pop`           | O(log n)   |
//! | `peek`          | O(1)       |
//! | `drain_sorted`  | O(n log n) |
//!
//! ## Draining
//!
//! [`drain_sorted`](PriorityQueue::drain_sorted) is **destructive**: it pops
//! until the queue is empty and returns the elements in priority order.
//! There is no read-only snapshot; callers that need one must clone first.
//!
//! ## Thread Safety
//!
//! `PriorityQueue` is not thread-safe. Wrap it in a lock for concurrent use.
//!
//! ## Example Usage
//!
//! ```
//! use orderkit::heap::PriorityQueue;
//!
//! let mut pq = PriorityQueue::min();
//! pq.push(5);
//! pq.push(1);
//! pq.push(3);
//!
//! assert_eq!(pq.peek(), Some(&1));
//! assert_eq!(pq.pop(), Some(1));
//! assert_eq!(pq.pop(), Some(3));
//! assert_eq!(pq.pop(), Some(5));
//! assert_eq!(pq.pop(), None);
//! ```

use std::fmt;
use std::sync::Arc;

/// Caller-supplied priority predicate: `less(a, b)` means "`a` outranks `b`".
///
/// Shared by clones of a queue.
pub type LessFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Binary heap over `Vec<T>` ordered by a [`LessFn`] predicate.
pub struct PriorityQueue<T> {
    items: Vec<T>,
    less: LessFn<T>,
}

impl<T: Ord + 'static> PriorityQueue<T> {
    /// Creates a min-queue: smaller elements outrank larger ones.
    pub fn min() -> Self {
        Self::new(Arc::new(|a: &T, b: &T| a < b))
    }

    /// Creates a max-queue: larger elements outrank smaller ones.
    pub fn max() -> Self {
        Self::new(Arc::new(|a: &T, b: &T| a > b))
    }
}

impl<T> PriorityQueue<T> {
    /// Creates an empty queue with an arbitrary priority predicate.
    pub fn new(less: LessFn<T>) -> Self {
        Self {
            items: Vec::new(),
            less,
        }
    }

    /// Returns the number of queued elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the highest-priority element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Adds an element and sifts it up toward the root.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Removes and returns the highest-priority element.
    ///
    /// The last element moves into the root slot and sifts down, swapping
    /// with its higher-priority child at each level (right child wins a tie
    /// check only when `less(right, left)`).
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let top = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        top
    }

    /// Pops until empty, returning the elements in priority order.
    ///
    /// **Destructive**: the queue is empty afterwards. Clone the queue
    /// first if a snapshot is needed.
    pub fn drain_sorted(&mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.items.len());
        while let Some(item) = self.pop() {
            sorted.push(item);
        }
        sorted
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if (self.less)(&self.items[i], &self.items[parent]) {
                self.items.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && (self.less)(&self.items[right], &self.items[left]) {
                child = right;
            }
            if (self.less)(&self.items[child], &self.items[i]) {
                self.items.swap(i, child);
                i = child;
            } else {
                break;
            }
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        for i in 1..self.items.len() {
            let parent = (i - 1) / 2;
            assert!(
                !(self.less)(&self.items[i], &self.items[parent]),
                "heap order violated at index {i}"
            );
        }
    }
}

impl<T> Extend<T> for PriorityQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: Clone> Clone for PriorityQueue<T> {
    /// Copies the backing array; the predicate `Arc` is shared.
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            less: Arc::clone(&self.less),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PriorityQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.items.len())
            .field("peek", &self.items.first())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_queue_pops_ascending() {
        let mut pq = PriorityQueue::min();
        pq.extend([5, 1, 4, 2, 3]);
        pq.debug_validate_invariants();
        assert_eq!(pq.drain_sorted(), vec![1, 2, 3, 4, 5]);
        assert_eq!(pq.len(), 0);
    }

    #[test]
    fn max_queue_pops_descending() {
        let mut pq = PriorityQueue::max();
        pq.extend([5, 1, 4, 2, 3]);
        assert_eq!(pq.drain_sorted(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn peek_does_not_mutate() {
        let mut pq = PriorityQueue::min();
        pq.push(2);
        pq.push(1);
        assert_eq!(pq.peek(), Some(&1));
        assert_eq!(pq.peek(), Some(&1));
        assert_eq!(pq.len(), 2);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut pq: PriorityQueue<i32> = PriorityQueue::min();
        assert_eq!(pq.pop(), None);
        assert_eq!(pq.peek(), None);
        assert!(pq.is_empty());
    }

    #[test]
    fn drain_sorted_is_destructive() {
        let mut pq = PriorityQueue::min();
        pq.extend([3, 1, 2]);
        let snapshot = pq.clone();

        assert_eq!(pq.drain_sorted(), vec![1, 2, 3]);
        assert!(pq.is_empty());
        // The clone still holds the elements.
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn custom_predicate_orders_by_field() {
        #[derive(Debug, Clone, PartialEq)]
        struct Job {
            priority: u32,
            name: &'static str,
        }

        let mut pq: PriorityQueue<Job> =
            PriorityQueue::new(Arc::new(|a: &Job, b: &Job| a.priority > b.priority));
        pq.push(Job {
            priority: 1,
            name: "low",
        });
        pq.push(Job {
            priority: 9,
            name: "high",
        });
        pq.push(Job {
            priority: 5,
            name: "mid",
        });

        let order: Vec<_> = pq.drain_sorted().into_iter().map(|j| j.name).collect();
        assert_eq!(order, vec!["high", "mid", "low"]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let mut pq = PriorityQueue::min();
        pq.extend([2, 1, 2, 1, 3]);
        assert_eq!(pq.drain_sorted(), vec![1, 1, 2, 2, 3]);
    }

    #[test]
    fn clear_empties_the_queue() {
        let mut pq = PriorityQueue::min();
        pq.extend([1, 2, 3]);
        pq.clear();
        assert!(pq.is_empty());
        assert_eq!(pq.pop(), None);
        pq.push(4);
        assert_eq!(pq.peek(), Some(&4));
    }

    #[test]
    fn clone_is_independent_but_shares_predicate() {
        let mut pq = PriorityQueue::min();
        pq.extend([2, 1]);
        let mut copy = pq.clone();
        copy.push(0);
        assert_eq!(pq.len(), 2);
        assert_eq!(copy.pop(), Some(0));
        assert_eq!(pq.peek(), Some(&1));
    }
}
