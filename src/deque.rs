//! Growable double-ended queue over a power-of-two ring buffer.
//!
//! Logical position `i` lives at physical slot `(head + i) & (capacity - 1)`,
//! so both ends support O(1) amortized push/pop with bitmask wraparound
//! instead of modulo.
//!
//! ## Architecture
//!
//! ```text
//!   slots (capacity 8, len 4, head 6):
//!
//!    physical:  [0]   [1]   [2]   [3]   [4]   [5]   [6]   [7]
//!              ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//!              │  c  │  d  │  -  │  -  │  -  │  -  │  a  │  b  │
//!              └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!                 ▲                                   ▲
//!                 │ logical 2, 3 (wrapped)            │ head: logical 0
//!
//!   logical view: [a, b, c, d]
//! ```
//!
//! ## Resizing
//!
//! The backing array doubles when a push finds `len == capacity` and halves
//! after a pop leaves `len <= capacity / 4` (never below the floor of 8).
//! The gap between the grow and shrink thresholds prevents oscillation when
//! pushes and pops alternate at a capacity boundary. Either resize copies
//! the live elements out in logical order, resetting `head` to 0.
//!
//! Popped slots are cleared to `None` so the buffer never retains stale
//! values.
//!
//! ## Performance Characteristics
//!
//! | Operation               | Time           |
//! |-------------------------|----------------|
//! | `push_front/back`       | O(1) amortized |
//! | `pop_front/back`        | O(1) amortized |
//! | `get` / `set`           | O(1)           |
//! | `rotate(n)`             | O(n mod len)   |
//! | `reverse`               | O(len)         |
//!
//! ## Thread Safety
//!
//! `RingDeque` is not thread-safe. Wrap it in a lock for concurrent use.
//!
//! ## Example Usage
//!
//! ```
//! use orderkit::deque::RingDeque;
//!
//! let mut dq = RingDeque::new();
//! dq.push_back(2);
//! dq.push_back(3);
//! dq.push_front(1);
//!
//! assert_eq!(dq.to_vec(), vec![1, 2, 3]);
//! assert_eq!(dq.pop_front(), Some(1));
//! assert_eq!(dq.pop_back(), Some(3));
//! ```

use std::fmt;

/// Smallest backing-array length; shrinking never goes below this.
pub const MIN_CAPACITY: usize = 8;

/// Double-ended queue over a growable power-of-two ring buffer.
#[derive(Clone)]
pub struct RingDeque<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> RingDeque<T> {
    /// Creates an empty deque with the minimum capacity.
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Creates an empty deque sized for at least `capacity` elements.
    ///
    /// The backing array is rounded up to a power of two, never below the
    /// floor of [`MIN_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY).next_power_of_two();
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    /// Returns the number of stored elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current backing-array length.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Prepends an element, growing the buffer first if it is full.
    pub fn push_front(&mut self, value: T) {
        if self.len == self.capacity() {
            self.resize_to(self.capacity() * 2);
        }
        self.head = (self.head + self.capacity() - 1) & self.mask();
        self.slots[self.head] = Some(value);
        self.len += 1;
    }

    /// Appends an element, growing the buffer first if it is full.
    pub fn push_back(&mut self, value: T) {
        if self.len == self.capacity() {
            self.resize_to(self.capacity() * 2);
        }
        let idx = self.physical(self.len);
        self.slots[idx] = Some(value);
        self.len += 1;
    }

    /// Removes and returns the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.slots[self.head].take();
        self.head = (self.head + 1) & self.mask();
        self.len -= 1;
        self.maybe_shrink();
        value
    }

    /// Removes and returns the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let idx = self.physical(self.len - 1);
        let value = self.slots[idx].take();
        self.len -= 1;
        self.maybe_shrink();
        value
    }

    /// Returns the first element.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the last element.
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Returns the element at logical position `i`, or `None` out of range.
    pub fn get(&self, i: usize) -> Option<&T> {
        if i >= self.len {
            return None;
        }
        self.slots[self.physical(i)].as_ref()
    }

    /// Returns a mutable reference to the element at logical position `i`.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        if i >= self.len {
            return None;
        }
        let idx = self.physical(i);
        self.slots[idx].as_mut()
    }

    /// Replaces the element at logical position `i`.
    ///
    /// Returns `false` (and drops nothing) when `i` is out of range.
    pub fn set(&mut self, i: usize, value: T) -> bool {
        if i >= self.len {
            return false;
        }
        let idx = self.physical(i);
        self.slots[idx] = Some(value);
        true
    }

    /// Rotates right for `n > 0`, left for `n < 0`.
    ///
    /// `n` is reduced modulo the current length first; the rotation is then
    /// performed as repeated pop-and-requeue, costing O(n mod len).
    pub fn rotate(&mut self, n: isize) {
        if self.len == 0 {
            return;
        }
        let steps = n % self.len as isize;
        if steps > 0 {
            for _ in 0..steps {
                if let Some(value) = self.pop_back() {
                    self.push_front(value);
                }
            }
        } else {
            for _ in 0..-steps {
                if let Some(value) = self.pop_front() {
                    self.push_back(value);
                }
            }
        }
    }

    /// Reverses the logical order in place with a two-pointer swap.
    pub fn reverse(&mut self) {
        if self.len < 2 {
            return;
        }
        let mut i = 0;
        let mut j = self.len - 1;
        while i < j {
            let a = self.physical(i);
            let b = self.physical(j);
            self.slots.swap(a, b);
            i += 1;
            j -= 1;
        }
    }

    /// Drops every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Iterates elements in logical front-to-back order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    fn mask(&self) -> usize {
        self.capacity() - 1
    }

    fn physical(&self, i: usize) -> usize {
        (self.head + i) & self.mask()
    }

    // Shrink by half once occupancy drops to a quarter; the gap below the
    // grow threshold avoids thrash under alternating push/pop.
    fn maybe_shrink(&mut self) {
        let capacity = self.capacity();
        if capacity > MIN_CAPACITY && self.len <= capacity / 4 {
            self.resize_to(capacity / 2);
        }
    }

    fn resize_to(&mut self, new_capacity: usize) {
        let mut slots = Vec::with_capacity(new_capacity);
        slots.resize_with(new_capacity, || None);
        for i in 0..self.len {
            let idx = self.physical(i);
            slots[i] = self.slots[idx].take();
        }
        self.slots = slots;
        self.head = 0;
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let capacity = self.capacity();
        assert!(capacity.is_power_of_two());
        assert!(capacity >= MIN_CAPACITY);
        assert!(self.len <= capacity);
        assert!(self.head < capacity);
        for i in 0..capacity {
            let logical_distance = (i + capacity - self.head) & (capacity - 1);
            let occupied = self.slots[i].is_some();
            assert_eq!(
                occupied,
                logical_distance < self.len,
                "slot {i} occupancy does not match logical range"
            );
        }
    }
}

impl<T: Clone> RingDeque<T> {
    /// Copies the elements out in logical front-to-back order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Default for RingDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RingDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for RingDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut dq = Self::new();
        for value in iter {
            dq.push_back(value);
        }
        dq
    }
}
