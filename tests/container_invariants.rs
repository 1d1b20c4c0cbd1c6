// ==============================================
// CROSS-CONTAINER INVARIANT TESTS (integration)
// ==============================================
//
// Behavioral contracts that span the public API surface rather than one
// module's internals: absence signaling, clamping rules, and clone
// independence are expected to behave identically across containers.

use orderkit::prelude::*;

// ==============================================
// Absence Signaling
// ==============================================
//
// Every container reports absence as None (or false), never as a sentinel
// value, so zero-valued entries must be distinguishable from missing ones.

mod absence_signaling {
    use super::*;

    #[test]
    fn zero_values_are_not_absence() {
        let mut map: OrderedMap<u32, u32> = OrderedMap::new();
        map.insert(1, 0);
        assert_eq!(map.get(&1), Some(&0));
        assert_eq!(map.get(&2), None);

        let cache: LruCache<u32, u32> = LruCache::new(4);
        cache.insert(1, 0);
        assert_eq!(cache.get(&1), Some(0));
        assert_eq!(cache.get(&2), None);

        let mut dq: RingDeque<u32> = RingDeque::new();
        dq.push_back(0);
        assert_eq!(dq.pop_front(), Some(0));
        assert_eq!(dq.pop_front(), None);

        let mut pq: PriorityQueue<u32> = PriorityQueue::min();
        pq.push(0);
        assert_eq!(pq.pop(), Some(0));
        assert_eq!(pq.pop(), None);
    }
}

// ==============================================
// Capacity Clamping
// ==============================================
//
// Non-positive capacities are forgiving defaults, not errors: the LRU
// clamps to 1 and the deque rounds up to its power-of-two floor.

mod capacity_clamping {
    use super::*;

    #[test]
    fn lru_clamps_zero_capacity_to_one() {
        let cache: LruCache<u32, u32> = LruCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert(1, 10);
        cache.insert(2, 20);
        assert_eq!(cache.len(), 1);

        cache.resize(0);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn deque_rounds_capacity_up_to_power_of_two() {
        let dq: RingDeque<u32> = RingDeque::with_capacity(0);
        assert_eq!(dq.capacity(), orderkit::deque::MIN_CAPACITY);

        let dq: RingDeque<u32> = RingDeque::with_capacity(20);
        assert_eq!(dq.capacity(), 32);
    }
}

// ==============================================
// Clone Independence
// ==============================================
//
// A clone taken after any operation sequence observes the same contents,
// and mutating either side never leaks into the other.

mod clone_independence {
    use super::*;

    #[test]
    fn map_clone_matches_then_diverges() {
        let mut map: OrderedMap<i32, String> = OrderedMap::new();
        for k in [4, 2, 7, 1] {
            map.insert(k, format!("v{k}"));
        }
        let mut copy = map.clone();
        let original: Vec<_> = map.keys().copied().collect();
        let cloned: Vec<_> = copy.keys().copied().collect();
        assert_eq!(original, cloned);

        copy.remove(&4);
        map.insert(9, "v9".into());
        assert!(map.contains_key(&4));
        assert!(!copy.contains_key(&9));
    }

    #[test]
    fn set_deque_and_heap_clones_diverge() {
        let set: OrderedSet<i32> = [3, 1, 2].into_iter().collect();
        let mut set_copy = set.clone();
        set_copy.remove(&1);
        assert!(set.contains(&1));

        let dq: RingDeque<i32> = (0..10).collect();
        let mut dq_copy = dq.clone();
        dq_copy.reverse();
        assert_eq!(dq.front(), Some(&0));
        assert_eq!(dq_copy.front(), Some(&9));

        let mut pq: PriorityQueue<i32> = PriorityQueue::min();
        pq.extend([2, 1, 3]);
        let mut pq_copy = pq.clone();
        assert_eq!(pq_copy.drain_sorted(), vec![1, 2, 3]);
        assert_eq!(pq.len(), 3);
    }
}

// ==============================================
// Containers Composing Containers
// ==============================================
//
// The components are independent; exercise one nested in another the way
// downstream code uses them (a priority queue of deque batches, an LRU of
// map snapshots).

mod composition {
    use super::*;

    #[test]
    fn lru_of_map_snapshots() {
        let cache: LruCache<&str, OrderedMap<u32, u32>> = LruCache::new(2);

        let mut snapshot = OrderedMap::new();
        snapshot.insert(1, 100);
        snapshot.insert(2, 200);
        cache.insert("s1", snapshot);

        let fetched = cache.get(&"s1").expect("snapshot cached");
        assert_eq!(fetched.get(&2), Some(&200));
    }

    #[test]
    fn priority_queue_schedules_deque_batches() {
        let mut pq: PriorityQueue<(u32, RingDeque<u32>)> = PriorityQueue::new(
            std::sync::Arc::new(|a: &(u32, RingDeque<u32>), b| a.0 < b.0),
        );
        pq.push((2, (10..12).collect()));
        pq.push((1, (0..2).collect()));

        let (priority, batch) = pq.pop().expect("queue not empty");
        assert_eq!(priority, 1);
        assert_eq!(batch.to_vec(), vec![0, 1]);
    }
}

// ==============================================
// End-to-End Ordered Map Scenario
// ==============================================

mod map_scenario {
    use super::*;

    #[test]
    fn insert_iterate_remove_iterate() {
        let mut tm: OrderedMap<i32, &str> = OrderedMap::new();
        tm.insert(3, "three");
        tm.insert(1, "one");
        tm.insert(2, "two");
        assert_eq!(tm.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);

        tm.remove(&2);
        assert_eq!(tm.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        tm.check_invariants().unwrap();
    }
}
