//! Property tests for the linked heaps and the median tracker
//!
//! These drive the public API with seeded random streams and check the
//! structural invariants after every step, against a fully sorted reference.
//!
//! Run with: cargo test --test properties

use assert_approx_eq::assert_approx_eq;
use ordered_float::OrderedFloat;
use rand::{Rng, SeedableRng, rngs::StdRng};
use running_median::{Heap, HeapError, HeapKind, MedianTracker, NodeId, helper};

// ============================================================================
// Helpers
// ============================================================================

/// Walks the tree and checks heap order, parent links and subtree sizes
fn check_heap<T: PartialOrd + core::fmt::Debug>(heap: &Heap<T>) {
    let nodes = heap.nodes();
    let Some(root) = heap.root() else {
        assert_eq!(heap.len(), 0, "empty tree with non-zero length");
        return;
    };

    let mut reachable = 0;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        reachable += 1;
        let mut size = 1;
        for child in [nodes.left(id), nodes.right(id)].into_iter().flatten() {
            let (child_value, value) = (nodes.value(child), nodes.value(id));
            assert!(
                !heap.kind().prefers(&child_value, &value),
                "{} heap: child {:?} belongs above parent {:?}",
                heap.kind(),
                child_value,
                value
            );
            assert_eq!(nodes.parent(child), Some(id));
            size += nodes.size(child);
            stack.push(child);
        }
        assert_eq!(nodes.size(id), size, "stale subtree size");
    }

    assert_eq!(reachable, heap.len(), "reachable nodes vs heap length");
    assert_eq!(nodes.size(root), heap.len(), "root size vs heap length");
    assert_eq!(heap.iter().count(), heap.len(), "order list vs heap length");
}

/// Collects the depth of every leaf
fn leaf_depths<T>(heap: &Heap<T>) -> Vec<usize>
where
    T: PartialOrd,
{
    let nodes = heap.nodes();
    let mut depths = vec![];
    let mut stack: Vec<(NodeId, usize)> = heap.root().map(|r| (r, 1)).into_iter().collect();
    while let Some((id, depth)) = stack.pop() {
        let children: Vec<_> = [nodes.left(id), nodes.right(id)]
            .into_iter()
            .flatten()
            .collect();
        if children.is_empty() {
            depths.push(depth);
        }
        stack.extend(children.into_iter().map(|c| (c, depth + 1)));
    }
    depths
}

fn check_shape<T: PartialOrd>(heap: &Heap<T>) {
    let depths = leaf_depths(heap);
    let (Some(&shallowest), Some(&deepest)) = (depths.iter().min(), depths.iter().max()) else {
        return;
    };
    assert!(
        deepest - shallowest <= 1,
        "leaf depths range over {shallowest}..={deepest}"
    );

    // height of a complete binary tree with n nodes
    let bound = (usize::BITS - heap.len().leading_zeros()) as usize;
    assert_eq!(deepest, bound, "height for {} nodes", heap.len());
}

fn check_tracker(tracker: &MedianTracker<i64>) {
    let (lower, upper) = (tracker.lower(), tracker.upper());
    assert!(
        lower.len().abs_diff(upper.len()) <= 1,
        "halves out of balance: {} vs {}",
        lower.len(),
        upper.len()
    );
    if let (Some(max_lower), Some(min_upper)) = (lower.iter().max(), upper.iter().min()) {
        assert!(
            max_lower <= min_upper,
            "lower half reaches {max_lower}, upper half starts at {min_upper}"
        );
    }
    check_heap(lower);
    check_heap(upper);
}

// ============================================================================
// Heap
// ============================================================================

mod heap {
    use super::*;

    fn stress(kind: HeapKind, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut heap = Heap::new(kind);
        let mut values = Vec::with_capacity(10_000);

        for _ in 0..10_000 {
            let v: i64 = rng.gen_range(-1_000_000..1_000_000);
            values.push(v);
            heap.insert(v);
        }
        check_heap(&heap);
        check_shape(&heap);

        let extreme = match kind {
            HeapKind::Min => values.iter().min(),
            HeapKind::Max => values.iter().max(),
        }
        .copied();
        assert_eq!(heap.pop(), extreme);
        assert_eq!(heap.len(), 9_999);
        check_heap(&heap);
        check_shape(&heap);
    }

    #[test]
    fn min_heap_stress_pops_minimum() {
        stress(HeapKind::Min, 7);
    }

    #[test]
    fn max_heap_stress_pops_maximum() {
        stress(HeapKind::Max, 11);
    }

    #[test]
    fn drain_yields_sorted_values() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut values: Vec<i32> = (0..2_000).map(|_| rng.gen_range(-50..50)).collect();

        let mut min_heap = Heap::new_min();
        let mut max_heap = Heap::new_max();
        min_heap.extend(values.iter().copied());
        max_heap.extend(values.iter().copied());

        values.sort_unstable();
        let ascending: Vec<_> = std::iter::from_fn(|| min_heap.pop()).collect();
        assert_eq!(ascending, values);

        values.reverse();
        let descending: Vec<_> = std::iter::from_fn(|| max_heap.pop()).collect();
        assert_eq!(descending, values);
    }

    #[test]
    fn random_insert_pop_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut heap = Heap::new_max();
        let mut reference: Vec<i32> = vec![];

        for step in 0..3_000 {
            if reference.is_empty() || rng.gen_bool(0.6) {
                let v = rng.gen_range(0..200);
                heap.insert(v);
                reference.push(v);
            } else {
                let popped = heap.pop();
                let (pos, _) = reference
                    .iter()
                    .enumerate()
                    .max_by_key(|&(_, v)| v)
                    .unwrap_or_else(|| panic!("reference empty at step {step}"));
                assert_eq!(popped, Some(reference.swap_remove(pos)), "step {step}");
            }

            if step % 100 == 0 {
                check_heap(&heap);
                check_shape(&heap);
            }
        }
        assert_eq!(heap.len(), reference.len());
    }

    #[test]
    fn float_heap_with_total_order() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut heap = Heap::new_min();
        for _ in 0..500 {
            heap.insert(OrderedFloat(rng.gen_range(-1.0..1.0f64)));
        }
        heap.insert(OrderedFloat(f64::NAN));
        check_heap(&heap);

        let mut previous = OrderedFloat(f64::NEG_INFINITY);
        while let Some(v) = heap.pop() {
            assert!(previous <= v);
            previous = v;
        }
        assert!(previous.is_nan(), "NaN sorts last under OrderedFloat");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        for name in ["", "MIN", "median", "max "] {
            assert_eq!(
                Heap::<i32>::from_kind_name(name).err(),
                Some(HeapError::UnknownHeapKind(name.to_string()))
            );
        }
        assert_eq!(
            Heap::<i32>::from_kind_name("min").map(|h| h.kind()),
            Ok(HeapKind::Min)
        );
    }
}

// ============================================================================
// MedianTracker
// ============================================================================

mod tracker {
    use super::*;

    fn assert_prefix_medians(values: &[i64]) {
        let mut tracker = MedianTracker::new();
        let mut prefix = Vec::with_capacity(values.len());

        for (i, &v) in values.iter().enumerate() {
            tracker.insert(v);
            check_tracker(&tracker);

            prefix.push(v);
            prefix.sort_unstable();
            assert_eq!(
                tracker.median(),
                helper::median_from_sorted_slice(&prefix),
                "prefix of length {} ending in {v}",
                i + 1
            );
        }
    }

    #[test]
    fn matches_sorted_prefix_median() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<i64> = (0..1_500).map(|_| rng.gen_range(-10_000..10_000)).collect();
        assert_prefix_medians(&values);
    }

    #[test]
    fn matches_sorted_prefix_median_with_heavy_duplicates() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let values: Vec<i64> = (0..200).map(|_| rng.gen_range(0..4)).collect();
            assert_prefix_medians(&values);
        }
    }

    #[test]
    fn monotone_streams() {
        let ascending: Vec<i64> = (0..500).collect();
        let descending: Vec<i64> = (0..500).rev().collect();
        let zigzag: Vec<i64> = (0..500).map(|i| if i % 2 == 0 { i } else { -i }).collect();
        assert_prefix_medians(&ascending);
        assert_prefix_medians(&descending);
        assert_prefix_medians(&zigzag);
    }

    #[test]
    fn documented_example() {
        let mut tracker = MedianTracker::new();
        let steps = [(4, 4.0), (8, 6.0), (12, 8.0), (3, 6.0), (1, 4.0)];
        for (v, expected) in steps {
            tracker.insert(v);
            assert_eq!(tracker.median(), Some(expected));
        }
    }

    #[test]
    fn float_stream_median() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut tracker = MedianTracker::new();
        let mut prefix: Vec<OrderedFloat<f64>> = vec![];

        for _ in 0..1_000 {
            let v: f64 = rng.gen_range(-100.0..100.0);
            tracker.insert(v);
            prefix.push(OrderedFloat(v));
            prefix.sort_unstable();

            let sorted: Vec<f64> = prefix.iter().map(|v| v.into_inner()).collect();
            let expected = helper::median_from_sorted_slice(&sorted)
                .unwrap_or_else(|| panic!("empty reference"));
            let actual = tracker
                .median()
                .unwrap_or_else(|| panic!("empty tracker"));
            assert_approx_eq!(actual, expected, 1e-12);
        }
    }

    #[test]
    fn integer_mean_is_not_truncated() {
        let mut tracker = MedianTracker::new();
        tracker.insert(1u32);
        tracker.insert(2u32);
        assert_eq!(tracker.median(), Some(1.5));
    }

    #[test]
    fn empty_tracker_has_no_median() {
        let mut tracker = MedianTracker::<i64>::new();
        assert_eq!(tracker.median(), None);

        tracker.insert(3);
        tracker.reset();
        assert_eq!(tracker.median(), None);
        assert!(tracker.is_empty());
    }
}
