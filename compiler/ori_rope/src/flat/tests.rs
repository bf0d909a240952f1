use super::*;
use pretty_assertions::assert_eq;

const ITEMS: Metric = Metric::new(0, "Items");
const WEIGHT: Metric = Metric::new(1, "Weight");

/// Leaves are runs of weights; at most four items per leaf.
struct Weights;

impl Monoid for Weights {
    type Leaf = Vec<usize>;

    fn metrics(&self) -> &[Metric] {
        &[ITEMS, WEIGHT]
    }

    fn max_leaf_size(&self) -> usize {
        4
    }

    fn measure(&self, leaf: &Vec<usize>) -> Metrics {
        Metrics::from_values([leaf.len(), leaf.iter().sum()])
    }

    fn leaf_size(&self, leaf: &Vec<usize>) -> usize {
        leaf.len()
    }

    fn merge(&self, left: &Vec<usize>, right: &Vec<usize>) -> Vec<usize> {
        left.iter().chain(right).copied().collect()
    }

    fn split(&self, leaf: &Vec<usize>) -> Vec<Vec<usize>> {
        leaf.chunks(3).map(<[usize]>::to_vec).collect()
    }
}

fn leaf_sizes(rope: &FlatRope<Weights>) -> Vec<usize> {
    rope.leaves().iter().map(Vec::len).collect()
}

#[test]
fn test_push_merges_small_leaves() {
    let rope = FlatRope::from_leaves(Weights, [vec![1, 2], vec![3], vec![4, 5]]);

    assert_eq!(leaf_sizes(&rope), vec![3, 2]);
    assert_eq!(rope.total(ITEMS), 5);
    assert_eq!(rope.total(WEIGHT), 15);
}

#[test]
fn test_push_splits_oversize_leaf() {
    let rope = FlatRope::from_leaves(Weights, [vec![1; 7]]);

    assert_eq!(leaf_sizes(&rope), vec![3, 3, 1]);
    assert_eq!(rope.total(ITEMS), 7);
}

#[test]
fn test_empty_leaves_are_dropped() {
    let rope = FlatRope::from_leaves(Weights, [vec![], vec![2], vec![]]);

    assert_eq!(rope.leaf_count(), 1);
    assert!(FlatRope::new(Weights).cursor().is_none());

    let all_empty = FlatRope::from_leaves(Weights, [vec![], vec![]]);
    assert!(all_empty.is_empty());
    assert!(all_empty.cursor().is_none());
    assert_eq!(all_empty.total(ITEMS), 0);
    assert!(FlatRope::new(Weights).is_empty());
}

#[test]
fn test_replace_leaf_recomputes_sums() {
    let mut rope = FlatRope::from_leaves(Weights, [vec![1, 1, 1, 1], vec![2, 2]]);
    rope.replace_leaf(0, vec![5; 5]);

    assert_eq!(leaf_sizes(&rope), vec![3, 2, 2]);
    assert_eq!(rope.total(WEIGHT), 29);

    rope.replace_leaf(1, vec![]);
    assert_eq!(leaf_sizes(&rope), vec![3, 2]);
    assert_eq!(rope.total(ITEMS), 5);
}

#[test]
fn test_cursor_location_and_size() {
    let rope = FlatRope::from_leaves(Weights, [vec![1, 2, 3, 4], vec![10, 20]]);
    let first = rope.cursor().unwrap_or_else(|| panic!("rope is not empty"));

    assert_eq!(first.location(WEIGHT), 0);
    assert_eq!(first.size(WEIGHT), 10);

    let second = first.next(&rope).unwrap_or_else(|| panic!("second leaf"));
    assert_eq!(second.leaf_index(), 1);
    assert_eq!(second.location(ITEMS), 4);
    assert_eq!(second.location(WEIGHT), 10);
    assert_eq!(second.element(), &vec![10, 20]);
    assert!(second.next(&rope).is_none());
}

#[test]
fn test_scan_finds_containing_leaf() {
    let rope = FlatRope::from_leaves(Weights, [vec![1, 2, 3, 4], vec![10, 20]]);
    let cursor = rope.cursor().unwrap_or_else(|| panic!("rope is not empty"));

    assert_eq!(cursor.scan(&rope, WEIGHT, 9).leaf_index(), 0);
    assert_eq!(cursor.scan(&rope, WEIGHT, 10).leaf_index(), 1);
    assert_eq!(cursor.scan(&rope, ITEMS, 3).leaf_index(), 0);
    assert_eq!(cursor.scan(&rope, ITEMS, 4).leaf_index(), 1);
    // Past the end clamps to the last leaf.
    assert_eq!(cursor.scan(&rope, WEIGHT, 1_000).leaf_index(), 1);

    assert!(cursor.same_position(&cursor.scan(&rope, ITEMS, 2)));
    assert!(!cursor.same_position(&cursor.scan(&rope, ITEMS, 5)));
}

#[test]
fn test_scan_skips_leaves_empty_under_metric() {
    let rope = FlatRope::from_leaves(Weights, [vec![1, 1, 1, 1], vec![0, 0, 0, 0], vec![3]]);
    let cursor = rope.cursor().unwrap_or_else(|| panic!("rope is not empty"));

    assert_eq!(cursor.scan(&rope, WEIGHT, 4).leaf_index(), 2);
}

#[test]
#[should_panic(expected = "different rope")]
fn test_foreign_owner_rejected() {
    let rope = FlatRope::from_leaves(Weights, [vec![1]]);
    let other = FlatRope::from_leaves(Weights, [vec![1]]);
    if let Some(cursor) = rope.cursor() {
        let _ = cursor.next(&other);
    }
}
