use super::{AvlTree, Error, TreeMap, VisitOrder};

const N: i32 = 1_000;
const LARGE_N: i32 = 1_000_000;

#[test]
fn test_reference_scenario() {
    let mut tree = AvlTree::new();
    for x in [10, 0, 5, 13, 12, 15] {
        assert_eq!(tree.insert(x), Ok(()));
        tree.check_consistency();
    }
    assert_eq!(tree.len(), 6);

    assert_eq!(tree.remove(&13), Some(13));
    tree.check_consistency();
    assert_eq!(tree.len(), 5);
    assert!(!tree.contains(&13));

    assert_eq!(tree.get(&15), Some(&15));
    assert_eq!(tree.insert(15), Err(Error::AlreadyExists));
    assert_eq!(tree.len(), 5);

    assert_eq!(tree.remove(&20), None);
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.min(), Some(&0));
    assert_eq!(tree.max(), Some(&15));
}

#[test]
fn test_insert() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut tree = AvlTree::new();
    for value in &values {
        assert!(tree.insert(*value).is_ok());
        tree.check_consistency();
    }
    assert_eq!(tree.len(), values.len());

    for value in &values {
        assert_eq!(tree.insert(*value), Err(Error::AlreadyExists));
    }
    assert_eq!(tree.len(), values.len());
    tree.check_consistency();
}

#[test]
fn test_insert_sorted_range() {
    let mut tree = AvlTree::new();
    for value in 0..N {
        assert!(tree.insert(value).is_ok());
        tree.check_consistency();
    }
    assert_eq!(tree.len(), N as usize);
    assert!(tree.height() > 0);
    // An AVL tree is at most ~1.44 log2(n) high.
    assert!(tree.height() <= 15);
    assert!(tree.get(&-42).is_none());
}

#[test]
fn test_insert_shuffled_range() {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut values: Vec<i32> = (0..N).collect();
    let mut rng = StdRng::seed_from_u64(0);
    values.shuffle(&mut rng);

    let mut map = TreeMap::new();
    for value in &values {
        assert!(map.insert(*value, "foo").is_ok());
        map.check_consistency();
    }
    assert_eq!(map.len(), values.len());

    for value in &values {
        assert_eq!(map.insert(*value, "bar"), Err(Error::AlreadyExists));
    }
    assert_eq!(map.len(), values.len());
    assert!(map.values().all(|v| *v == "foo"));
    assert!(map.get(&-42).is_none());
}

#[test]
fn test_get() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut map = TreeMap::new();
    assert!(map.get(&42).is_none());
    for value in &values {
        let _ = map.insert(*value, value.wrapping_add(1));
    }

    for value in &values {
        assert_eq!(map.get(value), Some(&value.wrapping_add(1)));
        assert_eq!(
            map.get_key_value(value),
            Some((value, &value.wrapping_add(1)))
        );
    }
}

#[test]
fn test_clear() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut map = TreeMap::new();
    for value in &values {
        map.insert(*value, String::from("foo")).unwrap();
    }
    assert!(!map.is_empty());
    assert_eq!(map.len(), values.len());

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert!(map.keys().is_empty());

    for value in &values {
        assert!(map.insert(*value, String::from("bar")).is_ok());
    }
    assert!(!map.is_empty());
    assert_eq!(map.len(), values.len());
    map.check_consistency();
}

#[test]
fn test_remove() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut map = TreeMap::new();
    for value in &values {
        map.insert(*value, 42).unwrap();
    }

    values.shuffle(&mut rng);
    for value in &values {
        assert!(map.get(value).is_some());
        assert_eq!(map.remove(value), Some(42));
        assert!(map.get(value).is_none());
        assert_eq!(map.remove(value), None);
        map.check_consistency();
    }
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
}

#[test]
fn test_round_trip() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(1);
    let mut tree = AvlTree::new();
    for _ in 0..N {
        let _ = tree.insert(rng.gen_range(0..N));
    }

    for _ in 0..N {
        let value = N + rng.gen_range(0..N);
        let len = tree.len();
        if tree.insert(value).is_ok() {
            assert_eq!(tree.remove(&value), Some(value));
        }
        assert_eq!(tree.len(), len);
        assert!(!tree.contains(&value));
        tree.check_consistency();
    }
}

#[test]
fn test_iter_symmetry() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut tree = AvlTree::new();
    for _ in 0..N {
        let _ = tree.insert(rng.gen_range(0..N));
    }

    let mut forward = Vec::new();
    let mut cursor = tree.first();
    while cursor.is_valid() {
        forward.push(*cursor.get(&tree).unwrap());
        cursor.move_next(&tree).unwrap();
    }

    let mut backward = Vec::new();
    let mut cursor = tree.last();
    while cursor.is_valid() {
        backward.push(*cursor.get(&tree).unwrap());
        cursor.move_prev(&tree).unwrap();
    }
    backward.reverse();

    assert_eq!(forward.len(), tree.len());
    assert_eq!(forward, backward);
    assert_eq!(forward, tree.iter().copied().collect::<Vec<_>>());
    assert!(forward.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_map_iter() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut map = TreeMap::new();
    for value in &values {
        let _ = map.insert(*value, value.wrapping_add(42));
    }

    values.sort();
    values.dedup();

    let mut value_iter = values.iter();
    for (&key, &mapped) in &map {
        let value = value_iter.next().unwrap();
        assert_eq!(key, *value);
        assert_eq!(mapped, value.wrapping_add(42));
    }
    assert!(value_iter.next().is_none());

    let keys: Vec<i32> = map.keys().into_iter().copied().collect();
    assert_eq!(keys, values);

    let mut value_iter = values.iter().rev();
    let mut cursor = map.last();
    while cursor.is_valid() {
        let (&key, _) = cursor.get(&map).unwrap();
        assert_eq!(Some(&key), value_iter.next());
        cursor.move_prev(&map).unwrap();
    }
    assert!(value_iter.next().is_none());
}

#[test]
fn test_visit_counts() {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut values: Vec<i32> = (0..N).collect();
    let mut rng = StdRng::seed_from_u64(0);
    values.shuffle(&mut rng);

    let mut tree = AvlTree::new();
    for value in &values {
        tree.insert(*value).unwrap();
    }
    for value in values.iter().take(N as usize / 3) {
        tree.remove(value);
    }

    for order in [VisitOrder::PreOrder, VisitOrder::InOrder, VisitOrder::PostOrder] {
        let mut count = 0;
        tree.visit(order, |_| count += 1);
        assert_eq!(count, tree.len());
    }
}

#[test]
#[ignore]
fn test_large() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..LARGE_N).map(|_| rng.gen_range(0..LARGE_N)).collect();

    let mut map = TreeMap::new();
    for value in &values {
        let _ = map.insert(*value, *value);
    }
    map.check_consistency();

    values.shuffle(&mut rng);
    values.resize(values.len() / 2, 0);
    for value in &values {
        map.remove(value);
    }
    map.check_consistency();
}

mod properties {
    use crate::AvlTree;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(u16),
        Remove(u16),
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            3 => any::<u16>().prop_map(|x| Operation::Insert(x % 512)),
            2 => any::<u16>().prop_map(|x| Operation::Remove(x % 512)),
        ]
    }

    proptest! {
        #[test]
        fn tree_behaves_like_btreeset(operations in prop::collection::vec(strategy(), 0..512)) {
            let mut model = BTreeSet::new();
            let mut tree = AvlTree::new();

            for operation in operations {
                match operation {
                    Operation::Insert(x) => {
                        prop_assert_eq!(tree.insert(x).is_ok(), model.insert(x));
                    }
                    Operation::Remove(x) => {
                        prop_assert_eq!(tree.remove(&x), model.take(&x));
                    }
                }
                prop_assert_eq!(tree.len(), model.len());
            }

            tree.check_consistency();
            prop_assert!(tree.iter().eq(model.iter()));
            prop_assert!(tree.iter().rev().eq(model.iter().rev()));
            prop_assert_eq!(tree.min(), model.first());
            prop_assert_eq!(tree.max(), model.last());
        }

        #[test]
        fn height_is_logarithmic(values in prop::collection::btree_set(any::<i32>(), 1..2000)) {
            let mut tree = AvlTree::new();
            for value in &values {
                tree.insert(*value).unwrap();
            }
            let bound = 1.45 * ((values.len() + 2) as f64).log2();
            prop_assert!((tree.height() as f64) <= bound);
        }
    }
}

#[test]
fn test_map_module_iterators() {
    use crate::map::{Iter, Values};

    let mut map = TreeMap::new();
    for k in [2, 1, 3] {
        map.insert(k, k * 100).unwrap();
    }
    let iter: Iter<'_, i32, i32> = map.iter();
    assert_eq!(iter.len(), 3);
    let values: Values<'_, i32, i32> = map.values();
    assert_eq!(values.copied().collect::<Vec<_>>(), [100, 200, 300]);
}
