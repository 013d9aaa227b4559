#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can inspect
// bucket linkage alongside the public operations.

use crate::hash_table::HashTable;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug)]
enum Op {
    Put(i32, i32),
    GetOrInsert(i32, i32),
    Remove(i32),
    Get(i32),
    Bump(i32, i32),
    Clear,
}

// Small signed key range: collisions and negative keys are the common case.
fn arb_scenario() -> impl Strategy<Value = (usize, Vec<Op>)> {
    let key = -12i32..12;
    let op = prop_oneof![
        4 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
        2 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::GetOrInsert(k, v)),
        3 => key.clone().prop_map(Op::Remove),
        3 => key.clone().prop_map(Op::Get),
        2 => (key, -100i32..100).prop_map(|(k, d)| Op::Bump(k, d)),
        1 => Just(Op::Clear),
    ];
    (1usize..=6, proptest::collection::vec(op, 1..80))
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised after every op:
// - put/get/remove/get_or_insert_with agree with the model.
// - Every entry sits in bucket `bucket_index(key)` and no key appears twice.
// - The tracked length equals the number of linked entries.
// - Every bucket ring is consistent.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((buckets, ops) in arb_scenario()) {
        let mut sut: HashTable = HashTable::with_buckets(buckets).unwrap();
        let mut model: HashMap<i32, i32> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    prop_assert_eq!(sut.put(k, v), model.insert(k, v));
                }
                Op::GetOrInsert(k, v) => {
                    let got = *sut.get_or_insert_with(k, || v);
                    let want = *model.entry(k).or_insert(v);
                    prop_assert_eq!(got, want);
                }
                Op::Remove(k) => {
                    let sizes: Vec<usize> = (0..buckets).map(|i| sut.bucket(i).unwrap().len()).collect();
                    let removed = sut.remove(k);
                    prop_assert_eq!(removed, model.remove(&k));
                    if removed.is_none() {
                        let after: Vec<usize> = (0..buckets).map(|i| sut.bucket(i).unwrap().len()).collect();
                        prop_assert_eq!(sizes, after, "a miss must not touch any bucket");
                    }
                }
                Op::Get(k) => {
                    prop_assert_eq!(sut.get(k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(&k));
                }
                Op::Bump(k, d) => {
                    if let Some(v) = sut.get_mut(k) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(&k) {
                        *v = v.wrapping_add(d);
                    }
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            let mut linked: BTreeMap<i32, i32> = BTreeMap::new();
            for i in 0..buckets {
                let bucket = sut.bucket(i).unwrap();
                prop_assert!(bucket.links_consistent());
                for (_, e) in bucket.iter() {
                    prop_assert_eq!(sut.bucket_index(e.key()), i);
                    prop_assert!(linked.insert(e.key(), *e.value()).is_none(), "duplicate key {}", e.key());
                }
            }
            let want: BTreeMap<i32, i32> = model.iter().map(|(&k, &v)| (k, v)).collect();
            prop_assert_eq!(linked, want);
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }
    }
}
