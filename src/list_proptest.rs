#![cfg(test)]

// Property tests for List kept inside the crate so they can reuse the
// test element type from `list::tests`.

use crate::list::tests::Item;
use crate::list::List;
use proptest::prelude::*;
use std::collections::VecDeque;

// Indices deliberately run past any reachable length so out-of-range
// paths are exercised as often as in-range ones.
#[derive(Clone, Debug)]
enum Op {
    AddHead(i32),
    AddTail(i32),
    AddAt(usize, i32),
    DeleteAt(usize),
    RemoveHead,
    RemoveTail,
    TakeAt(usize),
    RemoveByHandle(usize),
    Get(usize),
    Sort,
    Free,
}

fn arb_op() -> impl Strategy<Value = Op> {
    let idx = 0usize..12;
    let val = -5i32..5;
    prop_oneof![
        val.clone().prop_map(Op::AddHead),
        val.clone().prop_map(Op::AddTail),
        (idx.clone(), val).prop_map(|(i, v)| Op::AddAt(i, v)),
        idx.clone().prop_map(Op::DeleteAt),
        Just(Op::RemoveHead),
        Just(Op::RemoveTail),
        idx.clone().prop_map(Op::TakeAt),
        idx.clone().prop_map(Op::RemoveByHandle),
        idx.prop_map(Op::Get),
        Just(Op::Sort),
        Just(Op::Free),
    ]
}

// Property: State-machine equivalence against VecDeque.
// Invariants exercised after every op:
// - The ring is consistent: `len` forward steps return to the sentinel and
//   each step is mirrored by `prev`.
// - Forward iteration equals the model; reverse iteration equals the
//   reversed model.
// - Destroy callbacks run exactly once per removed element and never on
//   no-op paths.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in proptest::collection::vec(arb_op(), 1..80)) {
        let mut sut: List<Item> = List::new();
        let mut model: VecDeque<i32> = VecDeque::new();

        for op in ops {
            let mut destroyed: Vec<i32> = Vec::new();
            let mut expected: Vec<i32> = Vec::new();
            match op {
                Op::AddHead(v) => {
                    sut.add_head(Item::new(v));
                    model.push_front(v);
                }
                Op::AddTail(v) => {
                    sut.add_tail(Item::new(v));
                    model.push_back(v);
                }
                Op::AddAt(i, v) => {
                    match sut.add_at(Item::new(v), i) {
                        Ok(h) => {
                            prop_assert!(i <= model.len());
                            model.insert(i, v);
                            prop_assert_eq!(h.get(&sut).map(|e| e.val), Some(v));
                        }
                        Err(e) => {
                            prop_assert!(i > model.len());
                            prop_assert_eq!(e.into_inner().val, v);
                        }
                    }
                }
                Op::DeleteAt(i) => {
                    let did = sut.delete_at(i, |e| destroyed.push(e.val));
                    prop_assert_eq!(did, i < model.len());
                    if let Some(v) = model.remove(i) { expected.push(v); }
                }
                Op::RemoveHead => {
                    sut.remove_head(|e| destroyed.push(e.val));
                    if let Some(v) = model.pop_front() { expected.push(v); }
                }
                Op::RemoveTail => {
                    sut.pop(|e| destroyed.push(e.val));
                    if let Some(v) = model.pop_back() { expected.push(v); }
                }
                Op::TakeAt(i) => {
                    prop_assert_eq!(sut.take_at(i).map(|e| e.val), model.remove(i));
                }
                Op::RemoveByHandle(i) => {
                    if let Some(h) = sut.handle_at(i) {
                        let v = model.remove(i).expect("model in step with list");
                        prop_assert_eq!(sut.remove(h).map(|e| e.val), Some(v));
                        prop_assert!(sut.remove(h).is_none(), "stale handle must not resolve");
                    } else {
                        prop_assert!(i >= model.len());
                    }
                }
                Op::Get(i) => {
                    prop_assert_eq!(sut.get(i).map(|e| e.val), model.get(i).copied());
                }
                Op::Sort => {
                    sut.sort(|a, b| a.val.cmp(&b.val));
                    model.make_contiguous().sort();
                }
                Op::Free => {
                    sut.free(|e| destroyed.push(e.val));
                    expected.extend(model.drain(..));
                }
            }

            prop_assert_eq!(destroyed, expected);
            prop_assert!(sut.links_consistent());
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            let fwd: Vec<i32> = sut.iter().map(|(_, e)| e.val).collect();
            let want: Vec<i32> = model.iter().copied().collect();
            prop_assert_eq!(&fwd, &want);
            let rev: Vec<i32> = sut.iter().rev().map(|(_, e)| e.val).collect();
            let want_rev: Vec<i32> = model.iter().rev().copied().collect();
            prop_assert_eq!(rev, want_rev);
            prop_assert_eq!(sut.head().map(|e| e.val), model.front().copied());
            prop_assert_eq!(sut.peek().map(|e| e.val), model.back().copied());
        }
    }
}

// Property: sort produces ascending order and only relocates elements whose
// predecessor compares greater, so sorting twice costs `len - 1` comparisons
// the second time.
proptest! {
    #[test]
    fn prop_sort_then_resort_is_linear(vals in proptest::collection::vec(any::<i16>(), 0..64)) {
        let mut sut: List<Item> = vals.iter().map(|&v| Item::new(i32::from(v))).collect();
        sut.sort(|a, b| a.val.cmp(&b.val));
        let out: Vec<i32> = sut.iter().map(|(_, e)| e.val).collect();
        prop_assert!(out.windows(2).all(|w| w[0] <= w[1]));
        let mut want: Vec<i32> = vals.iter().map(|&v| i32::from(v)).collect();
        want.sort();
        prop_assert_eq!(&out, &want);

        let mut calls = 0usize;
        sut.sort(|a, b| { calls += 1; a.val.cmp(&b.val) });
        prop_assert_eq!(calls, vals.len().saturating_sub(1));
    }
}
