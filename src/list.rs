//! List: intrusive circular doubly linked list with a sentinel, backed by a
//! generational arena.
//!
//! Elements embed a [`Link`] and expose it through [`Linked`]. The list keeps
//! the elements in a `SlotMap`, so a link names its neighbours by arena key
//! instead of by address. `None` in a link means "the sentinel": the `base`
//! link held by the list itself, which never carries a payload.

use crate::error::IndexError;
use core::cmp::Ordering;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use slotmap::{DefaultKey, SlotMap};

/// One end of a relation. `None` is the sentinel.
type Cursor = Option<DefaultKey>;

/// The `next`/`prev` pair embedded in every list element.
///
/// A fresh link is meaningless until the element is inserted; the list
/// rewrites it on every insert. Overwriting the link of an element while it
/// is in a list is a logic error: it is caught by debug assertions and by
/// [`List::links_consistent`], never by undefined behavior.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Link {
    next: Cursor,
    prev: Cursor,
}

impl Link {
    pub const fn new() -> Self {
        Self {
            next: None,
            prev: None,
        }
    }
}

/// Types that embed a [`Link`] and can therefore be stored in a [`List`].
pub trait Linked {
    fn link(&self) -> &Link;
    fn link_mut(&mut self) -> &mut Link;
}

/// Stable handle to an element of one particular list.
///
/// Handles are generational: once the element is removed the handle never
/// resolves again, even if the arena slot is reused. A handle also records
/// the list that issued it and resolves in no other list.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle {
    owner: ListId,
    key: DefaultKey,
}

impl Handle {
    fn new(owner: ListId, key: DefaultKey) -> Self {
        Handle { owner, key }
    }

    /// Arena key, if this handle was issued by `list`.
    fn key_in<T>(&self, list: &List<T>) -> Option<DefaultKey> {
        (self.owner == list.id).then_some(self.key)
    }

    pub fn get<'a, T: Linked>(&self, list: &'a List<T>) -> Option<&'a T> {
        list.slots.get(self.key_in(list)?)
    }

    pub fn get_mut<'a, T: Linked>(&self, list: &'a mut List<T>) -> Option<&'a mut T> {
        let k = self.key_in(list)?;
        list.slots.get_mut(k)
    }
}

/// Identity of a list instance; arena keys are only unique within one arena.
type ListId = u64;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

pub struct List<T> {
    id: ListId,
    base: Link,
    len: usize,
    slots: SlotMap<DefaultKey, T>,
}

impl<T: Linked> List<T> {
    /// An empty list: sentinel linked to itself, length zero.
    pub fn new() -> Self {
        Self {
            id: NEXT_LIST_ID.fetch_add(1, AtomicOrdering::Relaxed),
            base: Link::new(),
            len: 0,
            slots: SlotMap::with_key(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, k: DefaultKey) -> &T {
        self.slots.get(k).expect("linked node missing from arena")
    }

    fn link_at(&self, at: Cursor) -> &Link {
        match at {
            None => &self.base,
            Some(k) => self.node(k).link(),
        }
    }

    fn link_at_mut(&mut self, at: Cursor) -> &mut Link {
        match at {
            None => &mut self.base,
            Some(k) => self
                .slots
                .get_mut(k)
                .expect("linked node missing from arena")
                .link_mut(),
        }
    }

    /// Link the stored node `k` in between the adjacent `prev` and `next`.
    fn splice(&mut self, k: DefaultKey, prev: Cursor, next: Cursor) {
        debug_assert_eq!(self.link_at(prev).next, next, "splice points not adjacent");
        debug_assert_eq!(self.link_at(next).prev, prev, "splice points not adjacent");
        *self.link_at_mut(Some(k)) = Link { next, prev };
        self.link_at_mut(prev).next = Some(k);
        self.link_at_mut(next).prev = Some(k);
    }

    /// Bridge the neighbours of `k` over it. The node stays in the arena and
    /// its own link goes stale.
    fn detach(&mut self, k: DefaultKey) {
        let Link { next, prev } = *self.link_at(Some(k));
        debug_assert_eq!(self.link_at(prev).next, Some(k), "broken next link");
        debug_assert_eq!(self.link_at(next).prev, Some(k), "broken prev link");
        self.link_at_mut(prev).next = next;
        self.link_at_mut(next).prev = prev;
    }

    fn insert_between(&mut self, elem: T, prev: Cursor, next: Cursor) -> Handle {
        let k = self.slots.insert(elem);
        self.splice(k, prev, next);
        self.len += 1;
        Handle::new(self.id, k)
    }

    /// Unlink `k`, hand it to `destroy`, then account for it. The call order
    /// is fixed: unlink, destroy, decrement.
    fn unlink_with<F>(&mut self, k: DefaultKey, destroy: F)
    where
        F: FnOnce(T),
    {
        self.detach(k);
        let elem = self.slots.remove(k).expect("linked node missing from arena");
        destroy(elem);
        self.len -= 1;
    }

    fn take(&mut self, k: DefaultKey) -> T {
        let mut out = None;
        self.unlink_with(k, |e| out = Some(e));
        out.expect("destroy hook receives the element")
    }

    /// Key of the element at `index`, walking from whichever end is nearer.
    fn key_at(&self, index: usize) -> Option<DefaultKey> {
        if index >= self.len {
            return None;
        }
        let from_tail = self.len - 1 - index;
        let at = if index <= from_tail {
            let mut at = self.base.next;
            for _ in 0..index {
                at = self.link_at(at).next;
            }
            at
        } else {
            let mut at = self.base.prev;
            for _ in 0..from_tail {
                at = self.link_at(at).prev;
            }
            at
        };
        debug_assert!(at.is_some(), "walk hit the sentinel inside bounds");
        at
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.key_at(index).map(|k| self.node(k))
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let k = self.key_at(index)?;
        self.slots.get_mut(k)
    }

    pub fn handle_at(&self, index: usize) -> Option<Handle> {
        self.key_at(index).map(|k| Handle::new(self.id, k))
    }

    pub fn head(&self) -> Option<&T> {
        self.base.next.map(|k| self.node(k))
    }

    pub fn tail(&self) -> Option<&T> {
        self.base.prev.map(|k| self.node(k))
    }

    pub fn add_head(&mut self, elem: T) -> Handle {
        let next = self.base.next;
        self.insert_between(elem, None, next)
    }

    pub fn add_tail(&mut self, elem: T) -> Handle {
        let prev = self.base.prev;
        self.insert_between(elem, prev, None)
    }

    /// Insert before the element currently at `index`. `index == len()`
    /// appends; anything larger leaves the list untouched and returns the
    /// element inside the error.
    pub fn add_at(&mut self, elem: T, index: usize) -> Result<Handle, IndexError<T>> {
        if index > self.len {
            return Err(IndexError::new(index, self.len, elem));
        }
        if index == self.len {
            return Ok(self.add_tail(elem));
        }
        let at = self.key_at(index);
        let prev = self.link_at(at).prev;
        Ok(self.insert_between(elem, prev, at))
    }

    /// Unlink the element at `index` and pass it to `destroy`. Returns
    /// `false` (and does nothing) when `index` is out of range.
    pub fn delete_at<F>(&mut self, index: usize, destroy: F) -> bool
    where
        F: FnOnce(T),
    {
        match self.key_at(index) {
            Some(k) => {
                self.unlink_with(k, destroy);
                true
            }
            None => false,
        }
    }

    pub fn remove_head<F>(&mut self, destroy: F) -> bool
    where
        F: FnOnce(T),
    {
        match self.base.next {
            Some(k) => {
                self.unlink_with(k, destroy);
                true
            }
            None => false,
        }
    }

    pub fn remove_tail<F>(&mut self, destroy: F) -> bool
    where
        F: FnOnce(T),
    {
        match self.base.prev {
            Some(k) => {
                self.unlink_with(k, destroy);
                true
            }
            None => false,
        }
    }

    pub fn take_head(&mut self) -> Option<T> {
        let k = self.base.next?;
        Some(self.take(k))
    }

    pub fn take_tail(&mut self) -> Option<T> {
        let k = self.base.prev?;
        Some(self.take(k))
    }

    pub fn take_at(&mut self, index: usize) -> Option<T> {
        let k = self.key_at(index)?;
        Some(self.take(k))
    }

    /// O(1) unlink of the element behind `handle`; `None` if it is stale or
    /// was issued by another list.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let k = handle.key_in(self)?;
        if !self.slots.contains_key(k) {
            return None;
        }
        Some(self.take(k))
    }

    /// Stack push: the tail is the top.
    pub fn push(&mut self, elem: T) -> Handle {
        self.add_tail(elem)
    }

    pub fn pop<F>(&mut self, destroy: F) -> bool
    where
        F: FnOnce(T),
    {
        self.remove_tail(destroy)
    }

    pub fn peek(&self) -> Option<&T> {
        self.tail()
    }

    /// Destroy every element head to tail. The list is empty and reusable
    /// afterwards.
    pub fn free<F>(&mut self, mut destroy: F)
    where
        F: FnMut(T),
    {
        while let Some(k) = self.base.next {
            self.unlink_with(k, &mut destroy);
        }
        debug_assert!(self.slots.is_empty());
    }

    pub fn clear(&mut self) {
        self.free(drop);
    }

    /// In-place insertion sort over the ring.
    ///
    /// An element is relocated only when its predecessor compares
    /// `Greater`; equal neighbours never move. A relocated element is
    /// reinserted before the first element of the sorted prefix that it
    /// compares `Less` against, or at the end of the prefix if there is none.
    /// Linear on sorted input, quadratic in the worst case, no extra storage.
    pub fn sort<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.len < 2 {
            return;
        }
        let mut cursor = self.link_at(self.base.next).next;
        while let Some(k) = cursor {
            let Link { next: after, prev } = *self.link_at(Some(k));
            let before = prev.expect("sorted prefix is never empty");
            if compare(self.node(before), self.node(k)) != Ordering::Greater {
                cursor = after;
                continue;
            }

            // Scan while `k` is still linked; no user code runs between
            // detach and splice.
            let mut scan = self.base.next;
            while scan != Some(k) {
                let s = scan.expect("scan stays inside the sorted prefix");
                if compare(self.node(k), self.node(s)) == Ordering::Less {
                    break;
                }
                scan = self.link_at(scan).next;
            }
            if scan != Some(k) {
                self.detach(k);
                let prev = self.link_at(scan).prev;
                self.splice(k, prev, scan);
            }
            cursor = after;
        }
        debug_assert!(self.links_consistent(), "sort corrupted the ring");
    }

    /// Walk the ring and check its structure: `len` forward steps from the
    /// sentinel return to it, every step is mirrored by the `prev` link, and
    /// the arena holds exactly the linked elements.
    pub fn links_consistent(&self) -> bool {
        let mut at: Cursor = None;
        for _ in 0..self.len {
            let next = self.link_at(at).next;
            match next {
                Some(k) if self.slots.contains_key(k) => {}
                _ => return false,
            }
            if self.link_at(next).prev != at {
                return false;
            }
            at = next;
        }
        self.link_at(at).next.is_none() && self.base.prev == at && self.slots.len() == self.len
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.base.next,
            back: self.base.prev,
            remaining: self.len,
        }
    }
}

impl<T: Linked> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Linked + fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|(_, e)| e)).finish()
    }
}

impl<T: Linked> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.add_tail(elem);
        }
    }
}

impl<T: Linked> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

/// Iterator over `(Handle, &T)` in list order.
pub struct Iter<'a, T> {
    list: &'a List<T>,
    front: Cursor,
    back: Cursor,
    remaining: usize,
}

impl<'a, T: Linked> Iterator for Iter<'a, T> {
    type Item = (Handle, &'a T);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.front?;
        let list = self.list;
        let elem = list.node(k);
        self.front = elem.link().next;
        self.remaining -= 1;
        Some((Handle::new(list.id, k), elem))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: Linked> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.back?;
        let list = self.list;
        let elem = list.node(k);
        self.back = elem.link().prev;
        self.remaining -= 1;
        Some((Handle::new(list.id, k), elem))
    }
}

impl<'a, T: Linked> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: Linked> IntoIterator for &'a List<T> {
    type Item = (Handle, &'a T);
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator; drains the list head first.
pub struct IntoIter<T> {
    list: List<T>,
}

impl<T: Linked> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<T> {
        self.list.take_head()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T: Linked> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.take_tail()
    }
}

impl<T: Linked> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Default)]
    pub(crate) struct Item {
        pub(crate) val: i32,
        link: Link,
    }

    impl Item {
        pub(crate) fn new(val: i32) -> Self {
            Item {
                val,
                link: Link::new(),
            }
        }
    }

    impl Linked for Item {
        fn link(&self) -> &Link {
            &self.link
        }
        fn link_mut(&mut self) -> &mut Link {
            &mut self.link
        }
    }

    fn list_of(vals: &[i32]) -> List<Item> {
        vals.iter().copied().map(Item::new).collect()
    }

    fn vals(list: &List<Item>) -> Vec<i32> {
        list.iter().map(|(_, e)| e.val).collect()
    }

    /// Invariant: a new list is empty, has no head/tail and a consistent ring.
    #[test]
    fn new_list_is_empty_ring() {
        let l: List<Item> = List::new();
        assert!(l.is_empty());
        assert_eq!(l.len(), 0);
        assert!(l.head().is_none());
        assert!(l.tail().is_none());
        assert!(l.peek().is_none());
        assert!(l.get(0).is_none());
        assert!(l.links_consistent());
    }

    /// Invariant: AddTail preserves insertion order; Get indexes 0-based.
    #[test]
    fn add_tail_then_get_in_order() {
        let l = list_of(&[1, 2, 3]);
        assert_eq!(l.get(0).map(|e| e.val), Some(1));
        assert_eq!(l.get(1).map(|e| e.val), Some(2));
        assert_eq!(l.get(2).map(|e| e.val), Some(3));
        assert!(l.get(3).is_none());
        assert!(l.links_consistent());
    }

    /// Invariant: AddHead prepends; head/tail track the boundary elements.
    #[test]
    fn add_head_prepends() {
        let mut l = list_of(&[2]);
        l.add_head(Item::new(1));
        l.add_tail(Item::new(3));
        assert_eq!(vals(&l), vec![1, 2, 3]);
        assert_eq!(l.head().map(|e| e.val), Some(1));
        assert_eq!(l.tail().map(|e| e.val), Some(3));
    }

    /// Invariant: Get walks from the nearer end and lands on the same element
    /// as a plain forward walk, for every index of odd and even lengths.
    #[test]
    fn get_from_either_end_matches_forward_walk() {
        for n in 1..8 {
            let input: Vec<i32> = (0..n).collect();
            let l = list_of(&input);
            for i in 0..n as usize {
                assert_eq!(l.get(i).map(|e| e.val), Some(i as i32), "len {n}, index {i}");
            }
        }
    }

    /// Invariant: AddAt inserts before the element at `index`; `index == len`
    /// appends; `index > len` hands the element back unchanged.
    #[test]
    fn add_at_positions() {
        let mut l = list_of(&[1, 3]);
        l.add_at(Item::new(2), 1).unwrap();
        l.add_at(Item::new(0), 0).unwrap();
        l.add_at(Item::new(4), 4).unwrap();
        assert_eq!(vals(&l), vec![0, 1, 2, 3, 4]);

        let err = l.add_at(Item::new(9), 6).unwrap_err();
        assert_eq!(err.index(), 6);
        assert_eq!(err.list_len(), 5);
        assert_eq!(err.into_inner().val, 9);
        assert_eq!(l.len(), 5);
        assert!(l.links_consistent());
    }

    /// Invariant: DeleteAt destroys exactly the indexed element; out of range
    /// is a no-op that never calls the destroy hook.
    #[test]
    fn delete_at_and_out_of_range_noop() {
        let mut l = list_of(&[10, 20, 30]);
        let destroyed = RefCell::new(Vec::new());
        assert!(l.delete_at(1, |e| destroyed.borrow_mut().push(e.val)));
        assert_eq!(vals(&l), vec![10, 30]);

        assert!(!l.delete_at(2, |e| destroyed.borrow_mut().push(e.val)));
        assert!(!l.delete_at(usize::MAX, |e| destroyed.borrow_mut().push(e.val)));
        assert_eq!(l.len(), 2);
        assert_eq!(*destroyed.borrow(), vec![20]);
        assert!(l.links_consistent());
    }

    /// Invariant: RemoveHead/RemoveTail destroy boundary elements; both are
    /// no-ops on an empty list.
    #[test]
    fn remove_boundaries() {
        let mut l = list_of(&[1, 2, 3]);
        let mut seen = Vec::new();
        assert!(l.remove_head(|e| seen.push(e.val)));
        assert_eq!(l.head().map(|e| e.val), Some(2));
        assert!(l.remove_tail(|e| seen.push(e.val)));
        assert!(l.remove_tail(|e| seen.push(e.val)));
        assert!(!l.remove_head(|e| seen.push(e.val)));
        assert!(!l.remove_tail(|e| seen.push(e.val)));
        assert_eq!(seen, vec![1, 3, 2]);
        assert!(l.is_empty());
        assert!(l.links_consistent());
    }

    /// Invariant: the stack view uses the tail as its top.
    #[test]
    fn push_pop_peek_is_lifo() {
        let mut l: List<Item> = List::new();
        l.push(Item::new(1));
        l.push(Item::new(2));
        assert_eq!(l.peek().map(|e| e.val), Some(2));
        let mut popped = None;
        assert!(l.pop(|e| popped = Some(e.val)));
        assert_eq!(popped, Some(2));
        assert_eq!(l.peek().map(|e| e.val), Some(1));
        assert!(l.pop(drop));
        assert!(!l.pop(drop));
    }

    /// Invariant: free destroys every element once, head to tail, and leaves
    /// a reusable empty list.
    #[test]
    fn free_destroys_all_in_order_and_allows_reuse() {
        let mut l = list_of(&[1, 2, 3]);
        let mut seen = Vec::new();
        l.free(|e| seen.push(e.val));
        assert_eq!(seen, vec![1, 2, 3]);
        assert!(l.is_empty());
        assert!(l.links_consistent());

        l.add_tail(Item::new(7));
        assert_eq!(vals(&l), vec![7]);
    }

    /// Invariant: handles resolve while linked, give O(1) removal, and a stale
    /// handle never aliases a later element.
    #[test]
    fn handle_remove_and_staleness() {
        let mut l: List<Item> = List::new();
        l.add_tail(Item::new(1));
        let h = l.add_tail(Item::new(2));
        l.add_tail(Item::new(3));
        assert_eq!(h.get(&l).map(|e| e.val), Some(2));
        h.get_mut(&mut l).unwrap().val = 20;
        assert_eq!(l.get(1).map(|e| e.val), Some(20));

        assert_eq!(l.remove(h).map(|e| e.val), Some(20));
        assert_eq!(vals(&l), vec![1, 3]);
        assert!(l.remove(h).is_none());

        let h2 = l.add_at(Item::new(2), 1).unwrap();
        assert_ne!(h, h2);
        assert!(h.get(&l).is_none());
        assert_eq!(l.handle_at(1), Some(h2));
        assert!(l.links_consistent());
    }

    /// Invariant: forward and reverse iteration are exact mirrors.
    #[test]
    fn iter_both_directions() {
        let l = list_of(&[1, 2, 3, 4]);
        let fwd: Vec<i32> = l.iter().map(|(_, e)| e.val).collect();
        let mut rev: Vec<i32> = l.iter().rev().map(|(_, e)| e.val).collect();
        rev.reverse();
        assert_eq!(fwd, rev);
        assert_eq!(l.iter().len(), 4);

        let mut it = l.iter();
        assert_eq!(it.next().map(|(_, e)| e.val), Some(1));
        assert_eq!(it.next_back().map(|(_, e)| e.val), Some(4));
        assert_eq!(it.next().map(|(_, e)| e.val), Some(2));
        assert_eq!(it.next_back().map(|(_, e)| e.val), Some(3));
        assert!(it.next().is_none());
        assert!(it.next_back().is_none());
    }

    /// Invariant: the owning iterator drains in list order.
    #[test]
    fn into_iter_drains() {
        let l = list_of(&[5, 6, 7]);
        let out: Vec<i32> = l.into_iter().map(|e| e.val).collect();
        assert_eq!(out, vec![5, 6, 7]);
    }

    /// Invariant: sort orders ascending with a numeric comparator.
    #[test]
    fn sort_orders_ascending() {
        let mut l = list_of(&[5, 1, 4, 2, 3, 0, -7, 9]);
        l.sort(|a, b| a.val.cmp(&b.val));
        assert_eq!(vals(&l), vec![-7, 0, 1, 2, 3, 4, 5, 9]);
        assert!(l.links_consistent());
    }

    /// Invariant: sorted input costs exactly `len - 1` comparisons and keeps
    /// every handle at its original position (nothing is relocated).
    #[test]
    fn sort_on_sorted_input_is_linear_and_moves_nothing() {
        let mut l = list_of(&[1, 2, 2, 3, 8]);
        let before: Vec<Handle> = l.iter().map(|(h, _)| h).collect();
        let calls = Cell::new(0);
        l.sort(|a, b| {
            calls.set(calls.get() + 1);
            a.val.cmp(&b.val)
        });
        assert_eq!(calls.get(), 4);
        let after: Vec<Handle> = l.iter().map(|(h, _)| h).collect();
        assert_eq!(before, after);
    }

    /// Invariant: ties never trigger relocation, so equal keys keep their
    /// relative order.
    #[test]
    fn sort_keeps_equal_elements_in_order() {
        let mut l: List<Item> = List::new();
        let pairs = [(2, 0), (1, 1), (2, 2), (1, 3), (0, 4)];
        let mut tag_of = std::collections::HashMap::new();
        for (key, tag) in pairs {
            let h = l.add_tail(Item::new(key));
            tag_of.insert(h, tag);
        }
        l.sort(|a, b| a.val.cmp(&b.val));
        let out: Vec<(i32, i32)> = l.iter().map(|(h, e)| (e.val, tag_of[&h])).collect();
        assert_eq!(out, vec![(0, 4), (1, 1), (1, 3), (2, 0), (2, 2)]);
    }

    /// Invariant: empty and single-element lists are left alone without
    /// calling the comparator.
    #[test]
    fn sort_trivial_lists() {
        let mut l: List<Item> = List::new();
        l.sort(|_, _| panic!("comparator must not run"));
        l.add_tail(Item::new(1));
        l.sort(|_, _| panic!("comparator must not run"));
        assert_eq!(vals(&l), vec![1]);
    }

    /// Invariant: a descending comparator reverses ascending input.
    #[test]
    fn sort_with_reversed_comparator() {
        let mut l = list_of(&[1, 2, 3, 4]);
        l.sort(|a, b| b.val.cmp(&a.val));
        assert_eq!(vals(&l), vec![4, 3, 2, 1]);
    }

    /// Invariant: clobbering an embedded link is detected by the ring check.
    #[test]
    fn corrupted_link_is_detected() {
        let mut l = list_of(&[1, 2, 3]);
        let h = l.handle_at(1).unwrap();
        *h.get_mut(&mut l).unwrap().link_mut() = Link::new();
        assert!(!l.links_consistent());
    }

    /// Invariant: a handle resolves only in the list that issued it, even
    /// when another list has an element in the same arena slot.
    #[test]
    fn handle_from_other_list_does_not_resolve() {
        let mut a = list_of(&[1]);
        let mut b = list_of(&[99]);
        let ha = a.handle_at(0).unwrap();
        let hb = b.handle_at(0).unwrap();
        assert_ne!(ha, hb);

        assert!(ha.get(&b).is_none());
        assert!(ha.get_mut(&mut b).is_none());
        assert!(b.remove(ha).is_none());
        assert_eq!(vals(&b), vec![99]);

        assert_eq!(a.remove(ha).map(|e| e.val), Some(1));
        assert_eq!(b.remove(hb).map(|e| e.val), Some(99));
    }

    /// Invariant: a comparator that panics mid-sort leaves every element
    /// linked and the ring consistent.
    #[test]
    fn sort_survives_panicking_comparator() {
        let mut l = list_of(&[3, 1, 2]);
        let calls = Cell::new(0);
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            l.sort(|a, b| {
                calls.set(calls.get() + 1);
                if calls.get() == 2 {
                    panic!("comparator failure");
                }
                a.val.cmp(&b.val)
            });
        }));
        assert!(res.is_err());
        assert_eq!(l.len(), 3);
        assert!(l.links_consistent());
        let mut out = vals(&l);
        out.sort();
        assert_eq!(out, vec![1, 2, 3]);

        l.free(drop);
        assert!(l.is_empty());
    }

    /// Invariant: an element whose predecessor compares `Greater` but which
    /// never compares `Less` against the prefix stays as the prefix tail.
    #[test]
    fn sort_without_less_keeps_element_at_prefix_end() {
        let mut l = list_of(&[3, 1, 2]);
        let calls = Cell::new(0);
        l.sort(|_, _| {
            calls.set(calls.get() + 1);
            Ordering::Greater
        });
        // 1: one predecessor check plus a scan over [3];
        // 2: one predecessor check plus a scan over [3, 1].
        assert_eq!(calls.get(), 5);
        assert_eq!(vals(&l), vec![3, 1, 2]);
        assert_eq!(l.len(), 3);
        assert!(l.links_consistent());
    }

    /// Invariant: with a comparator that puts one element first, that
    /// element moves to the head and the rest keep their order.
    #[test]
    fn sort_relocates_only_before_first_less() {
        // 0 sorts before everything; all other pairs compare Equal.
        let mut l = list_of(&[5, 4, 0, 3]);
        l.sort(|a, b| match (a.val, b.val) {
            (0, 0) => Ordering::Equal,
            (0, _) => Ordering::Less,
            (_, 0) => Ordering::Greater,
            _ => Ordering::Equal,
        });
        assert_eq!(vals(&l), vec![0, 5, 4, 3]);
        assert!(l.links_consistent());
    }

    #[test]
    fn debug_lists_elements() {
        let l = list_of(&[1]);
        let s = format!("{:?}", l);
        assert!(s.starts_with('[') && s.contains("val: 1"));
    }
}
