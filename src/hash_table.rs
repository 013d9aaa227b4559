//! HashTable: fixed bucket array of lists, chaining on `i32` keys.

use crate::error::TableError;
use crate::list::{Handle, Link, Linked, List};
use core::fmt;
use core::mem;

/// Bucket count used by `HashTable::new` and `Default`.
pub const DEFAULT_BUCKETS: usize = 16;

/// One key/value pair, linked into its bucket through the embedded `Link`.
#[derive(Debug)]
pub struct Entry<V> {
    key: i32,
    value: V,
    link: Link,
}

impl<V> Entry<V> {
    fn new(key: i32, value: V) -> Self {
        Self {
            key,
            value,
            link: Link::new(),
        }
    }

    pub fn key(&self) -> i32 {
        self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V> Linked for Entry<V> {
    fn link(&self) -> &Link {
        &self.link
    }
    fn link_mut(&mut self) -> &mut Link {
        &mut self.link
    }
}

pub struct HashTable<V = i32> {
    buckets: Vec<List<Entry<V>>>,
    len: usize,
}

impl<V> HashTable<V> {
    pub fn new() -> Self {
        Self {
            buckets: (0..DEFAULT_BUCKETS).map(|_| List::new()).collect(),
            len: 0,
        }
    }

    /// Allocate `bucket_count` empty buckets. The count is fixed for the
    /// lifetime of the table.
    pub fn with_buckets(bucket_count: usize) -> Result<Self, TableError> {
        if bucket_count == 0 {
            return Err(TableError::ZeroBuckets);
        }
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(bucket_count)
            .map_err(|source| TableError::Alloc {
                buckets: bucket_count,
                source,
            })?;
        buckets.extend((0..bucket_count).map(|_| List::new()));
        Ok(Self { buckets, len: 0 })
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Mathematical modulo of the key by the bucket count, so negative keys
    /// land in range too.
    pub fn bucket_index(&self, key: i32) -> usize {
        // A live bucket array is never longer than isize::MAX.
        i64::from(key).rem_euclid(self.buckets.len() as i64) as usize
    }

    pub fn bucket(&self, index: usize) -> Option<&List<Entry<V>>> {
        self.buckets.get(index)
    }

    fn locate(bucket: &List<Entry<V>>, key: i32) -> Option<Handle> {
        if bucket.is_empty() {
            return None;
        }
        bucket
            .iter()
            .find(|(_, e)| e.key == key)
            .map(|(h, _)| h)
    }

    /// Insert or overwrite. An existing entry keeps its place in the bucket
    /// and its old value is returned; a new key is appended to the bucket.
    pub fn put(&mut self, key: i32, value: V) -> Option<V> {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        if let Some(entry) = Self::locate(bucket, key).and_then(|h| h.get_mut(bucket)) {
            return Some(mem::replace(&mut entry.value, value));
        }
        bucket.add_tail(Entry::new(key, value));
        self.len += 1;
        None
    }

    /// Like `put`, but builds the value only when the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: i32, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        let handle = match Self::locate(bucket, key) {
            Some(h) => h,
            None => {
                let h = bucket.add_tail(Entry::new(key, default()));
                self.len += 1;
                h
            }
        };
        &mut handle
            .get_mut(bucket)
            .expect("entry must exist immediately after lookup or insert")
            .value
    }

    pub fn get(&self, key: i32) -> Option<&V> {
        let bucket = &self.buckets[self.bucket_index(key)];
        Self::locate(bucket, key)
            .and_then(|h| h.get(bucket))
            .map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: i32) -> Option<&mut V> {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        Self::locate(bucket, key)
            .and_then(|h| h.get_mut(bucket))
            .map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: i32) -> bool {
        self.get(key).is_some()
    }

    /// Unlink the entry for `key` and return its value; `None` leaves every
    /// bucket untouched.
    pub fn remove(&mut self, key: i32) -> Option<V> {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        let entry = Self::locate(bucket, key).and_then(|h| bucket.remove(h))?;
        self.len -= 1;
        Some(entry.value)
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Consume the table, handing every entry to `destroy` bucket by bucket,
    /// head to tail, before the bucket array is released.
    pub fn teardown<F>(mut self, mut destroy: F)
    where
        F: FnMut(i32, V),
    {
        for bucket in &mut self.buckets {
            bucket.free(|e| destroy(e.key, e.value));
        }
    }

    /// Entries bucket by bucket, each bucket head to tail.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &V)> {
        self.buckets
            .iter()
            .flat_map(|b| b.iter().map(|(_, e)| (e.key, &e.value)))
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for HashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Extend<(i32, V)> for HashTable<V> {
    fn extend<I: IntoIterator<Item = (i32, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<V> FromIterator<(i32, V)> for HashTable<V> {
    fn from_iter<I: IntoIterator<Item = (i32, V)>>(iter: I) -> Self {
        let mut t = Self::new();
        t.extend(iter);
        t
    }
}
