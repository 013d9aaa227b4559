//! Error types for table setup and positional list insertion.

use core::fmt;
use std::collections::TryReserveError;
use thiserror::Error;

/// Failure to set up a `HashTable`.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("bucket count must be positive")]
    ZeroBuckets,
    #[error("failed to allocate {buckets} buckets")]
    Alloc {
        buckets: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Returned by `List::add_at` when the index is past the end of the list.
/// The list is left untouched and the rejected element is handed back.
pub struct IndexError<T> {
    index: usize,
    list_len: usize,
    element: T,
}

impl<T> IndexError<T> {
    pub(crate) fn new(index: usize, list_len: usize, element: T) -> Self {
        Self {
            index,
            list_len,
            element,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the list at the time of the rejected insert.
    pub fn list_len(&self) -> usize {
        self.list_len
    }

    pub fn into_inner(self) -> T {
        self.element
    }
}

// Manual impls: the element type need not be `Debug`.
impl<T> fmt::Debug for IndexError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexError")
            .field("index", &self.index)
            .field("list_len", &self.list_len)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for IndexError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "insertion index {} is past the end of a list of length {}",
            self.index, self.list_len
        )
    }
}

impl<T> std::error::Error for IndexError<T> {}
