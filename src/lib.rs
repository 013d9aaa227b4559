//! chain-table: an intrusive circular doubly linked list and a fixed-size
//! chained hash table built on top of it.
//!
//! Internal Design:
//!
//! Summary
//! - Two layers, each usable on its own:
//!   - List<T>: circular doubly linked list with a sentinel. Elements embed
//!     a `Link` (via the `Linked` trait) and live in a per-list generational
//!     arena; links name neighbours by arena key.
//!   - HashTable<V>: a fixed array of `List<Entry<V>>` buckets. The bucket
//!     for a key is `key mod bucket_count`; collisions chain in the bucket.
//!
//! Constraints
//! - Single-threaded, no internal locking or atomics.
//! - O(1) insert/unlink at either end and at any `Handle`; O(n) indexed
//!   access, walking from whichever end is nearer.
//! - In-place insertion sort: no auxiliary storage, equal elements never move.
//! - The bucket count never changes after construction; no rehashing.
//!
//! Ownership
//! - Inserting moves an element into the list; removing moves it back out,
//!   either as a return value (`take_*`, `remove`) or through a destroy
//!   callback (`remove_*`, `delete_at`, `pop`, `free`). The callback runs
//!   after the element is unlinked and before the length is decremented.
//! - The sentinel is the list's own `base` link and never carries a payload.
//!
//! Open points, decided
//! - The table keeps an explicit entry count, updated by put/remove.
//! - Negative keys are valid: the bucket index is the mathematical modulo.
//!
//! Checks
//! - Every relink is guarded by `debug_assert!`s on the neighbour links.
//!   `List::links_consistent` walks the whole ring. It runs after each sort
//!   in debug builds, and the tests call it after every step.
//!
//! Non-goals
//! - Thread safety, resizing/load-factor tracking, non-integer table keys,
//!   iterator invalidation safety under mutation.

pub mod error;
pub mod hash_table;
mod hash_table_proptest;
pub mod list;
mod list_proptest;

// Public surface
pub use error::{IndexError, TableError};
pub use hash_table::{Entry, HashTable, DEFAULT_BUCKETS};
pub use list::{Handle, Link, Linked, List};
