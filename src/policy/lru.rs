//! # Least Recently Used (LRU) Cache Engine
//!
//! The recency-ordered map underneath every [`Storage`](crate::storage::Storage).
//! It holds at most `capacity` entries; each `set` or `get` moves the entry to
//! the most-recently-used end and an overflowing `set` evicts the
//! least-recently-used one.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         LruCore<K, V>                            │
//!   │                                                                  │
//!   │   ┌──────────────────────────────────────────────────────────┐   │
//!   │   │  FxHashMap<K, SlotId>  (index)                           │   │
//!   │   │    "mykey1" ───────────────────────────────┐             │   │
//!   │   │    "mykey2" ─────────────────────┐         │             │   │
//!   │   │    "mykey3" ───────────┐         │         │             │   │
//!   │   └────────────────────────┼─────────┼─────────┼─────────────┘   │
//!   │                            ▼         ▼         ▼                 │
//!   │   ┌──────────────────────────────────────────────────────────┐   │
//!   │   │  IntrusiveList<Entry<K, V>>  (recency order)             │   │
//!   │   │                                                          │   │
//!   │   │  head ──► [mykey3] ◄──► [mykey2] ◄──► [mykey1] ◄── tail  │   │
//!   │   │   (MRU)                                        (LRU)     │   │
//!   │   └──────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   set(mykey4) on a full cache (capacity = 3)
//!     1. push [mykey4] at head
//!     2. len 4 > 3: pop [mykey1] from tail, drop it from the index
//!     3. return true (evicted)
//!
//!     head ──► [mykey4] ◄──► [mykey3] ◄──► [mykey2] ◄── tail
//!
//!   get(mykey2)
//!     1. index lookup: O(1) average
//!     2. move_to_front: O(1)
//!
//!     head ──► [mykey2] ◄──► [mykey4] ◄──► [mykey3] ◄── tail
//! ```
//!
//! ## Methods
//!
//! | Method             | Complexity | Description                             |
//! |--------------------|------------|-----------------------------------------|
//! | `new(capacity)`    | O(1)       | Create an empty cache                   |
//! | `set(k, v)`        | O(1)*      | Insert or overwrite, may evict the LRU  |
//! | `get(&k)`          | O(1)*      | Lookup and move to MRU                  |
//! | `peek(&k)`         | O(1)*      | Lookup without reordering               |
//! | `remove(&k)`       | O(1)*      | Remove by key                           |
//! | `pop_lru()`        | O(1)       | Remove the least recently used entry    |
//! | `peek_lru()`       | O(1)       | Inspect the least recently used entry   |
//! | `touch(&k)`        | O(1)*      | Move to MRU without reading             |
//! | `recency_rank(&k)` | O(n)       | Position in recency order (0 = MRU)     |
//! | `iter()`           | O(n)       | Entries from MRU to LRU                 |
//!
//! `*` average, dominated by the hash lookup.
//!
//! ## Borrowing
//!
//! `get` returns `Option<&V>` borrowed from `&mut self`. The reference cannot
//! outlive the next call that mutates the cache, which is exactly the window
//! in which the entry is guaranteed to still exist.
//!
//! ## Thread Safety
//!
//! `LruCore` is single-threaded. `get` reorders, so even reads need exclusive
//! access; callers sharing a cache across threads must wrap it in a mutex.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// One key-value pair in the recency list.
#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity map with least-recently-used eviction.
///
/// Keys are cloned once into the index; values are stored only in the
/// recency list.
pub struct LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is accepted here and yields a cache that keeps
    /// nothing: every `set` evicts the entry it just inserted. The
    /// [`Storage`](crate::storage::Storage) facade rejects zero capacity.
    ///
    /// # Example
    /// ```
    /// use lrukit::policy::lru::LruCore;
    /// use lrukit::traits::CoreCache;
    ///
    /// let cache: LruCore<u32, String> = LruCore::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    #[inline]
    pub fn new(capacity: usize) -> Self {
        LruCore {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: IntrusiveList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Looks up `key` without changing its recency.
    ///
    /// ```
    /// use lrukit::policy::lru::LruCore;
    /// use lrukit::traits::CoreCache;
    ///
    /// let mut cache: LruCore<u32, &str> = LruCore::new(2);
    /// cache.set(1, "first");
    /// cache.set(2, "second");
    /// assert_eq!(cache.peek(&1), Some(&"first"));
    ///
    /// // 1 is still the least recently used entry.
    /// cache.set(3, "third");
    /// assert!(!cache.contains(&1));
    /// ```
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let id = *self.index.get(key)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_found();
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|entry| &entry.key)
    }

    /// Verifies that the index, the recency list and the capacity agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_links()?;

        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but recency list holds {} entries",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if entry.key == *key => {},
                Some(_) => {
                    return Err(InvariantError::new(
                        "index points at an entry with a different key",
                    ));
                },
                None => return Err(InvariantError::new("index points at a freed slot")),
            }
        }
        Ok(())
    }

    fn evict_overflow(&mut self) -> bool {
        if self.list.len() <= self.capacity {
            return false;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        match self.list.pop_back() {
            Some(evicted) => {
                self.index.remove(&evicted.key);
                #[cfg(feature = "metrics")]
                self.metrics.record_evicted_entry();
                trace!(capacity = self.capacity, "evicted least recently used entry");
                true
            },
            None => false,
        }
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn set(&mut self, key: K, value: V) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            if let Some(entry) = self.list.get_mut(id) {
                entry.value = value;
            }
            self.list.move_to_front(id);

            debug_assert!(self.check_invariants().is_ok());
            return false;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        let evicted = self.evict_overflow();

        debug_assert!(self.check_invariants().is_ok());
        evicted
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            },
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        self.list.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn pop_lru(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_found();
        Some((entry.key, entry.value))
    }

    #[inline]
    fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    #[inline]
    fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        match self.index.get(key) {
            Some(&id) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_touch_found();
                self.list.move_to_front(id)
            },
            None => false,
        }
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        if !self.index.contains_key(key) {
            return None;
        }
        self.list.iter().position(|entry| entry.key == *key)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Resets all counters to zero.
    pub fn reset_metrics(&mut self) {
        self.metrics = LruMetrics::default();
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics.snapshot(self.list.len(), self.capacity)
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.list.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
