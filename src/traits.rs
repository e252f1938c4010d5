//! # Cache Trait Hierarchy
//!
//! Two families of traits live here. The typed family describes the LRU
//! engine; the text family is the narrow, object-safe surface a
//! [`Registry`](crate::registry::Registry) uses to hold caches of different
//! key and value types side by side.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  set(&mut, K, V) → bool (evicted)       │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains / len / capacity / clear      │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          MutableCache<K, V>             │
//!   │  remove(&K) → Option<V>                 │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          LruCacheTrait<K, V>            │
//!   │  pop_lru / peek_lru / touch /           │
//!   │  recency_rank                           │
//!   └─────────────────────────────────────────┘
//!
//!   ┌─────────────────────────────────────────┐
//!   │       QueryStorage (dyn-compatible)     │
//!   │  query_add(&str, &str)                  │
//!   │  query_get(&str) → String               │
//!   │  error / error_string                   │
//!   │  len / capacity / key_type / value_type │
//!   └─────────────────────────────────────────┘
//!        ▲ implemented by Storage<K, V> for every K, V with a TextCodec
//! ```
//!
//! ## Trait Summary
//!
//! | Trait            | Extends        | Purpose                                  |
//! |------------------|----------------|------------------------------------------|
//! | `CoreCache`      | -              | Bounded set/get with eviction reporting  |
//! | `MutableCache`   | `CoreCache`    | Arbitrary key removal                    |
//! | `LruCacheTrait`  | `MutableCache` | Recency-specific inspection and eviction |
//! | `QueryStorage`   | -              | Text-only access for type-erased caches  |

use crate::error::StorageError;

/// Operations every bounded cache supports.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCore;
/// use lrukit::traits::CoreCache;
///
/// let mut cache: LruCore<&str, i32> = LruCore::new(2);
/// assert!(!cache.set("a", 1));
/// assert!(!cache.set("b", 2));
/// assert!(cache.set("c", 3)); // "a" is evicted
/// assert_eq!(cache.get(&"a"), None);
/// assert_eq!(cache.get(&"c"), Some(&3));
/// ```
pub trait CoreCache<K, V> {
    /// Inserts or overwrites `key`.
    ///
    /// Returns `true` when another entry had to be evicted to respect the
    /// capacity. Overwriting an existing key never evicts.
    fn set(&mut self, key: K, value: V) -> bool;

    /// Looks up `key`, marking it as most recently used on a hit.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Membership test that does not touch recency.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed maximum number of entries.
    fn capacity(&self) -> usize;

    fn clear(&mut self);
}

/// Caches that allow removing an arbitrary key.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key` and returns its value.
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// Recency-aware operations of an LRU cache.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Least recently used entry, without reordering.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` as most recently used. Returns `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// Position of `key` in recency order, `0` being most recent.
    ///
    /// This walks the list and is O(n).
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Text-only view of a cache whose key and value types are erased.
///
/// Every call overwrites the last error recorded by the implementor; a
/// successful call resets it to `None`.
///
/// # Example
///
/// ```
/// use lrukit::storage::Storage;
/// use lrukit::traits::QueryStorage;
///
/// let mut erased: Box<dyn QueryStorage> = Box::new(Storage::<String, i32>::new(3));
/// erased.query_add("\"mykey1\"", "42").unwrap();
/// assert_eq!(erased.query_get("\"mykey1\"").unwrap(), "42");
/// assert!(erased.query_get("\"nope\"").is_err());
/// assert_eq!(erased.error_string(), "Entry not found");
/// ```
pub trait QueryStorage {
    /// Decodes both texts and stores the entry.
    ///
    /// The key is decoded first. Nothing is stored unless both decode.
    fn query_add(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Decodes the key, looks it up and encodes the value found.
    fn query_get(&mut self, key: &str) -> Result<String, StorageError>;

    /// Error of the most recent call, `None` on success.
    fn error(&self) -> Option<StorageError>;

    /// Human-readable form of [`error`](QueryStorage::error).
    fn error_string(&self) -> String {
        StorageError::describe(self.error()).to_string()
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    /// Short name of the key type, e.g. `"string"`.
    fn key_type(&self) -> &'static str;

    /// Short name of the value type, e.g. `"int"`.
    fn value_type(&self) -> &'static str;
}
