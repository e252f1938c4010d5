//! # Typed Storage Facade
//!
//! [`Storage<K, V>`] pairs an [`LruCore`] with a last-operation error code and
//! offers two ways in:
//!
//! - **native**: [`add`](Storage::add) and [`get`](Storage::get) take and
//!   return `K` and `V` directly;
//! - **query**: [`query_add`](Storage::query_add) and
//!   [`query_get`](Storage::query_get) take and return text, converted with the
//!   [`TextCodec`] of `K` and `V`.
//!
//! ```text
//!   query_add("\"mykey1\"", "42")
//!        │
//!        ├─ K::decode("\"mykey1\"") ── Err ─► InvalidKeyString   (no mutation)
//!        ├─ V::decode("42")         ── Err ─► InvalidValueString (no mutation)
//!        ▼
//!   add("mykey1", 42) ─► LruCore::set
//!
//!   query_get("\"mykey1\"")
//!        │
//!        ├─ K::decode ── Err ─► InvalidKeyString
//!        ├─ get(&key)  ── None ─► EntryNotFound
//!        ├─ V::encode  ── Err ─► CouldNotConvertData
//!        ▼
//!   Ok("42")
//! ```
//!
//! Every public call overwrites the recorded error, so [`error`](Storage::error)
//! always describes the most recent call and is `None` after a success.
//!
//! ## Example
//!
//! ```
//! use lrukit::error::StorageError;
//! use lrukit::storage::Storage;
//!
//! let mut storage: Storage<String, i32> = Storage::new(3);
//! storage.query_add("\"mykey1\"", "42").unwrap();
//! storage.add("mykey2".to_string(), 17);
//!
//! assert_eq!(storage.query_get("\"mykey2\"").unwrap(), "17");
//! assert_eq!(storage.get(&"mykey1".to_string()), Some(&42));
//!
//! assert_eq!(storage.query_add("\"mykey3\"", "19x"), Err(StorageError::InvalidValueString));
//! assert_eq!(storage.len(), 2);
//! ```

use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::codec::TextCodec;
use crate::error::{ConfigError, StorageError};
use crate::policy::lru::LruCore;
use crate::traits::{CoreCache, QueryStorage};

/// LRU cache with an error state and a text-marshalling interface.
pub struct Storage<K, V>
where
    K: Eq + Hash + Clone,
{
    cache: LruCore<K, V>,
    error: Option<StorageError>,
    label: Option<String>,
}

impl<K, V> Storage<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a storage holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(storage) => storage,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a storage, returning [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("storage capacity must be greater than zero"));
        }
        Ok(Self::from_parts(LruCore::new(capacity), None))
    }

    pub(crate) fn from_parts(cache: LruCore<K, V>, label: Option<String>) -> Self {
        Self {
            cache,
            error: None,
            label,
        }
    }

    /// Inserts or overwrites an entry. Always succeeds.
    pub fn add(&mut self, key: K, value: V) {
        self.cache.set(key, value);
        self.error = None;
    }

    /// Looks up `key`, marking it most recently used.
    ///
    /// Records [`StorageError::EntryNotFound`] on a miss. The returned
    /// reference lives until the next call that mutates this storage.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.cache.get(key) {
            Some(value) => {
                self.error = None;
                Some(value)
            },
            None => {
                self.error = Some(StorageError::EntryNotFound);
                None
            },
        }
    }

    /// Membership test that does not touch recency or the error state.
    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains(key)
    }

    /// Error of the most recent call, `None` on success.
    pub fn error(&self) -> Option<StorageError> {
        self.error
    }

    pub fn error_string(&self) -> String {
        StorageError::describe(self.error).to_string()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Drops every entry and resets the error state.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.error = None;
    }

    /// Name given through [`StorageBuilder::label`](crate::builder::StorageBuilder::label).
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Read-only access to the underlying engine.
    pub fn cache(&self) -> &LruCore<K, V> {
        &self.cache
    }

    fn fail(&mut self, error: StorageError) -> StorageError {
        debug!(storage = self.label.as_deref().unwrap_or(""), %error, "storage query failed");
        self.error = Some(error);
        error
    }
}

impl<K, V> Storage<K, V>
where
    K: Eq + Hash + Clone + TextCodec,
    V: TextCodec,
{
    /// Decodes `key` and `value` and stores the entry.
    ///
    /// The key is decoded first; the cache is left untouched unless both
    /// decode.
    pub fn query_add(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let Ok(key) = K::decode(key) else {
            return Err(self.fail(StorageError::InvalidKeyString));
        };
        let Ok(value) = V::decode(value) else {
            return Err(self.fail(StorageError::InvalidValueString));
        };
        self.add(key, value);
        Ok(())
    }

    /// Decodes `key`, looks it up and returns the stored value as text.
    pub fn query_get(&mut self, key: &str) -> Result<String, StorageError> {
        let Ok(key) = K::decode(key) else {
            return Err(self.fail(StorageError::InvalidKeyString));
        };
        let encoded = match self.get(&key) {
            Some(value) => value.encode(),
            None => return Err(self.fail(StorageError::EntryNotFound)),
        };
        match encoded {
            Ok(text) => {
                self.error = None;
                Ok(text)
            },
            Err(_) => Err(self.fail(StorageError::CouldNotConvertData)),
        }
    }
}

impl<K, V> QueryStorage for Storage<K, V>
where
    K: Eq + Hash + Clone + TextCodec,
    V: TextCodec,
{
    fn query_add(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Storage::query_add(self, key, value)
    }

    fn query_get(&mut self, key: &str) -> Result<String, StorageError> {
        Storage::query_get(self, key)
    }

    fn error(&self) -> Option<StorageError> {
        self.error
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    fn key_type(&self) -> &'static str {
        K::TYPE_NAME
    }

    fn value_type(&self) -> &'static str {
        V::TYPE_NAME
    }
}

impl<K, V> fmt::Debug for Storage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("label", &self.label)
            .field("len", &self.cache.len())
            .field("capacity", &self.cache.capacity())
            .field("error", &self.error)
            .finish()
    }
}
