//! # Named Cache Registry
//!
//! A [`Registry`] owns many independently typed [`Storage`]s and addresses
//! them by name. Storages are held as `Box<dyn QueryStorage>`, so every
//! operation on the registry goes through text.
//!
//! ```text
//!   Registry
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │  storages: FxHashMap<String, Slot>                            │
//!   │    "mycontainer" ─► Slot { generation: 1, Storage<String,i32> }│
//!   │    "container2"  ─► Slot { generation: 2, Storage<FloatKey,String> }
//!   │                                                               │
//!   │  error:        Option<RegistryError>                          │
//!   │  last_failing: Option<FailingStorage { name, generation }>    │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error reporting
//!
//! When a storage rejects a call the registry records
//! [`RegistryError::Storage`] and remembers *which* storage failed as a
//! `(name, generation)` pair. It does not copy the storage's message.
//! [`Registry::error_string`] resolves that pair on demand and appends the
//! storage's own message, e.g. `"Cache error: Entry not found"`. If the
//! storage has since been destroyed, or destroyed and recreated under the
//! same name, the pair no longer resolves and only `"Cache error"` is
//! produced.
//!
//! ## Example
//!
//! ```
//! use lrukit::error::RegistryError;
//! use lrukit::registry::Registry;
//!
//! let mut registry = Registry::new();
//! registry.create::<String, i32>("mycontainer", 3).unwrap();
//! registry.add("mycontainer", "\"mykey1\"", "42").unwrap();
//! assert_eq!(registry.get("mycontainer", "\"mykey1\"").unwrap(), "42");
//!
//! assert_eq!(registry.get("mycontainer", "\"nope\""), Err(RegistryError::Storage));
//! assert_eq!(registry.error_string(), "Cache error: Entry not found");
//!
//! registry.destroy("mycontainer").unwrap();
//! assert_eq!(registry.add("mycontainer", "\"k\"", "1"), Err(RegistryError::NotFound));
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::builder::StorageBuilder;
use crate::codec::{DoubleKey, FloatKey, TextCodec};
use crate::error::{RegistryError, StorageError};
use crate::traits::QueryStorage;

/// Key or value type selectable by name when creating a cache at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `String`, quoted text.
    String,
    /// `i32`.
    Int,
    /// `i64`.
    Long,
    /// `f32`, or [`FloatKey`] in key position.
    Float,
    /// `f64`, or [`DoubleKey`] in key position.
    Double,
    /// `bool`.
    Bool,
}

impl TypeTag {
    pub const ALL: [TypeTag; 6] = [
        TypeTag::String,
        TypeTag::Int,
        TypeTag::Long,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::Bool,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::String => String::TYPE_NAME,
            TypeTag::Int => i32::TYPE_NAME,
            TypeTag::Long => i64::TYPE_NAME,
            TypeTag::Float => f32::TYPE_NAME,
            TypeTag::Double => f64::TYPE_NAME,
            TypeTag::Bool => bool::TYPE_NAME,
        }
    }
}

impl FromStr for TypeTag {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or(RegistryError::InvalidKeyOrValueType)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct Slot {
    generation: u64,
    storage: Box<dyn QueryStorage>,
}

/// Non-owning reference to the storage that last failed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FailingStorage {
    name: String,
    generation: u64,
}

/// Owner of named, independently typed caches.
#[derive(Default)]
pub struct Registry {
    storages: FxHashMap<String, Slot>,
    next_generation: u64,
    error: Option<RegistryError>,
    last_failing: Option<FailingStorage>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new `Storage<K, V>` of the given capacity under `name`.
    ///
    /// Fails with [`RegistryError::AlreadyExists`] if the name is taken and
    /// with [`RegistryError::InvalidCapacity`] if the storage rejects
    /// `capacity`.
    pub fn create<K, V>(&mut self, name: &str, capacity: usize) -> Result<(), RegistryError>
    where
        K: Eq + Hash + Clone + TextCodec + 'static,
        V: TextCodec + 'static,
    {
        if self.storages.contains_key(name) {
            return Err(self.fail(name, RegistryError::AlreadyExists));
        }

        let storage = match StorageBuilder::new(capacity)
            .label(name)
            .try_build::<K, V>()
        {
            Ok(storage) => storage,
            Err(e) => {
                debug!(cache = name, error = %e, "rejected cache configuration");
                return Err(self.fail(name, RegistryError::InvalidCapacity));
            },
        };

        self.next_generation += 1;
        self.storages.insert(
            name.to_string(),
            Slot {
                generation: self.next_generation,
                storage: Box::new(storage),
            },
        );
        debug!(
            cache = name,
            key_type = K::TYPE_NAME,
            value_type = V::TYPE_NAME,
            capacity,
            "created cache"
        );
        self.error = None;
        Ok(())
    }

    /// Registers a cache whose key and value types are chosen at runtime.
    pub fn create_typed(
        &mut self,
        name: &str,
        key: TypeTag,
        value: TypeTag,
        capacity: usize,
    ) -> Result<(), RegistryError> {
        match key {
            TypeTag::String => self.create_with_value::<String>(name, value, capacity),
            TypeTag::Int => self.create_with_value::<i32>(name, value, capacity),
            TypeTag::Long => self.create_with_value::<i64>(name, value, capacity),
            TypeTag::Float => self.create_with_value::<FloatKey>(name, value, capacity),
            TypeTag::Double => self.create_with_value::<DoubleKey>(name, value, capacity),
            TypeTag::Bool => self.create_with_value::<bool>(name, value, capacity),
        }
    }

    /// Like [`create_typed`](Self::create_typed), with types given by name
    /// (`"string"`, `"int"`, `"long"`, `"float"`, `"double"`, `"bool"`).
    ///
    /// Unknown names fail with [`RegistryError::InvalidKeyOrValueType`].
    ///
    /// ```
    /// use lrukit::error::RegistryError;
    /// use lrukit::registry::Registry;
    ///
    /// let mut registry = Registry::new();
    /// registry.create_by_type_names("container2", "float", "string", 2).unwrap();
    /// registry.add("container2", "4.2", "\"val1\"").unwrap();
    /// assert_eq!(
    ///     registry.create_by_type_names("bad", "complex", "string", 2),
    ///     Err(RegistryError::InvalidKeyOrValueType)
    /// );
    /// ```
    pub fn create_by_type_names(
        &mut self,
        name: &str,
        key_type: &str,
        value_type: &str,
        capacity: usize,
    ) -> Result<(), RegistryError> {
        let tags = key_type
            .parse::<TypeTag>()
            .and_then(|key| value_type.parse::<TypeTag>().map(|value| (key, value)));
        match tags {
            Ok((key, value)) => self.create_typed(name, key, value, capacity),
            Err(e) => Err(self.fail(name, e)),
        }
    }

    fn create_with_value<K>(
        &mut self,
        name: &str,
        value: TypeTag,
        capacity: usize,
    ) -> Result<(), RegistryError>
    where
        K: Eq + Hash + Clone + TextCodec + 'static,
    {
        match value {
            TypeTag::String => self.create::<K, String>(name, capacity),
            TypeTag::Int => self.create::<K, i32>(name, capacity),
            TypeTag::Long => self.create::<K, i64>(name, capacity),
            TypeTag::Float => self.create::<K, f32>(name, capacity),
            TypeTag::Double => self.create::<K, f64>(name, capacity),
            TypeTag::Bool => self.create::<K, bool>(name, capacity),
        }
    }

    /// Adds an entry to the named cache from its textual key and value.
    pub fn add(&mut self, name: &str, key: &str, value: &str) -> Result<(), RegistryError> {
        let Some(slot) = self.storages.get_mut(name) else {
            return Err(self.fail(name, RegistryError::NotFound));
        };
        let generation = slot.generation;
        match slot.storage.query_add(key, value) {
            Ok(()) => {
                self.error = None;
                Ok(())
            },
            Err(cause) => Err(self.fail_in_storage(name, generation, cause)),
        }
    }

    /// Looks up a textual key in the named cache and returns the value text.
    pub fn get(&mut self, name: &str, key: &str) -> Result<String, RegistryError> {
        let Some(slot) = self.storages.get_mut(name) else {
            return Err(self.fail(name, RegistryError::NotFound));
        };
        let generation = slot.generation;
        match slot.storage.query_get(key) {
            Ok(text) => {
                self.error = None;
                Ok(text)
            },
            Err(cause) => Err(self.fail_in_storage(name, generation, cause)),
        }
    }

    /// Removes the named cache and every entry in it.
    pub fn destroy(&mut self, name: &str) -> Result<(), RegistryError> {
        match self.storages.remove(name) {
            Some(slot) => {
                debug!(cache = name, entries = slot.storage.len(), "destroyed cache");
                self.error = None;
                Ok(())
            },
            None => Err(self.fail(name, RegistryError::NotFound)),
        }
    }

    /// Error of the most recent call, `None` on success.
    pub fn error(&self) -> Option<RegistryError> {
        self.error
    }

    /// Human-readable form of the most recent error.
    ///
    /// For [`RegistryError::Storage`] the failing storage's own message is
    /// appended when that storage still exists.
    pub fn error_string(&self) -> String {
        match (self.error, self.failing_storage()) {
            (Some(RegistryError::Storage), Some(storage)) => {
                format!("{}: {}", RegistryError::Storage, storage.error_string())
            },
            (error, _) => RegistryError::describe(error).to_string(),
        }
    }

    /// Current error of the storage behind the last [`RegistryError::Storage`],
    /// if that storage still exists.
    pub fn failing_storage_error(&self) -> Option<StorageError> {
        match self.error {
            Some(RegistryError::Storage) => self.failing_storage()?.error(),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.storages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.storages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.storages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Read-only view of a registered storage.
    pub fn storage(&self, name: &str) -> Option<&dyn QueryStorage> {
        self.storages.get(name).map(|slot| slot.storage.as_ref())
    }

    fn failing_storage(&self) -> Option<&dyn QueryStorage> {
        let failing = self.last_failing.as_ref()?;
        self.storages
            .get(&failing.name)
            .filter(|slot| slot.generation == failing.generation)
            .map(|slot| slot.storage.as_ref())
    }

    fn fail(&mut self, name: &str, error: RegistryError) -> RegistryError {
        debug!(cache = name, %error, "registry operation failed");
        self.error = Some(error);
        error
    }

    fn fail_in_storage(&mut self, name: &str, generation: u64, cause: StorageError) -> RegistryError {
        debug!(cache = name, %cause, "cache rejected operation");
        self.last_failing = Some(FailingStorage {
            name: name.to_string(),
            generation,
        });
        self.error = Some(RegistryError::Storage);
        RegistryError::Storage
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names())
            .field("error", &self.error)
            .field("last_failing", &self.last_failing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_round_trip_names() {
        for tag in TypeTag::ALL {
            assert_eq!(tag.name().parse::<TypeTag>(), Ok(tag));
            assert_eq!(tag.to_string(), tag.name());
        }
        assert_eq!(
            "complex".parse::<TypeTag>(),
            Err(RegistryError::InvalidKeyOrValueType)
        );
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = Registry::new();
        registry.create::<String, i32>("c", 3).unwrap();
        assert_eq!(
            registry.create::<i32, i32>("c", 3),
            Err(RegistryError::AlreadyExists)
        );
        assert_eq!(registry.error_string(), "Cache already exists");
        assert_eq!(registry.storage("c").unwrap().key_type(), "string");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.create::<String, i32>("c", 0),
            Err(RegistryError::InvalidCapacity)
        );
        assert!(!registry.contains("c"));
    }

    #[test]
    fn wrapped_error_appends_storage_message() {
        let mut registry = Registry::new();
        registry.create::<String, i32>("c", 3).unwrap();
        assert_eq!(registry.add("c", "bare", "1"), Err(RegistryError::Storage));
        assert_eq!(registry.error_string(), "Cache error: Invalid key string");
        assert_eq!(
            registry.failing_storage_error(),
            Some(StorageError::InvalidKeyString)
        );

        assert_eq!(registry.add("c", "\"k\"", "x"), Err(RegistryError::Storage));
        assert_eq!(registry.error_string(), "Cache error: Invalid value string");
    }

    #[test]
    fn wrapped_error_degrades_after_destroy() {
        let mut registry = Registry::new();
        registry.create::<String, i32>("c", 3).unwrap();
        let _ = registry.get("c", "\"missing\"");
        registry.destroy("c").unwrap();

        // Re-record the storage error code without touching the back-reference.
        registry.error = Some(RegistryError::Storage);
        assert_eq!(registry.error_string(), "Cache error");
        assert_eq!(registry.failing_storage_error(), None);
    }

    #[test]
    fn recreated_name_does_not_resolve_old_failure() {
        let mut registry = Registry::new();
        registry.create::<String, i32>("c", 3).unwrap();
        let _ = registry.get("c", "\"missing\"");
        registry.destroy("c").unwrap();
        registry.create::<String, i32>("c", 3).unwrap();
        let _ = registry.get("c", "bare");

        let old = registry.last_failing.clone().unwrap();
        registry.destroy("c").unwrap();
        registry.create::<String, i32>("c", 3).unwrap();
        registry.last_failing = Some(old);
        registry.error = Some(RegistryError::Storage);
        assert_eq!(registry.error_string(), "Cache error");
    }

    #[test]
    fn success_resets_error() {
        let mut registry = Registry::new();
        assert_eq!(registry.destroy("nope"), Err(RegistryError::NotFound));
        assert_eq!(registry.error_string(), "Cache not found");
        registry.create::<String, i32>("c", 1).unwrap();
        assert_eq!(registry.error(), None);
        assert_eq!(registry.error_string(), "Success");
    }

    #[test]
    fn create_typed_covers_every_pair() {
        let mut registry = Registry::new();
        for key in TypeTag::ALL {
            for value in TypeTag::ALL {
                let name = format!("{key}-{value}");
                registry.create_typed(&name, key, value, 2).unwrap();
                let storage = registry.storage(&name).unwrap();
                assert_eq!(storage.key_type(), key.name());
                assert_eq!(storage.value_type(), value.name());
            }
        }
        assert_eq!(registry.len(), 36);
    }

    #[test]
    fn unknown_type_name_records_error() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.create_by_type_names("c", "string", "matrix", 2),
            Err(RegistryError::InvalidKeyOrValueType)
        );
        assert_eq!(registry.error_string(), "Invalid key or value type");
        assert!(registry.is_empty());
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = Registry::new();
        registry.create::<String, i32>("b", 1).unwrap();
        registry.create::<String, i32>("a", 1).unwrap();
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert!(format!("{:?}", registry).contains("\"a\""));
    }
}
