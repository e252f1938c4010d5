//! Configuration for [`Storage`] instances.
//!
//! ## Example
//!
//! ```rust
//! use lrukit::builder::StorageBuilder;
//!
//! let mut storage = StorageBuilder::new(100)
//!     .label("sessions")
//!     .build::<String, i32>();
//! storage.query_add("\"alice\"", "1").unwrap();
//! assert_eq!(storage.label(), Some("sessions"));
//! assert_eq!(storage.capacity(), 100);
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::lru::LruCore;
use crate::storage::Storage;

/// Builder for [`Storage`] instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageBuilder {
    capacity: usize,
    label: Option<String>,
}

impl StorageBuilder {
    /// Starts a builder for a storage of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            label: None,
        }
    }

    /// Names the storage in log events and in [`Storage::label`].
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Checks the configuration without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::new(match &self.label {
                Some(label) => format!("storage capacity must be greater than zero ({label})"),
                None => "storage capacity must be greater than zero".to_string(),
            }));
        }
        Ok(())
    }

    /// Builds the storage, returning [`ConfigError`] on invalid parameters.
    pub fn try_build<K, V>(self) -> Result<Storage<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        self.validate()?;
        Ok(Storage::from_parts(LruCore::new(self.capacity), self.label))
    }

    /// Builds the storage.
    ///
    /// # Panics
    ///
    /// Panics on invalid parameters. See [`try_build`](Self::try_build).
    pub fn build<K, V>(self) -> Storage<K, V>
    where
        K: Eq + Hash + Clone,
    {
        match self.try_build() {
            Ok(storage) => storage,
            Err(e) => panic!("{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_label_and_capacity() {
        let storage = StorageBuilder::new(3).label("c").build::<String, i32>();
        assert_eq!(storage.capacity(), 3);
        assert_eq!(storage.label(), Some("c"));
        assert!(storage.is_empty());
    }

    #[test]
    fn zero_capacity_mentions_label() {
        let err = StorageBuilder::new(0)
            .label("sessions")
            .try_build::<String, i32>()
            .unwrap_err();
        assert!(err.message().contains("capacity"));
        assert!(err.message().contains("sessions"));
    }

    #[test]
    fn validate_is_side_effect_free() {
        let builder = StorageBuilder::new(4);
        builder.validate().unwrap();
        assert_eq!(builder.capacity(), 4);
        assert_eq!(builder.clone(), builder);
    }

    #[test]
    #[should_panic(expected = "greater than zero")]
    fn build_panics_on_invalid_config() {
        let _ = StorageBuilder::new(0).build::<u32, u32>();
    }
}
