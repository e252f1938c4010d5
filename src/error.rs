//! Error types for lrukit.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: invalid construction parameters (zero capacity).
//! - [`InvariantError`]: a `check_invariants` walk found inconsistent state.
//! - [`CodecError`]: text could not be decoded into, or encoded from, a value.
//! - [`StorageError`]: last-operation code of a [`Storage`](crate::storage::Storage).
//! - [`RegistryError`]: last-operation code of a [`Registry`](crate::registry::Registry).
//!
//! None of these are raised by panicking. Storages and registries both
//! return them from fallible calls and also remember the most recent one,
//! overwriting it on every call.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::error::{ConfigError, StorageError};
//! use lrukit::storage::Storage;
//!
//! let bad: Result<Storage<String, i32>, ConfigError> = Storage::try_new(0);
//! assert!(bad.is_err());
//!
//! let mut storage: Storage<String, i32> = Storage::new(2);
//! let err = storage.query_add("mykey", "42").unwrap_err();
//! assert_eq!(err, StorageError::InvalidKeyString);
//! assert_eq!(storage.error_string(), "Invalid key string");
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`LruCore::check_invariants`](crate::policy::lru::LruCore::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`Storage::try_new`](crate::storage::Storage::try_new) and
/// [`StorageBuilder::try_build`](crate::builder::StorageBuilder::try_build).
///
/// ```
/// use lrukit::builder::StorageBuilder;
///
/// let err = StorageBuilder::new(0).try_build::<String, i32>().unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// CodecError
// ---------------------------------------------------------------------------

/// Why a piece of text could not be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Text value without a leading or trailing double quote.
    MissingQuote,
    /// Nothing to parse (empty text, or only a sign or radix prefix).
    Empty,
    /// Characters left over after the number.
    TrailingCharacters,
    /// The number does not fit the target type.
    OutOfRange,
    /// A float literal that parsed to NaN or an infinity.
    NotFinite,
    /// Not a float literal at all.
    InvalidFloat,
    /// Not a boolean literal.
    InvalidBool,
    /// The value has no textual form.
    Unrepresentable,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodecError::MissingQuote => "text must be wrapped in double quotes",
            CodecError::Empty => "no digits to parse",
            CodecError::TrailingCharacters => "trailing characters after number",
            CodecError::OutOfRange => "number out of range for target type",
            CodecError::NotFinite => "float is not finite",
            CodecError::InvalidFloat => "invalid float literal",
            CodecError::InvalidBool => "invalid boolean literal",
            CodecError::Unrepresentable => "value has no textual representation",
        })
    }
}

impl std::error::Error for CodecError {}

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Failure of a single [`Storage`](crate::storage::Storage) call.
///
/// A storage records `Option<StorageError>`; `None` is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageError {
    /// The key text could not be decoded.
    InvalidKeyString,
    /// The value text could not be decoded.
    InvalidValueString,
    /// The stored value could not be encoded back to text.
    CouldNotConvertData,
    /// No entry under the requested key.
    EntryNotFound,
}

impl StorageError {
    /// Message for an optional last error, `"Success"` for `None`.
    pub fn describe(error: Option<StorageError>) -> &'static str {
        match error {
            None => "Success",
            Some(e) => e.as_str(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageError::InvalidKeyString => "Invalid key string",
            StorageError::InvalidValueString => "Invalid value string",
            StorageError::CouldNotConvertData => "Could not convert data",
            StorageError::EntryNotFound => "Entry not found",
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for StorageError {}

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

/// Failure of a single [`Registry`](crate::registry::Registry) call.
///
/// `Display` gives the generic message only. For [`RegistryError::Storage`]
/// the registry can append the failing storage's own message, see
/// [`Registry::error_string`](crate::registry::Registry::error_string).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryError {
    /// Reserved.
    Unknown,
    /// A key or value type name that no codec handles.
    InvalidKeyOrValueType,
    /// A cache with this name is already registered.
    AlreadyExists,
    /// No cache with this name.
    NotFound,
    /// The named cache reported an error of its own.
    Storage,
    /// Capacity rejected by the storage configuration.
    InvalidCapacity,
}

impl RegistryError {
    /// Message for an optional last error, `"Success"` for `None`.
    pub fn describe(error: Option<RegistryError>) -> &'static str {
        match error {
            None => "Success",
            Some(e) => e.as_str(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryError::Unknown => "Unknown error",
            RegistryError::InvalidKeyOrValueType => "Invalid key or value type",
            RegistryError::AlreadyExists => "Cache already exists",
            RegistryError::NotFound => "Cache not found",
            RegistryError::Storage => "Cache error",
            RegistryError::InvalidCapacity => "Invalid capacity",
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for RegistryError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_error<T: std::error::Error>() {}

    #[test]
    fn all_errors_implement_std_error() {
        assert_error::<InvariantError>();
        assert_error::<ConfigError>();
        assert_error::<CodecError>();
        assert_error::<StorageError>();
        assert_error::<RegistryError>();
    }

    #[test]
    fn invariant_and_config_carry_messages() {
        let err = InvariantError::new("index length mismatch");
        assert_eq!(err.to_string(), "index length mismatch");
        assert_eq!(err.message(), "index length mismatch");
        assert_eq!(err.clone(), err);

        let err = ConfigError::new("capacity must be > 0");
        assert_eq!(err.to_string(), "capacity must be > 0");
        assert!(format!("{:?}", err).contains("capacity"));
    }

    #[test]
    fn storage_messages() {
        assert_eq!(StorageError::describe(None), "Success");
        assert_eq!(
            StorageError::describe(Some(StorageError::InvalidKeyString)),
            "Invalid key string"
        );
        assert_eq!(StorageError::InvalidValueString.to_string(), "Invalid value string");
        assert_eq!(StorageError::CouldNotConvertData.to_string(), "Could not convert data");
        assert_eq!(StorageError::EntryNotFound.to_string(), "Entry not found");
    }

    #[test]
    fn registry_messages() {
        assert_eq!(RegistryError::describe(None), "Success");
        assert_eq!(RegistryError::Unknown.to_string(), "Unknown error");
        assert_eq!(
            RegistryError::InvalidKeyOrValueType.to_string(),
            "Invalid key or value type"
        );
        assert_eq!(RegistryError::AlreadyExists.to_string(), "Cache already exists");
        assert_eq!(RegistryError::NotFound.to_string(), "Cache not found");
        assert_eq!(RegistryError::Storage.to_string(), "Cache error");
        assert_eq!(RegistryError::InvalidCapacity.to_string(), "Invalid capacity");
    }

    #[test]
    fn codec_messages_are_lowercase_phrases() {
        assert_eq!(
            CodecError::MissingQuote.to_string(),
            "text must be wrapped in double quotes"
        );
        assert_eq!(CodecError::OutOfRange.to_string(), "number out of range for target type");
    }
}
