//! Common imports.
//!
//! ```
//! use lrukit::prelude::*;
//!
//! let mut cache = LruCore::new(2);
//! cache.set("a", 1);
//! assert_eq!(cache.get(&"a"), Some(&1));
//! ```

pub use crate::builder::StorageBuilder;
pub use crate::codec::{DoubleKey, FloatKey, TextCodec};
pub use crate::error::{RegistryError, StorageError};
pub use crate::policy::lru::LruCore;
pub use crate::registry::{Registry, TypeTag};
pub use crate::storage::Storage;
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache, QueryStorage};
