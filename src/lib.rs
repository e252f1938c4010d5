//! lrukit: bounded LRU caches with a text-keyed facade and a named registry.
//!
//! Layers, bottom up:
//!
//! - [`ds`]: slot arena and intrusive recency list.
//! - [`policy::lru`]: the generic [`LruCore`] engine.
//! - [`codec`]: text encoding for keys and values.
//! - [`storage`]: [`Storage`], an LRU cache that reports the status of its
//!   last call and accepts textual queries.
//! - [`registry`]: [`Registry`], named storages of mixed types.

pub mod builder;
pub mod codec;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod registry;
pub mod storage;
pub mod traits;

pub use crate::builder::StorageBuilder;
pub use crate::codec::{DoubleKey, FloatKey, TextCodec};
pub use crate::ds::{IntrusiveList, SlotArena, SlotId};
pub use crate::error::{CodecError, ConfigError, InvariantError, RegistryError, StorageError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LruMetricsSnapshot;
pub use crate::policy::lru::LruCore;
pub use crate::registry::{Registry, TypeTag};
pub use crate::storage::Storage;
