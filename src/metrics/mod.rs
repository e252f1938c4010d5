//! Optional counters for the LRU engine, enabled by the `metrics` feature.

pub mod cell;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
