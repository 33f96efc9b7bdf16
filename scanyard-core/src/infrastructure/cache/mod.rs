//! Caching implementations
//!
//! This module contains the Dragonfly DB client used for scan persistence.

pub mod dragonfly_cache;

pub use dragonfly_cache::{CacheError, DragonflyCache};
