//! Application services - Use case implementations

mod block_cache_service;
mod mogwai_service;

pub use block_cache_service::{BlockCacheService, CacheStats, SyncReport};
pub use mogwai_service::{AdventureRun, BindingError, MogwaiService};
