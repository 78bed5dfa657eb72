//! Block store - Infrastructure adapters for the block hash repository port

mod factory;
mod memory_store;
mod sqlite_store;

pub use factory::BlockStoreBackend;
pub use memory_store::InMemoryBlockHashRepository;
pub use sqlite_store::SqliteBlockHashRepository;
