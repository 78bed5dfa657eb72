//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Node: JSON-RPC client for the chain node's wallet
//! - Block store: SQLite and in-memory block hash storage
//! - HTTP: REST API routes
//! - Config: Application configuration
//! - State: Shared application state

pub mod block_store;
pub mod cache_worker;
pub mod config;
pub mod http;
pub mod node_client;
pub mod state;
