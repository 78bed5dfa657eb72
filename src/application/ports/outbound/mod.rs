//! Outbound ports - Interfaces that the application requires from external systems

mod block_hash_port;
mod node_port;

pub use block_hash_port::{BlockHashRepositoryPort, RepositoryError};
pub use node_port::{
    BlockInfo, MirrorAddressInfo, NodeError, NodeQueryPort, RawInput, SignedTransaction,
    UnspentOutput,
};
