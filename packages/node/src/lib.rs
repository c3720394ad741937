//! Public surface for the `judgeapi-node` crate.
//!
//! Exposes the router builder, config and storage types so that external
//! crates (e.g. the conformance test suite) can spin up an in-process node
//! without spawning a subprocess.

pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod router;
pub mod storage;
pub mod transport;

pub use config::NodeConfig;
pub use error::NodeError;
pub use identity::UserDirectory;
pub use router::build_router;
pub use storage::{memory::MemoryStorage, ContestStorage};
