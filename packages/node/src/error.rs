//! Startup errors for the node.
//!
//! Request-time failures never reach this type: the core turns them into
//! JSON error envelopes. A [`NodeError`] means the node cannot start.

use judgeapi::ConfigurationError;

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// Invalid environment configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An endpoint could not be registered.
    #[error("endpoint registration failed: {0}")]
    Registration(#[from] ConfigurationError),

    #[error("failed to read user directory {path}: {source}")]
    UsersIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid user directory {path}: {source}")]
    UsersFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
