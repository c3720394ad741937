//! `judgeapi-node`: judge REST API server.
//!
//! # Quick start
//!
//! ```sh
//! # Demo contest on the default port, everyone anonymous:
//! judgeapi-node
//!
//! # With bearer-token users and a custom mount point:
//! JAPI_USERS=./users.json JAPI_BASE_PATH=/jury/api judgeapi-node
//! ```
//!
//! # Environment variables
//!
//! See [`NodeConfig::from_env`] for the full list.

use std::process::ExitCode;
use std::sync::Arc;

use judgeapi_node::{build_router, ContestStorage, MemoryStorage, NodeConfig, NodeError, UserDirectory};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "judgeapi=info,judgeapi_node=info,tower_http=debug".into()
            }),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), NodeError> {
    let config = NodeConfig::from_env()?;

    let users = match &config.users_path {
        Some(path) => {
            let users = UserDirectory::load(path)?;
            tracing::info!("users: {} bearer tokens from {}", users.len(), path.display());
            users
        }
        None => {
            tracing::info!("users: none configured, all callers are anonymous");
            UserDirectory::new()
        }
    };

    let storage: Arc<dyn ContestStorage> = Arc::new(MemoryStorage::demo());
    tracing::info!("storage: in-memory demo contest (data will not survive restart)");

    let bind_addr = config.bind_addr;
    let base = if config.base_path.is_empty() { "/".to_string() } else { config.base_path.clone() };
    let app = build_router(storage, users, config)?;

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|source| NodeError::Bind { addr: bind_addr, source })?;
    tracing::info!("listening on {bind_addr}, API mounted at {base}");

    axum::serve(listener, app).await.map_err(NodeError::Serve)
}
