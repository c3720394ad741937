//! Shared helpers for the judge API conformance test suite.
//!
//! Provides [`spawn_node`], a function that binds a `TcpListener` on an
//! ephemeral port, wires up an in-process node backed by the demo
//! `MemoryStorage` and a fixed user directory, and returns the URL of the
//! API base route.

use std::sync::Arc;

use judgeapi::Identity;
use judgeapi_node::{build_router, ContestStorage, MemoryStorage, NodeConfig, UserDirectory};

/// Bearer token of a user holding the `admin` role.
pub const ADMIN_TOKEN: &str = "conformance-admin";
/// Bearer token of a user holding the `jury` role.
pub const JURY_TOKEN: &str = "conformance-jury";
/// Bearer token of a user holding the `team` role, member of team 1.
pub const TEAM_TOKEN: &str = "conformance-team";

/// The user directory every conformance node is started with.
pub fn conformance_users() -> UserDirectory {
    let mut users = UserDirectory::new();
    let user = |name: &str, role: &str, team: Option<&str>| Identity {
        username: Some(name.into()),
        roles: vec![role.into()],
        team_id: team.map(Into::into),
    };
    users.insert(ADMIN_TOKEN, user("admin", "admin", None));
    users.insert(JURY_TOKEN, user("jury1", "jury", None));
    users.insert(TEAM_TOKEN, user("team01", "team", Some("1")));
    users
}

/// Start an ephemeral in-process node and return the API base URL, e.g.
/// `http://127.0.0.1:51234/api`.
///
/// The node runs in a background `tokio` task bound to an OS-assigned port
/// on `127.0.0.1`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the node fails to start.
pub async fn spawn_node() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    let config = NodeConfig {
        bind_addr: addr,
        base_path: "/api".into(),
        product_version: "conformance".into(),
        ..NodeConfig::default()
    };
    let storage: Arc<dyn ContestStorage> = Arc::new(MemoryStorage::demo());
    let router = build_router(storage, conformance_users(), config).expect("build router");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance node error");
    });

    format!("http://{addr}/api")
}
