//! Assembles the Axum [`Router`] that mounts the dispatch core at the base route.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri, Version},
    routing::any,
    Router,
};
use judgeapi::{emit, ApiInfo, Caller, Dispatcher, Registry, RequestContext};
use tower_http::trace::TraceLayer;

use crate::{
    config::NodeConfig,
    error::NodeError,
    handlers::build_registry,
    identity::UserDirectory,
    storage::ContestStorage,
    transport::{self, Reply},
};

/// Shared application state threaded through the entry handler.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub users: Arc<UserDirectory>,
    pub info: Arc<ApiInfo>,
    pub config: NodeConfig,
}

/// Build the complete application router.
///
/// Registers every API function against `storage` and seals the registry
/// before the router is returned, so no request can observe a partially
/// built registry.
pub fn build_router(
    storage: Arc<dyn ContestStorage>,
    users: UserDirectory,
    config: NodeConfig,
) -> Result<Router, NodeError> {
    let info = config.api_info();
    let registry = build_registry(storage, &info)?;
    tracing::info!("registered {} API functions", registry.len());

    let state = AppState {
        registry: Arc::new(registry),
        users: Arc::new(users),
        info: Arc::new(info),
        config,
    };
    Ok(router_with_state(state))
}

/// Mount the entry handler on `<base>`, `<base>/` and everything below it.
pub fn router_with_state(state: AppState) -> Router {
    let base = state.config.base_path.clone();
    let mut router = Router::new();
    if base.is_empty() {
        router = router.route("/", any(api_entry));
    } else {
        router = router
            .route(&base, any(api_entry))
            .route(&format!("{base}/"), any(api_entry));
    }
    router
        .route(&format!("{base}/{{*path}}"), any(api_entry))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// The single transport entry point: build a [`RequestContext`], dispatch,
/// and write the emitted reply.
async fn api_entry(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    let base = &state.config.base_path;

    // GET arguments come from the query string, POST and PUT arguments from
    // the form-encoded body. Other verbs are rejected by the dispatcher.
    let raw_params = if method == Method::GET {
        transport::parse_params(uri.query().unwrap_or_default().as_bytes())
    } else if method == Method::POST || method == Method::PUT {
        transport::parse_params(&body)
    } else {
        Default::default()
    };

    let identity = state.users.resolve(&headers);
    let ctx = RequestContext {
        method: method.as_str().to_string(),
        path_info: transport::path_info(uri.path(), base),
        raw_params,
        caller: Caller::from_identity(identity.as_ref()),
        identity,
        protocol: transport::protocol_name(version).map(Into::into),
        base_url: format!("{base}/"),
    };

    let response = Dispatcher::new(&state.registry, &state.info).dispatch(&ctx);
    let emitted = emit(response, ctx.protocol.as_deref(), &state.info.charset);
    tracing::debug!(status = emitted.status, path = %ctx.path_info, "emitted reply");
    Reply(emitted)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use judgeapi::Identity;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::storage::memory::MemoryStorage;

    fn build_app() -> Router {
        let mut users = UserDirectory::new();
        users.insert(
            "jury-token",
            Identity {
                username: Some("jury1".into()),
                roles: vec!["jury".into()],
                team_id: None,
            },
        );
        users.insert(
            "team-token",
            Identity {
                username: Some("team01".into()),
                roles: vec!["team".into()],
                team_id: Some("1".into()),
            },
        );
        users.insert(
            "admin-token",
            Identity {
                username: Some("admin".into()),
                roles: vec!["admin".into()],
                team_id: None,
            },
        );
        let storage: Arc<dyn ContestStorage> = Arc::new(MemoryStorage::demo());
        build_router(storage, users, NodeConfig::default()).unwrap()
    }

    async fn send(req: Request<Body>) -> (StatusCode, String, String) {
        let resp = build_app().oneshot(req).await.unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    fn form(method: &str, uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
        let mut b = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(t) = token {
            b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        b.body(Body::from(body.to_string())).unwrap()
    }

    fn error_of(body: &str) -> String {
        let v: Value = serde_json::from_str(body).unwrap();
        v["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn get_problems_returns_json() {
        let (status, ct, body) = send(get("/api/problems?cid=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct, "application/json");
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v[0]["shortname"], json!("boolfind"));
        assert_eq!(v.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn base_route_serves_documentation() {
        for uri in ["/api", "/api/"] {
            let (status, ct, body) = send(get(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(ct, "text/html; charset=utf-8");
            assert!(body.contains("<a href=\"/api/problems\">/api/problems</a> (GET)"));
            assert!(body.contains("You are: anonymous user"));
        }
    }

    #[tokio::test]
    async fn documentation_shows_authenticated_caller() {
        let req = Request::builder()
            .uri("/api/")
            .header(header::AUTHORIZATION, "Bearer team-token")
            .body(Body::empty())
            .unwrap();
        let (_, _, body) = send(req).await;
        assert!(body.contains("You are: team01 with roles team, team(1)"));
    }

    #[tokio::test]
    async fn unknown_function_is_400() {
        let (status, ct, body) = send(get("/api/nosuch")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(ct, "application/json");
        assert_eq!(error_of(&body), "function 'nosuch' does not exist");
    }

    #[tokio::test]
    async fn delete_is_405() {
        let req = Request::builder()
            .method("DELETE")
            .uri("/api/problems")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn undeclared_query_argument_is_400() {
        let (status, _, body) = send(get("/api/problems?probid=1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_of(&body).contains("invalid argument 'probid'"));
    }

    #[tokio::test]
    async fn put_team_requires_jury() {
        let (status, _, body) = send(form("PUT", "/api/team/1", "name=Foo", Some("team-token"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error_of(&body), "permission denied for function 'team'");

        let (status, _, _) = send(form("PUT", "/api/team/1", "name=Foo", None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn put_team_as_jury_renames() {
        let (status, _, body) = send(form("PUT", "/api/team/1", "name=Foo", Some("jury-token"))).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["id"], json!(1));
        assert_eq!(v["name"], json!("Foo"));
    }

    #[tokio::test]
    async fn admin_bypasses_role_requirement() {
        let (status, _, _) = send(form("PUT", "/api/team/2", "name=Bar", Some("admin-token"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn put_without_primary_key_is_400() {
        let (status, _, body) = send(form("PUT", "/api/team", "name=Foo", Some("jury-token"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_of(&body).contains("malformed PUT path"));
    }

    #[tokio::test]
    async fn post_reads_form_body() {
        let (status, _, body) = send(form(
            "POST",
            "/api/clarification",
            "teamid=1&problem=2&text=Is+the+input+sorted%3F",
            Some("team-token"),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["text"], json!("Is the input sorted?"));
        assert_eq!(v["problem"], json!(2));
    }

    #[tokio::test]
    async fn post_ignores_query_string_arguments() {
        let (status, _, body) = send(form(
            "POST",
            "/api/clarification?teamid=1&text=hi",
            "",
            Some("team-token"),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&body), "argument 'teamid' is mandatory");
    }

    #[tokio::test]
    async fn handler_errors_use_envelope() {
        let (status, _, body) = send(get("/api/problems?cid=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_of(&body).contains("'cid'"));
    }

    #[tokio::test]
    async fn routes_outside_base_are_not_served() {
        let resp = build_app().oneshot(get("/problems")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
