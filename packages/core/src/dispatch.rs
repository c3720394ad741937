//! Request dispatch: route resolution, authorization, argument validation
//! and handler invocation.
//!
//! ```text
//! Received → Resolved → Authorized → Validated → Invoked → emitted
//!     └──────────┴───────────┴────────────┴───────────→ rejected (Error)
//! ```
//!
//! Each stage either hands its result to the next stage or returns an
//! [`ApiError`]; the first error ends the request.

use crate::auth::authorize;
use crate::context::RequestContext;
use crate::endpoint::{Args, Endpoint};
use crate::error::ApiError;
use crate::method::Method;
use crate::registry::Registry;
use crate::render::{render_docs, ApiInfo};
use crate::response::Response;

/// Resolves requests against a sealed [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    info: &'a ApiInfo,
}

/// The endpoint a request resolved to.
struct Route<'r> {
    name: &'r str,
    primary_key: Option<&'r str>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, info: &'a ApiInfo) -> Self {
        Self { registry, info }
    }

    /// Handle one request. Always yields exactly one [`Response`].
    pub fn dispatch(&self, ctx: &RequestContext) -> Response {
        match self.try_dispatch(ctx) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    method = %ctx.method,
                    path = %ctx.path_info,
                    status = e.status().code(),
                    "request rejected: {e}"
                );
                e.into()
            }
        }
    }

    fn try_dispatch(&self, ctx: &RequestContext) -> Result<Response, ApiError> {
        let path = ctx.path_info.strip_prefix('/').unwrap_or(&ctx.path_info);
        if path.is_empty() {
            return Ok(Response::Document(render_docs(
                self.registry,
                ctx.identity.as_ref(),
                &ctx.base_url,
                self.info,
            )));
        }

        let method: Method = ctx
            .method
            .parse()
            .map_err(|_| ApiError::MethodNotAllowed("only GET, POST and PUT are supported".into()))?;

        let route = parse_route(path, method)?;
        let endpoint = self
            .registry
            .lookup(route.name, method)
            .ok_or_else(|| ApiError::BadRequest(format!("function '{}' does not exist", route.name)))?;

        if !authorize(endpoint, &ctx.caller) {
            return Err(ApiError::Forbidden(format!(
                "permission denied for function '{}'",
                route.name
            )));
        }

        let args = validate_args(endpoint, ctx, route.primary_key)?;
        tracing::debug!(name = route.name, %method, args = args.len(), "invoking endpoint");
        let payload = endpoint.invoke(&args)?;
        Ok(Response::Success(payload))
    }
}

/// Split the path (leading `/` already removed) into endpoint name and, for
/// PUT, the primary key after the first `/`.
fn parse_route(path: &str, method: Method) -> Result<Route<'_>, ApiError> {
    if method != Method::Put {
        return Ok(Route {
            name: path,
            primary_key: None,
        });
    }
    match path.split_once('/') {
        Some((name, key)) if !name.is_empty() && !key.is_empty() => Ok(Route {
            name,
            primary_key: Some(key),
        }),
        _ => Err(ApiError::BadRequest(format!(
            "malformed PUT path '{path}': expected <function>/<primary key>"
        ))),
    }
}

/// Check every supplied key against the endpoint's whitelist and build the
/// argument mapping the handler sees.
///
/// The reserved primary-key slot is only accepted on PUT, where the value
/// from the path always replaces a body-supplied one.
fn validate_args(
    endpoint: &Endpoint,
    ctx: &RequestContext,
    primary_key: Option<&str>,
) -> Result<Args, ApiError> {
    let mut args = Args::new();
    for (key, value) in &ctx.raw_params {
        let reserved = key == Args::PRIMARY_KEY && primary_key.is_some();
        if !reserved && !endpoint.accepts_arg(key) {
            return Err(ApiError::BadRequest(format!(
                "invalid argument '{key}' for function '{}'",
                endpoint.name()
            )));
        }
        args.insert(key.as_str(), value.as_str());
    }
    if let Some(pk) = primary_key {
        args.insert(Args::PRIMARY_KEY, pk);
    }
    Ok(args)
}
