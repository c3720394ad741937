//! Registration and dispatch core of the judge REST API.
//!
//! This crate maps an incoming `(method, path)` pair to a registered
//! handler, enforces role-based access, whitelists the caller's arguments,
//! invokes the handler and serialises the result (or an error) as JSON. It
//! does no I/O: the transport builds a [`RequestContext`], calls
//! [`Dispatcher::dispatch`], and writes out the [`Emitted`] reply returned by
//! [`emit`].
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`registry`] | [`RegistryBuilder`] and the sealed, read-only [`Registry`] |
//! | [`endpoint`] | [`Endpoint`] metadata, the [`Handler`] contract, validated [`Args`] |
//! | [`auth`] | [`authorize`], the [`Caller`] role set and display-only [`Identity`] |
//! | [`dispatch`] | [`Dispatcher`]: resolve, authorize, validate, invoke |
//! | [`response`] | [`Response`] values and [`emit`] |
//! | [`render`] | HTML documentation page for the bare base route |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use judgeapi::{emit, ApiInfo, Dispatcher, Endpoint, Registry, RequestContext};
//! use serde_json::json;
//!
//! let mut builder = Registry::builder();
//! builder.register(
//!     "GET",
//!     Endpoint::new("problems", |args| Ok(json!([{"id": 1, "cid": args.get("cid")}])))
//!         .optional_arg("cid", "contest id"),
//! )?;
//! let registry = builder.seal();
//! let info = ApiInfo::default();
//!
//! let ctx = RequestContext::new("GET", "/problems").param("cid", "3");
//! let reply = emit(Dispatcher::new(&registry, &info).dispatch(&ctx), None, &info.charset);
//! assert_eq!(reply.status, 200);
//! ```

pub mod auth;
pub mod context;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod method;
pub mod registry;
pub mod render;
pub mod response;

pub use auth::{authorize, Caller, Identity, RoleCheck, ADMIN_ROLE};
pub use context::RequestContext;
pub use dispatch::Dispatcher;
pub use endpoint::{Args, Endpoint, Handler};
pub use error::{ApiError, ConfigurationError};
pub use method::Method;
pub use registry::{Registry, RegistryBuilder};
pub use render::{render_docs, ApiInfo, API_VERSION};
pub use response::{emit, Emitted, ErrorStatus, Response, DEFAULT_PROTOCOL, JSON_CONTENT_TYPE};
