//! The per-request input to [`Dispatcher::dispatch`](crate::Dispatcher::dispatch).

use std::collections::BTreeMap;

use crate::auth::{Caller, Identity};

/// Everything the dispatcher needs to know about one inbound request.
///
/// Built by the transport, consumed by a single dispatch, then dropped.
/// `method` stays a raw string so that unsupported verbs reach the
/// dispatcher and are answered with `405 Method Not Allowed`.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub method: String,
    /// Path below the fixed base route, e.g. `/problems` or `/team/7`.
    pub path_info: String,
    /// Query-string (GET) or form-body (POST, PUT) arguments.
    pub raw_params: BTreeMap<String, String>,
    pub caller: Caller,
    /// Shown on the documentation page.
    pub identity: Option<Identity>,
    /// e.g. `HTTP/1.1`; `None` when the transport cannot tell.
    pub protocol: Option<String>,
    /// URL of the base route as the caller reached it, used to build links
    /// on the documentation page. Ends with `/`.
    pub base_url: String,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path_info: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path_info: path_info.into(),
            base_url: "/".into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw_params.insert(key.into(), value.into());
        self
    }

    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.raw_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn caller(mut self, caller: Caller) -> Self {
        self.caller = caller;
        self
    }

    /// Set the identity and derive the caller's roles from it.
    pub fn identity(mut self, identity: Option<Identity>) -> Self {
        self.caller = Caller::from_identity(identity.as_ref());
        self.identity = identity;
        self
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
