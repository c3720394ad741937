//! Error types for registration and dispatch.
//!
//! [`ConfigurationError`] can only happen while the registry is being built,
//! before the first request is served. [`ApiError`] is the runtime error a
//! dispatch (or a handler) produces; every variant maps to one
//! [`ErrorStatus`] and ends up in the `{"error": ...}` envelope.

use thiserror::Error;

use crate::method::Method;
use crate::response::ErrorStatus;

/// Invalid or duplicate endpoint registration.
///
/// Fatal to server initialisation; never reachable while serving.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("only GET, POST and PUT methods are supported, got {0:?}")]
    UnsupportedMethod(String),

    #[error("multiple definitions of {name} for {method}")]
    DuplicateEndpoint { name: String, method: Method },

    #[error("endpoint name must not be empty")]
    EmptyName,
}

/// A runtime failure surfaced to the caller as a JSON error envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error is emitted with.
    pub fn status(&self) -> ErrorStatus {
        match self {
            ApiError::BadRequest(_) => ErrorStatus::BadRequest,
            ApiError::Forbidden(_) => ErrorStatus::Forbidden,
            ApiError::MethodNotAllowed(_) => ErrorStatus::MethodNotAllowed,
            ApiError::Internal(_) => ErrorStatus::InternalError,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m)
            | ApiError::Forbidden(m)
            | ApiError::MethodNotAllowed(m)
            | ApiError::Internal(m) => m,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(format!("failed to encode response: {e}"))
    }
}
