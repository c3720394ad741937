//! The outcome of a dispatch and its serialisation into an HTTP reply.
//!
//! A dispatch produces exactly one [`Response`]. [`emit`] turns it into an
//! [`Emitted`] value that the transport writes out verbatim; emitting is the
//! last thing that happens for a request.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Protocol used in the status line when the transport does not report one.
pub const DEFAULT_PROTOCOL: &str = "HTTP/1.0";

/// Status of an error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    BadRequest,
    Forbidden,
    MethodNotAllowed,
    InternalError,
}

impl ErrorStatus {
    pub fn code(&self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::Forbidden => 403,
            ErrorStatus::MethodNotAllowed => 405,
            ErrorStatus::InternalError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            ErrorStatus::BadRequest => "Bad Request",
            ErrorStatus::Forbidden => "Forbidden",
            ErrorStatus::MethodNotAllowed => "Method Not Allowed",
            ErrorStatus::InternalError => "Internal Server Error",
        }
    }
}

/// `"400 Bad Request"`.
impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// What a single request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The handler's return value, sent as the JSON body with status 200.
    Success(Value),
    /// A rejected or failed request, sent as `{"error": message}`.
    Error { message: String, status: ErrorStatus },
    /// The HTML documentation page served for the bare base route.
    Document(String),
}

impl Response {
    pub fn error(status: ErrorStatus, message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Response::Error { .. })
    }
}

impl From<ApiError> for Response {
    fn from(e: ApiError) -> Self {
        let status = e.status();
        match e {
            ApiError::BadRequest(message)
            | ApiError::Forbidden(message)
            | ApiError::MethodNotAllowed(message)
            | ApiError::Internal(message) => Response::Error { message, status },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// A fully serialised reply, ready for the transport to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub status: u16,
    pub reason: &'static str,
    pub protocol: String,
    pub content_type: String,
    pub body: String,
}

impl Emitted {
    /// `HTTP/1.1 403 Forbidden`.
    pub fn status_line(&self) -> String {
        format!("{} {} {}", self.protocol, self.status, self.reason)
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Serialise `response` for the wire.
///
/// `protocol` is the request's protocol version; [`DEFAULT_PROTOCOL`] is
/// used when it is unknown. `charset` only affects the documentation page's
/// content type.
pub fn emit(response: Response, protocol: Option<&str>, charset: &str) -> Emitted {
    let protocol = protocol.unwrap_or(DEFAULT_PROTOCOL).to_string();
    match response {
        Response::Success(payload) => match serde_json::to_string(&payload) {
            Ok(body) => Emitted {
                status: 200,
                reason: "OK",
                protocol,
                content_type: JSON_CONTENT_TYPE.to_string(),
                body,
            },
            Err(e) => emit_error(
                ErrorStatus::InternalError,
                &format!("failed to encode response: {e}"),
                protocol,
            ),
        },
        Response::Error { message, status } => emit_error(status, &message, protocol),
        Response::Document(html) => Emitted {
            status: 200,
            reason: "OK",
            protocol,
            content_type: format!("text/html; charset={charset}"),
            body: html,
        },
    }
}

fn emit_error(status: ErrorStatus, message: &str, protocol: String) -> Emitted {
    // A struct with one &str field always serialises.
    let body = serde_json::to_string(&ErrorBody { error: message })
        .unwrap_or_else(|_| String::from(r#"{"error":"internal error"}"#));
    Emitted {
        status: status.code(),
        reason: status.reason(),
        protocol,
        content_type: JSON_CONTENT_TYPE.to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_body_is_the_payload_encoding() {
        let payload = json!([{"id": 1, "name": "A"}]);
        let out = emit(Response::Success(payload.clone()), Some("HTTP/1.1"), "utf-8");
        assert_eq!(out.status, 200);
        assert_eq!(out.content_type, "application/json");
        assert_eq!(out.body, r#"[{"id":1,"name":"A"}]"#);
        assert_eq!(out.body, serde_json::to_string(&payload).unwrap());
        assert!(!out.is_error());
    }

    #[test]
    fn error_envelope_has_status_line_and_body() {
        let out = emit(
            Response::error(ErrorStatus::Forbidden, "permission denied for function 'x'"),
            Some("HTTP/1.1"),
            "utf-8",
        );
        assert_eq!(out.status_line(), "HTTP/1.1 403 Forbidden");
        assert_eq!(out.content_type, "application/json");
        let body: serde_json::Value = serde_json::from_str(&out.body).unwrap();
        assert_eq!(body, json!({"error": "permission denied for function 'x'"}));
    }

    #[test]
    fn unknown_protocol_defaults_to_http_1_0() {
        let out = emit(Response::error(ErrorStatus::MethodNotAllowed, "no"), None, "utf-8");
        assert_eq!(out.status_line(), "HTTP/1.0 405 Method Not Allowed");
    }

    #[test]
    fn error_message_is_json_escaped() {
        let out = emit(
            Response::error(ErrorStatus::BadRequest, "invalid argument 'a\"b'"),
            None,
            "utf-8",
        );
        assert_eq!(out.body, r#"{"error":"invalid argument 'a\"b'"}"#);
    }

    #[test]
    fn document_is_served_as_html() {
        let out = emit(Response::Document("<p>hi</p>".into()), None, "iso-8859-1");
        assert_eq!(out.status, 200);
        assert_eq!(out.content_type, "text/html; charset=iso-8859-1");
        assert_eq!(out.body, "<p>hi</p>");
    }

    #[test]
    fn status_display_matches_wire_format() {
        assert_eq!(ErrorStatus::BadRequest.to_string(), "400 Bad Request");
        assert_eq!(ErrorStatus::InternalError.to_string(), "500 Internal Server Error");
    }

    #[test]
    fn api_error_converts_to_error_response() {
        let r: Response = ApiError::Forbidden("nope".into()).into();
        assert_eq!(r, Response::error(ErrorStatus::Forbidden, "nope"));
        assert!(!r.is_success());
    }
}
