//! Conversion between HTTP and the dispatch core's request/response values.
//!
//! Inbound: path below the base route, argument decoding and protocol name.
//! Outbound: [`Reply`] writes an [`Emitted`] value as an axum response. It is
//! the only place a reply leaves the process.

use std::collections::BTreeMap;

use axum::{
    http::{header, HeaderValue, StatusCode, Version},
    response::{IntoResponse, Response},
};
use judgeapi::{Emitted, JSON_CONTENT_TYPE};

/// The path below `base` (normalised, no trailing `/`), percent-decoded.
///
/// `"/api/team/7"` under `"/api"` → `"/team/7"`; `"/api"` → `""`.
pub fn path_info(path: &str, base: &str) -> String {
    let rest = path.strip_prefix(base).unwrap_or(path);
    match urlencoding::decode(rest) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => rest.to_string(),
    }
}

/// Decode `application/x-www-form-urlencoded` data (a query string or a
/// request body). A key given more than once keeps its last value.
pub fn parse_params(raw: &[u8]) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(raw)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Protocol name for the status line, e.g. `HTTP/1.1`.
pub fn protocol_name(version: Version) -> Option<&'static str> {
    match version {
        Version::HTTP_09 => Some("HTTP/0.9"),
        Version::HTTP_10 => Some("HTTP/1.0"),
        Version::HTTP_11 => Some("HTTP/1.1"),
        Version::HTTP_2 => Some("HTTP/2.0"),
        Version::HTTP_3 => Some("HTTP/3.0"),
        _ => None,
    }
}

/// An emitted reply on its way out.
#[derive(Debug)]
pub struct Reply(pub Emitted);

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let Emitted {
            status,
            content_type,
            body,
            ..
        } = self.0;
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = HeaderValue::from_str(&content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(JSON_CONTENT_TYPE));
        (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
