//! Caller identity: bearer tokens resolved against a user directory.
//!
//! The directory is a JSON file listing one entry per API user:
//!
//! ```json
//! [
//!   { "token": "s3cret", "username": "admin", "roles": ["admin"] },
//!   { "token": "t0k3n", "username": "team01", "roles": ["team"], "team_id": "1" }
//! ]
//! ```
//!
//! A request without an `Authorization: Bearer` header, or with a token the
//! directory does not know, is anonymous. Anonymous callers still reach every
//! endpoint that requires no roles.

use std::collections::HashMap;
use std::path::Path;

use axum::http::{header, HeaderMap};
use judgeapi::Identity;
use serde::Deserialize;

use crate::error::NodeError;

#[derive(Debug, Deserialize)]
struct UserEntry {
    token: String,
    #[serde(flatten)]
    identity: Identity,
}

/// Token → identity lookup table, read-only after startup.
#[derive(Debug, Default)]
pub struct UserDirectory {
    by_token: HashMap<String, Identity>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the directory from a JSON file.
    pub fn load(path: &Path) -> Result<Self, NodeError> {
        let raw = std::fs::read_to_string(path).map_err(|source| NodeError::UsersIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| NodeError::UsersFormat {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<UserEntry> = serde_json::from_str(raw)?;
        let mut dir = Self::new();
        for e in entries {
            dir.insert(e.token, e.identity);
        }
        Ok(dir)
    }

    pub fn insert(&mut self, token: impl Into<String>, identity: Identity) {
        self.by_token.insert(token.into(), identity);
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }

    /// Identity of the caller presenting `headers`, if any.
    pub fn resolve(&self, headers: &HeaderMap) -> Option<Identity> {
        let token = bearer_token(headers)?;
        let identity = self.by_token.get(token);
        if identity.is_none() {
            tracing::debug!("unknown bearer token, treating caller as anonymous");
        }
        identity.cloned()
    }
}

/// The token of an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use axum::http::HeaderValue;

    const USERS: &str = r#"[
        { "token": "adm", "username": "admin", "roles": ["admin"] },
        { "token": "t1", "username": "team01", "roles": ["team"], "team_id": "1" }
    ]"#;

    fn with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn resolves_known_token() {
        let dir = UserDirectory::from_json(USERS).unwrap();
        let id = dir.resolve(&with_auth("Bearer t1")).unwrap();
        assert_eq!(id.username.as_deref(), Some("team01"));
        assert_eq!(id.roles, vec!["team".to_string()]);
        assert_eq!(id.team_id.as_deref(), Some("1"));
    }

    #[test]
    fn unknown_or_missing_token_is_anonymous() {
        let dir = UserDirectory::from_json(USERS).unwrap();
        assert!(dir.resolve(&with_auth("Bearer nope")).is_none());
        assert!(dir.resolve(&HeaderMap::new()).is_none());
    }

    #[test]
    fn basic_auth_scheme_is_ignored() {
        let dir = UserDirectory::from_json(USERS).unwrap();
        assert!(dir.resolve(&with_auth("Basic adm")).is_none());
        assert_eq!(bearer_token(&with_auth("Bearer ")), None);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(USERS.as_bytes()).unwrap();
        let dir = UserDirectory::load(file.path()).unwrap();
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn load_reports_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        let err = UserDirectory::load(file.path()).unwrap_err();
        assert!(matches!(err, NodeError::UsersFormat { .. }));
    }
}
