//! Node configuration, populated from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use judgeapi::ApiInfo;

use crate::error::NodeError;

/// Runtime configuration for an API node.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `JAPI_BIND` | `0.0.0.0:8080` | TCP socket address to listen on |
/// | `JAPI_BASE_PATH` | `/api` | Base route the API is mounted at |
/// | `JAPI_USERS` | (absent = everyone anonymous) | JSON user directory file |
/// | `JAPI_PRODUCT` | `DOMjudge` | Product name on the documentation page |
/// | `JAPI_PRODUCT_VERSION` | crate version | Product version on the documentation page |
/// | `JAPI_CHARSET` | `utf-8` | Character set of the documentation page |
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,

    /// Normalised base route: starts with `/`, no trailing `/`, or empty to
    /// mount at the root.
    pub base_path: String,

    /// Path to the bearer-token user directory.
    pub users_path: Option<PathBuf>,

    pub product: String,
    pub product_version: String,
    pub charset: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let info = ApiInfo::default();
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            base_path: "/api".into(),
            users_path: None,
            product: info.product,
            product_version: info.product_version,
            charset: info.charset,
        }
    }
}

impl NodeConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, NodeError> {
        let defaults = Self::default();

        let bind_addr = match std::env::var("JAPI_BIND") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| NodeError::Config(format!("JAPI_BIND must be a socket address, got {raw:?}")))?,
            Err(_) => defaults.bind_addr,
        };

        Ok(Self {
            bind_addr,
            base_path: std::env::var("JAPI_BASE_PATH")
                .map(|p| normalize_base_path(&p))
                .unwrap_or(defaults.base_path),
            users_path: std::env::var_os("JAPI_USERS").map(PathBuf::from),
            product: std::env::var("JAPI_PRODUCT").unwrap_or(defaults.product),
            product_version: std::env::var("JAPI_PRODUCT_VERSION").unwrap_or(defaults.product_version),
            charset: std::env::var("JAPI_CHARSET").unwrap_or(defaults.charset),
        })
    }

    /// Display constants for the documentation page.
    pub fn api_info(&self) -> ApiInfo {
        ApiInfo {
            product: self.product.clone(),
            product_version: self.product_version.clone(),
            charset: self.charset.clone(),
            ..ApiInfo::default()
        }
    }
}

/// `"api/"` → `"/api"`, `"/"` → `""`.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
