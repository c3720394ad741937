//! API functions served by the node.
//!
//! Each submodule registers a logical group of endpoints on a
//! [`RegistryBuilder`](judgeapi::RegistryBuilder). Handlers are plain closures over the shared
//! [`ContestStorage`]; argument whitelisting and role checks have already
//! happened in the dispatch core by the time they run.
//!
//! | Method | Function | Roles |
//! |--------|----------|-------|
//! | GET | `info` | none |
//! | GET | `problems` | none |
//! | GET | `teams` | none |
//! | PUT | `team/<id>` | jury |
//! | POST | `clarification` | team |
//! | GET | `clarifications` | jury |

pub mod clarifications;
pub mod contest;
pub mod teams;

use std::sync::Arc;

use judgeapi::{ApiError, ApiInfo, Args, ConfigurationError, Registry};
use serde::Serialize;
use serde_json::Value;

use crate::storage::ContestStorage;

/// Register every API function and seal the registry.
pub fn build_registry(
    storage: Arc<dyn ContestStorage>,
    info: &ApiInfo,
) -> Result<Registry, ConfigurationError> {
    let mut builder = Registry::builder();
    contest::register(&mut builder, &storage, info)?;
    teams::register(&mut builder, &storage)?;
    clarifications::register(&mut builder, &storage)?;
    Ok(builder.seal())
}

/// Serialise a handler result.
pub(crate) fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(value)?)
}

/// Parse an optional numeric argument.
pub(crate) fn id_arg(args: &Args, key: &str) -> Result<Option<u32>, ApiError> {
    args.get(key)
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| ApiError::BadRequest(format!("argument '{key}' must be a non-negative integer")))
        })
        .transpose()
}

/// A non-empty argument the handler cannot do without.
pub(crate) fn required_arg<'a>(args: &'a Args, key: &str) -> Result<&'a str, ApiError> {
    args.get(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("argument '{key}' is mandatory")))
}
