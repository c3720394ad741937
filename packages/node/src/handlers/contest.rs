//! Contest-level functions: `GET info` and `GET problems`.

use std::sync::Arc;

use judgeapi::{ApiInfo, ConfigurationError, Endpoint, RegistryBuilder};
use serde_json::json;

use super::{id_arg, to_json};
use crate::storage::ContestStorage;

pub fn register(
    builder: &mut RegistryBuilder,
    storage: &Arc<dyn ContestStorage>,
    info: &ApiInfo,
) -> Result<(), ConfigurationError> {
    let api_version = info.api_version;
    let product_version = info.product_version.clone();
    builder.register(
        "GET",
        Endpoint::new("info", move |_| {
            Ok(json!({
                "api_version": api_version,
                "product_version": product_version,
            }))
        })
        .docs("Get general API information."),
    )?;

    let store = Arc::clone(storage);
    builder.register(
        "GET",
        Endpoint::new("problems", move |args| {
            let cid = match id_arg(args, "cid")? {
                Some(cid) => cid,
                None => store.active_contest()?.id,
            };
            to_json(store.problems(cid)?)
        })
        .docs("Get a list of problems in a contest, ordered by short name.")
        .optional_arg("cid", "ID of the contest to get the problems for (default: the active contest)")
        .example([("cid", "2")]),
    )?;

    Ok(())
}
