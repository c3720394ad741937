//! Clarification requests: teams ask, the jury reads.

use std::sync::Arc;

use judgeapi::{ApiError, ConfigurationError, Endpoint, RegistryBuilder};

use super::{id_arg, required_arg, to_json};
use crate::storage::ContestStorage;

pub fn register(
    builder: &mut RegistryBuilder,
    storage: &Arc<dyn ContestStorage>,
) -> Result<(), ConfigurationError> {
    let store = Arc::clone(storage);
    builder.register(
        "POST",
        Endpoint::new("clarification", move |args| {
            let team = id_arg(args, "teamid")?
                .ok_or_else(|| ApiError::BadRequest("argument 'teamid' is mandatory".into()))?;
            let text = required_arg(args, "text")?;
            let clar = store.add_clarification(team, id_arg(args, "problem")?, text)?;
            tracing::info!(id = clar.id, team, "clarification request received");
            to_json(clar)
        })
        .docs("Submit a clarification request. Returns the stored request with its ID.")
        .optional_arg("teamid", "ID of the team asking")
        .optional_arg("problem", "ID of the problem the question is about (omit for general questions)")
        .optional_arg("text", "The question")
        .require_roles(["team"]),
    )?;

    let store = Arc::clone(storage);
    builder.register(
        "GET",
        Endpoint::new("clarifications", move |_| to_json(store.clarifications()?))
            .docs("Get all clarification requests, oldest first.")
            .require_roles(["jury"]),
    )?;

    Ok(())
}
