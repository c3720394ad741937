//! Team functions: `GET teams` and `PUT team/<id>`.

use std::sync::Arc;

use judgeapi::{ApiError, Args, ConfigurationError, Endpoint, RegistryBuilder};

use super::{id_arg, required_arg, to_json};
use crate::storage::{ContestStorage, TeamFilter};

pub fn register(
    builder: &mut RegistryBuilder,
    storage: &Arc<dyn ContestStorage>,
) -> Result<(), ConfigurationError> {
    let store = Arc::clone(storage);
    builder.register(
        "GET",
        Endpoint::new("teams", move |args| {
            let filter = TeamFilter {
                category: id_arg(args, "category")?,
                team_id: id_arg(args, "teamid")?,
            };
            to_json(store.teams(filter)?)
        })
        .docs("Get a list of teams containing teamid, name and category.")
        .optional_arg("category", "ID of a single category to search for")
        .optional_arg("teamid", "ID of a single team to search for")
        .example([("category", "1")])
        .example([("teamid", "2")]),
    )?;

    let store = Arc::clone(storage);
    builder.register(
        "PUT",
        Endpoint::new("team", move |args| {
            let id = team_id(args)?;
            let name = required_arg(args, "name")?;
            tracing::info!(team = id, name, "renaming team");
            to_json(store.rename_team(id, name.trim())?)
        })
        .docs("Update a team. The team ID is given in the URL: team/<id>.")
        .optional_arg("name", "New name of the team")
        .require_roles(["jury"]),
    )?;

    Ok(())
}

fn team_id(args: &Args) -> Result<u32, ApiError> {
    let raw = args
        .primary_key()
        .ok_or_else(|| ApiError::BadRequest("team id missing from path".into()))?;
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("team id must be a non-negative integer, got '{raw}'")))
}
