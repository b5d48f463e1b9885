use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::model::Player;
use crate::storage::MatchStore;

/// Turns the player seed file into directory entries.
///
/// format we expect is this:
/// [{ "id": <int or string>, "first_name": "First", "last_name": "Last" }, ...]
///
/// # Errors
///
/// Will return `Err` if the json is not in that format
pub fn players_from_json(json: &Value) -> Result<Vec<Player>, AppError> {
    let entries = json
        .as_array()
        .ok_or_else(|| AppError::Parse("player seed file must be a json array".into()))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let id = match entry.get("id") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    return Err(AppError::Parse(format!(
                        "player {i}: id must be a non-empty string or a number"
                    )));
                }
            };
            let first_name = entry
                .get("first_name")
                .and_then(Value::as_str)
                .ok_or_else(|| AppError::Parse(format!("player {i}: first_name is required")))?;
            let last_name = entry
                .get("last_name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Ok(Player {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            })
        })
        .collect()
}

/// Adds the seed players that the directory doesn't know yet.
///
/// # Errors
///
/// Will return `Err` if the json is malformed or the store fails
pub async fn db_prefill(json: &Value, store: &dyn MatchStore) -> Result<usize, AppError> {
    let players = players_from_json(json)?;
    let added = store.add_players(&players).await?;
    info!(seeded = players.len(), added, "player directory prefill");
    Ok(added)
}
