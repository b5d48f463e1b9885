use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::AppError;
use crate::model::CreateOutcome;
use crate::storage::MatchStore;

const MAX_MATCH_ID_LEN: usize = 64;

/// `match_<unix millis>`, the id the dashboard hands out.
#[must_use]
pub fn new_match_id(now: DateTime<Utc>) -> String {
    format!("match_{}", now.timestamp_millis())
}

/// Match ids end up in URLs and cache keys, so only ascii letters, digits, `_` and `-`.
///
/// # Errors
///
/// Will return `Err` if the id is empty, too long, or has other characters
pub fn validate_match_id(match_id: &str) -> Result<&str, AppError> {
    let match_id = match_id.trim();
    if match_id.is_empty() {
        return Err(AppError::Validation("match id is required".into()));
    }
    if match_id.len() > MAX_MATCH_ID_LEN {
        return Err(AppError::Validation(format!(
            "match id is longer than {MAX_MATCH_ID_LEN} characters"
        )));
    }
    if !match_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(format!(
            "match id '{match_id}' may only contain letters, digits, '_' and '-'"
        )));
    }
    Ok(match_id)
}

/// Creates the match record, or reports that it already exists. Calling twice is harmless.
///
/// # Errors
///
/// Will return `Err` if the id is invalid or the store fails
pub async fn create_match(
    store: &dyn MatchStore,
    requested: Option<&str>,
) -> Result<(String, CreateOutcome), AppError> {
    let match_id = match requested {
        Some(id) => validate_match_id(id)?.to_string(),
        None => new_match_id(Utc::now()),
    };
    let outcome = store.create_match(&match_id).await?;
    info!(%match_id, %outcome, "create match");
    Ok((match_id, outcome))
}
