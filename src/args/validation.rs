use serde_json::Value;
use std::{fs, path::PathBuf};

use crate::controller::db_prefill::players_from_json;

/// # Errors
///
/// Will return `Err` if the file is not readable
pub fn check_readable_file(file: &str) -> Result<String, String> {
    // split by semi-colon
    let files = file.split(';').map(str::trim).filter(|f| !f.is_empty());
    for file in files {
        let path = PathBuf::from(file);
        if !path.is_file() || fs::metadata(&path).is_err() {
            return Err(format!("The sql startup script '{file}' is not readable."));
        }
    }
    Ok(file.to_string())
}

/// # Errors
///
/// Will return `Err` if the file is not readable, is not valid json, or isn't a player list
pub fn check_readable_file_and_json(file: &str) -> Result<Value, String> {
    let path = PathBuf::from(file);
    if !path.is_file() {
        return Err(format!("The json file '{file}' is not readable."));
    }
    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("The json file '{file}' is not readable: {e}"))?;
    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("The json file '{file}' is not valid json: {e}"))?;
    validate_json_format(&json)?;
    Ok(json)
}

/// format we expect is this:
/// [{ "id": <int or string>, "first_name": "First", "last_name": "Last" }, ...]
///
/// # Errors
///
/// Will return `Err` if the json is not in the correct format
fn validate_json_format(json: &Value) -> Result<(), String> {
    players_from_json(json)
        .map(|_| ())
        .map_err(|e| format!("The json file is not in the correct format. {e}"))
}
