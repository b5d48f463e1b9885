pub mod fine;
pub mod leg;
pub mod types;

pub use fine::*;
pub use leg::*;
pub use types::*;

/// Session cache key for a match.
#[must_use]
pub fn session_key(match_id: &str) -> String {
    format!("match_{match_id}")
}
