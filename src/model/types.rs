use serde::{Deserialize, Serialize};
use std::fmt;

use super::fine::Pence;

/// Directory entry used to fill the player selects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Player {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One row of per-player, per-leg statistics handed to storage.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlayerStatRecord {
    pub match_id: String,
    pub player_id: String,
    pub win: u32,
    pub loss: u32,
    pub score_100: u32,
    pub score_140: u32,
    pub score_180: u32,
    pub highest_checkout: Option<u32>,
    pub score_26: u32,
    pub tens: String,
    pub miss: u32,
    pub dotd: u32,
    pub is_double: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FineRecord {
    pub player_id: String,
    pub description: String,
    /// Pounds, two decimal places.
    pub amount: f64,
}

impl FineRecord {
    #[must_use]
    pub fn new(player_id: impl Into<String>, description: impl Into<String>, pence: Pence) -> Self {
        Self {
            player_id: player_id.into(),
            description: description.into(),
            amount: pence.as_pounds(),
        }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pence(&self) -> Pence {
        Pence((self.amount * 100.0).round() as i64)
    }
}

/// Everything written for one match in a single submission.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Submission {
    pub stats: Vec<PlayerStatRecord>,
    pub fines: Vec<FineRecord>,
}

impl Submission {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty() && self.fines.is_empty()
    }

    #[must_use]
    pub fn total_fines(&self) -> Pence {
        self.fines.iter().map(FineRecord::pence).sum()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

impl fmt::Display for CreateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CreateOutcome::Created => "created",
            CreateOutcome::AlreadyExists => "already exists",
        };
        write!(f, "{s}")
    }
}
