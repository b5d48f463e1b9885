use async_trait::async_trait;
use thiserror::Error;

use crate::model::{CreateOutcome, Player, Submission};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    Message(String),
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for StorageError {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

/// Player directory, matches and submitted records.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn list_players(&self) -> Result<Vec<Player>, StorageError>;
    /// Inserts players whose id is not yet known. Returns how many were new.
    async fn add_players(&self, players: &[Player]) -> Result<usize, StorageError>;
    async fn create_match(&self, match_id: &str) -> Result<CreateOutcome, StorageError>;
    /// Writes stats and fines together. Either both land or neither does.
    async fn append_submission(
        &self,
        match_id: &str,
        submission: &Submission,
    ) -> Result<(), StorageError>;
    async fn load_submission(&self, match_id: &str) -> Result<Submission, StorageError>;
}

/// Durable per-session snapshots, keyed by `match_<id>`.
#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, snapshot: &str) -> Result<(), StorageError>;
    async fn clear(&self, key: &str) -> Result<(), StorageError>;
}
