use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{MatchStore, SessionCache, StorageError};
use crate::model::{CreateOutcome, Player, Submission};

#[derive(Default)]
struct MemoryState {
    players: Vec<Player>,
    matches: HashSet<String>,
    submissions: HashMap<String, Submission>,
    cache: HashMap<String, String>,
}

/// Process-local store with switchable failures. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    directory_failure: Option<String>,
    write_failure: Option<String>,
    cache_failure: Option<String>,
    stalled: Arc<AtomicBool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                players,
                ..MemoryState::default()
            })),
            ..Self::default()
        }
    }

    /// Every directory lookup fails with `message`.
    #[must_use]
    pub fn failing_directory(mut self, message: impl Into<String>) -> Self {
        self.directory_failure = Some(message.into());
        self
    }

    /// Every submission fails with `message`.
    #[must_use]
    pub fn failing_writes(mut self, message: impl Into<String>) -> Self {
        self.write_failure = Some(message.into());
        self
    }

    /// Every cache write and clear fails with `message`. Reads still work.
    #[must_use]
    pub fn failing_cache(mut self, message: impl Into<String>) -> Self {
        self.cache_failure = Some(message.into());
        self
    }

    /// While set, submissions never complete. Shared by every clone of this store.
    pub fn stall_writes(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    fn check_cache(&self) -> Result<(), StorageError> {
        match &self.cache_failure {
            Some(message) => Err(StorageError::new(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        if let Some(message) = &self.directory_failure {
            return Err(StorageError::new(message.clone()));
        }
        let mut players = self.state.read().await.players.clone();
        players.sort_by(|a, b| {
            a.first_name
                .cmp(&b.first_name)
                .then_with(|| a.last_name.cmp(&b.last_name))
        });
        Ok(players)
    }

    async fn add_players(&self, players: &[Player]) -> Result<usize, StorageError> {
        let mut state = self.state.write().await;
        let mut added = 0;
        for player in players {
            if state.players.iter().all(|p| p.id != player.id) {
                state.players.push(player.clone());
                added += 1;
            }
        }
        Ok(added)
    }

    async fn create_match(&self, match_id: &str) -> Result<CreateOutcome, StorageError> {
        let mut state = self.state.write().await;
        if state.matches.insert(match_id.to_string()) {
            Ok(CreateOutcome::Created)
        } else {
            Ok(CreateOutcome::AlreadyExists)
        }
    }

    async fn append_submission(
        &self,
        match_id: &str,
        submission: &Submission,
    ) -> Result<(), StorageError> {
        if let Some(message) = &self.write_failure {
            return Err(StorageError::new(message.clone()));
        }
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let mut state = self.state.write().await;
        state.matches.insert(match_id.to_string());
        let stored = state.submissions.entry(match_id.to_string()).or_default();
        stored.stats.extend(submission.stats.iter().cloned());
        stored.fines.extend(submission.fines.iter().cloned());
        Ok(())
    }

    async fn load_submission(&self, match_id: &str) -> Result<Submission, StorageError> {
        Ok(self
            .state
            .read()
            .await
            .submissions
            .get(match_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl SessionCache for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.state.read().await.cache.get(key).cloned())
    }

    async fn set(&self, key: &str, snapshot: &str) -> Result<(), StorageError> {
        self.check_cache()?;
        self.state
            .write()
            .await
            .cache
            .insert(key.to_string(), snapshot.to_string());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.check_cache()?;
        self.state.write().await.cache.remove(key);
        Ok(())
    }
}
