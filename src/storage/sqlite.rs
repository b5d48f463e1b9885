use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::{MatchStore, SessionCache, StorageError};
use crate::model::{CreateOutcome, FineRecord, Pence, Player, PlayerStatRecord, Submission};

pub const SCHEMA: &[&str] = &[
    include_str!("../sql/schema/sqlite/00_player.sql"),
    include_str!("../sql/schema/sqlite/01_darts_match.sql"),
    include_str!("../sql/schema/sqlite/02_match_stat.sql"),
    include_str!("../sql/schema/sqlite/03_fine.sql"),
    include_str!("../sql/schema/sqlite/04_session_cache.sql"),
];

const INSERT_STAT: &str = "INSERT INTO match_stat (match_id, player_id, win, loss, score_100, \
     score_140, score_180, highest_checkout, score_26, tens, miss, dotd, is_double) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);";

const INSERT_FINE: &str = "INSERT INTO fine (match_id, player_id, description, amount_pence) \
     VALUES (?1, ?2, ?3, ?4);";

/// `rusqlite` connection shared behind a mutex. Calls run on the blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) the database file and applies the schema.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file cannot be opened or the schema fails to apply
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = if path.as_ref().as_os_str() == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        Self::from_connection(conn)
    }

    /// # Errors
    ///
    /// Will return `Err` if the schema fails to apply
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(&SCHEMA.join("\n"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs arbitrary SQL in one transaction, e.g. a startup script.
    ///
    /// # Errors
    ///
    /// Will return `Err` if any statement fails
    pub async fn execute_batch(&self, sql: &str) -> Result<(), StorageError> {
        let sql = sql.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(&sql)?;
            tx.commit()
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Connection) -> Result<T, rusqlite::Error> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StorageError::new("sqlite connection lock poisoned"))?;
            f(&mut *guard).map_err(StorageError::from)
        })
        .await
        .map_err(|e| StorageError::new(format!("sqlite task failed: {e}")))?
    }
}

fn write_submission(
    conn: &mut Connection,
    match_id: &str,
    submission: &Submission,
) -> Result<(), rusqlite::Error> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT OR IGNORE INTO darts_match (match_id) VALUES (?1);",
        params![match_id],
    )?;
    {
        let mut stmt = tx.prepare(INSERT_STAT)?;
        for stat in &submission.stats {
            stmt.execute(params![
                stat.match_id,
                stat.player_id,
                stat.win,
                stat.loss,
                stat.score_100,
                stat.score_140,
                stat.score_180,
                stat.highest_checkout,
                stat.score_26,
                stat.tens,
                stat.miss,
                stat.dotd,
                stat.is_double,
            ])?;
        }
    }
    {
        let mut stmt = tx.prepare(INSERT_FINE)?;
        for fine in &submission.fines {
            stmt.execute(params![
                match_id,
                fine.player_id,
                fine.description,
                fine.pence().0
            ])?;
        }
    }
    tx.commit()
}

fn read_submission(conn: &mut Connection, match_id: &str) -> Result<Submission, rusqlite::Error> {
    let stats = conn
        .prepare(
            "SELECT match_id, player_id, win, loss, score_100, score_140, score_180, \
             highest_checkout, score_26, tens, miss, dotd, is_double \
             FROM match_stat WHERE match_id = ?1 ORDER BY match_stat_id;",
        )?
        .query_map(params![match_id], |row| {
            Ok(PlayerStatRecord {
                match_id: row.get(0)?,
                player_id: row.get(1)?,
                win: row.get(2)?,
                loss: row.get(3)?,
                score_100: row.get(4)?,
                score_140: row.get(5)?,
                score_180: row.get(6)?,
                highest_checkout: row.get(7)?,
                score_26: row.get(8)?,
                tens: row.get(9)?,
                miss: row.get(10)?,
                dotd: row.get(11)?,
                is_double: row.get(12)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let fines = conn
        .prepare(
            "SELECT player_id, description, amount_pence FROM fine \
             WHERE match_id = ?1 ORDER BY fine_id;",
        )?
        .query_map(params![match_id], |row| {
            let player_id: String = row.get(0)?;
            let description: String = row.get(1)?;
            let pence: i64 = row.get(2)?;
            Ok(FineRecord::new(player_id, description, Pence(pence)))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Submission { stats, fines })
}

#[async_trait]
impl MatchStore for SqliteStore {
    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        self.with_conn(|conn| {
            conn.prepare(
                "SELECT id, first_name, last_name FROM player ORDER BY first_name, last_name;",
            )?
            .query_map([], |row| {
                Ok(Player {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                })
            })?
            .collect()
        })
        .await
    }

    async fn add_players(&self, players: &[Player]) -> Result<usize, StorageError> {
        let players = players.to_vec();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let mut added = 0;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO player (id, first_name, last_name) VALUES (?1, ?2, ?3);",
                )?;
                for player in &players {
                    added += stmt.execute(params![player.id, player.first_name, player.last_name])?;
                }
            }
            tx.commit()?;
            Ok(added)
        })
        .await
    }

    async fn create_match(&self, match_id: &str) -> Result<CreateOutcome, StorageError> {
        let match_id = match_id.to_string();
        self.with_conn(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO darts_match (match_id) VALUES (?1);",
                params![match_id],
            )?;
            Ok(if inserted == 0 {
                CreateOutcome::AlreadyExists
            } else {
                CreateOutcome::Created
            })
        })
        .await
    }

    async fn append_submission(
        &self,
        match_id: &str,
        submission: &Submission,
    ) -> Result<(), StorageError> {
        let match_id = match_id.to_string();
        let submission = submission.clone();
        self.with_conn(move |conn| write_submission(conn, &match_id, &submission))
            .await
    }

    async fn load_submission(&self, match_id: &str) -> Result<Submission, StorageError> {
        let match_id = match_id.to_string();
        self.with_conn(move |conn| read_submission(conn, &match_id))
            .await
    }
}

#[async_trait]
impl SessionCache for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT snapshot FROM session_cache WHERE cache_key = ?1;",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }

    async fn set(&self, key: &str, snapshot: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        let snapshot = snapshot.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO session_cache (cache_key, snapshot) VALUES (?1, ?2) \
                 ON CONFLICT(cache_key) DO UPDATE SET snapshot = excluded.snapshot, \
                 upd_ts = CURRENT_TIMESTAMP;",
                params![key, snapshot],
            )?;
            Ok(())
        })
        .await
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM session_cache WHERE cache_key = ?1;",
                params![key],
            )?;
            Ok(())
        })
        .await
    }
}
