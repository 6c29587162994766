//! JSON record store.
//!
//! Persists the game state as four independent JSON records under fixed
//! keys, written wholesale after every mutation. A fifth record backs
//! the player score table. Malformed or missing records fall back to
//! defaults with a warning; a parse failure never propagates.

use crate::types::{AccountState, HistoryEntry, PlayerScore, Position, RankingEntry};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Record key for the balance/free pair.
const KEY_BALANCE: &str = "balance";
/// Record key for the trade history list.
const KEY_HISTORY: &str = "history";
/// Record key for the local leaderboard.
const KEY_RANKING: &str = "ranking";
/// Record key for the active position (or null).
const KEY_POSITION: &str = "position";
/// Record key for the remote score table.
const KEY_PLAYERS: &str = "players";

/// Game state restored from (or about to be written to) the store.
#[derive(Debug, Clone)]
pub struct StoredState {
    pub account: AccountState,
    pub history: Vec<HistoryEntry>,
    pub ranking: Vec<RankingEntry>,
    pub active: Option<Position>,
}

/// File-backed JSON key-value store, one record per key.
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at the given directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.exists() {
            if let Err(e) = fs::create_dir_all(&data_dir) {
                warn!("Failed to create data directory: {}", e);
            }
        }
        Self { data_dir }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Write one record, swallowing failures with a warning.
    fn save<T: Serialize>(&self, key: &str, value: &T) {
        let path = self.record_path(key);
        match serde_json::to_string(value) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    warn!("Failed to write record {}: {}", key, e);
                } else {
                    debug!("Saved record {}", key);
                }
            }
            Err(e) => {
                warn!("Failed to serialize record {}: {}", key, e);
            }
        }
    }

    /// Read one record. Missing files are silent; parse failures are
    /// logged and treated as missing.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let content = fs::read_to_string(self.record_path(key)).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to parse record {}: {}", key, e);
                None
            }
        }
    }

    /// Persist the whole game state.
    pub fn save_state(&self, state: &StoredState) {
        self.save(KEY_BALANCE, &state.account);
        self.save(KEY_HISTORY, &state.history);
        self.save(KEY_RANKING, &state.ranking);
        self.save(KEY_POSITION, &state.active);
    }

    /// Restore the game state, defaulting each missing or malformed
    /// record independently.
    pub fn load_state(&self, default_balance: f64) -> StoredState {
        StoredState {
            account: self
                .load(KEY_BALANCE)
                .unwrap_or_else(|| AccountState::new(default_balance)),
            history: self.load(KEY_HISTORY).unwrap_or_default(),
            ranking: self.load(KEY_RANKING).unwrap_or_default(),
            active: self.load(KEY_POSITION).unwrap_or_default(),
        }
    }

    /// Persist the player score table.
    pub fn save_players(&self, players: &HashMap<String, PlayerScore>) {
        self.save(KEY_PLAYERS, players);
    }

    /// Restore the player score table (empty on missing/malformed).
    pub fn load_players(&self) -> HashMap<String, PlayerScore> {
        self.load(KEY_PLAYERS).unwrap_or_default()
    }

    /// Erase every record. Used by the game reset.
    pub fn wipe(&self) {
        for key in [KEY_BALANCE, KEY_HISTORY, KEY_RANKING, KEY_POSITION, KEY_PLAYERS] {
            let _ = fs::remove_file(self.record_path(key));
        }
    }
}
