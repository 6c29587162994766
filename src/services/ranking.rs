//! Ranking Service
//!
//! Two rankings live here: the local leaderboard (balance snapshots,
//! upsert-by-name) and the player score table backing the score
//! endpoints (upsert-by-user-id, last write wins).

use crate::config::RANKING_CAP;
use crate::services::JsonStore;
use crate::types::{PlayerScore, RankingEntry};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Local leaderboard: at most one entry per name, sorted descending by
/// balance, capped at [`RANKING_CAP`].
#[derive(Debug, Default, Clone)]
pub struct Leaderboard {
    entries: Vec<RankingEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from persisted entries; re-sorts and re-caps in case the
    /// stored record was tampered with.
    pub fn from_entries(entries: Vec<RankingEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    /// Insert or overwrite the snapshot for a name.
    pub fn upsert(&mut self, name: &str, balance: f64) {
        let entry = RankingEntry {
            name: name.to_string(),
            balance,
            updated: chrono::Utc::now().timestamp_millis(),
        };
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        self.entries
            .sort_by(|a, b| b.balance.partial_cmp(&a.balance).unwrap_or(std::cmp::Ordering::Equal));
        self.entries.truncate(RANKING_CAP);
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Persistent player score table for the score endpoints.
pub struct PlayerTable {
    players: DashMap<String, PlayerScore>,
    store: Arc<JsonStore>,
}

impl PlayerTable {
    /// Load the table from the store (empty on missing/malformed record).
    pub fn load(store: Arc<JsonStore>) -> Arc<Self> {
        let players = DashMap::new();
        for (user_id, score) in store.load_players() {
            players.insert(user_id, score);
        }
        Arc::new(Self { players, store })
    }

    /// Upsert a player's score by user id (last write wins) and persist.
    pub fn update_score(&self, user_id: &str, name: &str, score: f64) {
        debug!("Score update for {} ({}): {}", name, user_id, score);
        self.players.insert(
            user_id.to_string(),
            PlayerScore {
                name: name.to_string(),
                score,
            },
        );
        self.store.save_players(
            &self
                .players
                .iter()
                .map(|r| (r.key().clone(), r.value().clone()))
                .collect(),
        );
    }

    /// All players, sorted descending by score.
    pub fn rating(&self) -> Vec<PlayerScore> {
        let mut players: Vec<PlayerScore> =
            self.players.iter().map(|r| r.value().clone()).collect();
        players.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_upsert_replaces_by_name() {
        let mut board = Leaderboard::new();
        board.upsert("You", 1000.0);
        board.upsert("You", 1200.0);

        assert_eq!(board.len(), 1);
        assert_eq!(board.entries()[0].balance, 1200.0);
    }

    #[test]
    fn test_sorted_descending_by_balance() {
        let mut board = Leaderboard::new();
        board.upsert("a", 100.0);
        board.upsert("b", 300.0);
        board.upsert("c", 200.0);

        let balances: Vec<f64> = board.entries().iter().map(|e| e.balance).collect();
        assert_eq!(balances, vec![300.0, 200.0, 100.0]);
    }

    #[test]
    fn test_capped_at_fifty() {
        let mut board = Leaderboard::new();
        for i in 0..60 {
            board.upsert(&format!("player-{}", i), i as f64);
        }

        assert_eq!(board.len(), RANKING_CAP);
        // The lowest ten snapshots were dropped
        assert!(board.entries().iter().all(|e| e.balance >= 10.0));
    }

    #[test]
    fn test_from_entries_normalizes() {
        let entries = vec![
            RankingEntry {
                name: "low".to_string(),
                balance: 1.0,
                updated: 0,
            },
            RankingEntry {
                name: "high".to_string(),
                balance: 2.0,
                updated: 0,
            },
        ];
        let board = Leaderboard::from_entries(entries);
        assert_eq!(board.entries()[0].name, "high");
    }

    fn test_store(name: &str) -> Arc<JsonStore> {
        let dir = PathBuf::from(format!(".test_ranking_{}", name));
        let _ = fs::remove_dir_all(&dir);
        Arc::new(JsonStore::new(&dir))
    }

    #[test]
    fn test_player_table_rating_sorted() {
        let store = test_store("rating");
        let table = PlayerTable::load(store.clone());

        table.update_score("1", "alice", 500.0);
        table.update_score("2", "bob", 900.0);
        table.update_score("1", "alice", 700.0);

        let rating = table.rating();
        assert_eq!(rating.len(), 2);
        assert_eq!(rating[0].name, "bob");
        assert_eq!(rating[1].score, 700.0);

        let _ = fs::remove_dir_all(".test_ranking_rating");
    }

    #[test]
    fn test_player_table_persists_across_load() {
        let store = test_store("persist");
        {
            let table = PlayerTable::load(store.clone());
            table.update_score("7", "carol", 123.0);
        }
        let reloaded = PlayerTable::load(store);
        assert_eq!(reloaded.rating()[0].name, "carol");

        let _ = fs::remove_dir_all(".test_ranking_persist");
    }
}
