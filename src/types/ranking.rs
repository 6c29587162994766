//! Ranking Types
//!
//! Local leaderboard snapshots and the remote score wire format.

use serde::{Deserialize, Serialize};

/// Local leaderboard entry: one balance snapshot per player name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub name: String,
    pub balance: f64,
    /// Snapshot timestamp (ms since epoch)
    pub updated: i64,
}

/// Remote rating record. Field names match the score service wire
/// contract, so no rename here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub name: String,
    pub score: f64,
}

/// Body of a score submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub user_id: String,
    pub name: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_update_wire_names() {
        let update = ScoreUpdate {
            user_id: "42".to_string(),
            name: "You".to_string(),
            score: 1050.0,
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("\"user_id\":\"42\""));
        assert!(json.contains("\"score\":1050.0"));
    }

    #[test]
    fn test_ranking_entry_round_trip() {
        let entry = RankingEntry {
            name: "You".to_string(),
            balance: 1000.0,
            updated: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: RankingEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
