use crate::types::Instrument;
use std::env;

/// Starting balance for a fresh account.
pub const DEFAULT_BALANCE: f64 = 1000.0;

/// Fixed capacity of every instrument's price series.
pub const PRICE_HISTORY_LEN: usize = 100;

/// Maximum retained trade-history entries (oldest dropped).
pub const HISTORY_CAP: usize = 200;

/// Maximum leaderboard size.
pub const RANKING_CAP: usize = 50;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Directory the game state records are persisted under.
    pub data_dir: String,
    /// Starting balance for fresh accounts.
    pub default_balance: f64,
    /// Game tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Display name used for the local leaderboard entry.
    pub player_name: String,
    /// User id attached to remote score submissions.
    pub player_id: String,
    /// Base URL of a remote score service (optional). When set, closed
    /// trades POST to {url}/update_score and the rating feed polls
    /// {url}/rating.
    pub score_endpoint: Option<String>,
    /// Rating poll interval in milliseconds.
    pub rating_poll_ms: u64,
    /// Instruments available to trade.
    pub instruments: Vec<Instrument>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        // Parse instruments from INSTRUMENTS env var
        // Format: "symbol|base_price|volatility,symbol2|base_price2|volatility2"
        let instruments = env::var("INSTRUMENTS")
            .ok()
            .map(|s| {
                s.split(',')
                    .filter_map(|inst| {
                        let parts: Vec<&str> = inst.split('|').collect();
                        if parts.len() >= 3 {
                            let base_price = parts[1].parse().ok()?;
                            let volatility = parts[2].parse().ok()?;
                            Some(Instrument::new(parts[0], base_price, volatility))
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|v: &Vec<Instrument>| !v.is_empty())
            .unwrap_or_else(default_instruments);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| ".wisp_data".to_string()),
            default_balance: env::var("DEFAULT_BALANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BALANCE),
            tick_interval_ms: env::var("TICK_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            player_name: env::var("PLAYER_NAME").unwrap_or_else(|_| "You".to_string()),
            player_id: env::var("PLAYER_ID").unwrap_or_else(|_| "local".to_string()),
            score_endpoint: env::var("SCORE_ENDPOINT").ok().filter(|s| !s.is_empty()),
            rating_poll_ms: env::var("RATING_POLL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            instruments,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: ".wisp_data".to_string(),
            default_balance: DEFAULT_BALANCE,
            tick_interval_ms: 1000,
            player_name: "You".to_string(),
            player_id: "local".to_string(),
            score_endpoint: None,
            rating_poll_ms: 3000,
            instruments: default_instruments(),
        }
    }
}

/// The stock instrument set.
pub fn default_instruments() -> Vec<Instrument> {
    vec![
        Instrument::new("BTC", 0.023, 0.002),
        Instrument::new("ETH", 0.0065, 0.003),
        Instrument::new("XRP", 0.0008, 0.004),
    ]
}
