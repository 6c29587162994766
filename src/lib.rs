//! Wisp - Simulated leveraged-trading game server
//!
//! A single-player trading game over synthetic price feeds: a bounded
//! random walk per instrument, one leveraged position at a time with
//! take-profit and liquidation triggers, a local leaderboard, and
//! wholesale JSON persistence. An HTTP API projects the game state and
//! hosts the score/rating endpoints.

pub mod api;
pub mod config;
pub mod error;
pub mod render;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use render::{GameSnapshot, StateObserver};
pub use services::{GameError, GameSession, JsonStore, MarketSimulator};
pub use types::*;
