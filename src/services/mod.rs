pub mod engine;
pub mod market;
pub mod notifier;
pub mod ranking;
pub mod reporter;
pub mod store;

pub use engine::{GameError, GameSession};
pub use market::MarketSimulator;
pub use notifier::{HostNotifier, NoopNotifier, TraceNotifier};
pub use ranking::{Leaderboard, PlayerTable};
pub use reporter::{HttpScoreReporter, NoopReporter, RatingFeed, ScoreReporter};
pub use store::{JsonStore, StoredState};
