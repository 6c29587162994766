pub mod game;
pub mod health;
pub mod rating;

use crate::config::Config;
use crate::services::{GameSession, PlayerTable, RatingFeed};
use axum::Router;
use std::sync::{Arc, RwLock};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<RwLock<GameSession>>,
    pub players: Arc<PlayerTable>,
    /// Cached remote rating, present when a score endpoint is configured.
    pub rating_feed: Option<Arc<RatingFeed>>,
}

/// Combined API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(game::router())
        .merge(rating::router())
}
