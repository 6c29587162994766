//! Score service endpoints: score submission and the rating list.

use crate::api::AppState;
use crate::types::{PlayerScore, ScoreUpdate};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

async fn update_score(
    State(state): State<AppState>,
    Json(update): Json<ScoreUpdate>,
) -> Json<Value> {
    state
        .players
        .update_score(&update.user_id, &update.name, update.score);
    Json(json!({ "status": "ok" }))
}

async fn rating(State(state): State<AppState>) -> Json<Vec<PlayerScore>> {
    Json(state.players.rating())
}

/// Rating list mirrored from the remote score service. Empty when no
/// endpoint is configured or nothing has been fetched yet.
async fn remote_rating(State(state): State<AppState>) -> Json<Vec<PlayerScore>> {
    Json(
        state
            .rating_feed
            .as_ref()
            .map(|feed| feed.rating())
            .unwrap_or_default(),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/update_score", post(update_score))
        .route("/rating", get(rating))
        .route("/api/remote_rating", get(remote_rating))
}

#[cfg(test)]
mod tests {
    use crate::types::ScoreUpdate;

    #[test]
    fn test_score_update_parses_wire_body() {
        let update: ScoreUpdate =
            serde_json::from_str("{\"user_id\":\"7\",\"name\":\"You\",\"score\":1050.0}").unwrap();
        assert_eq!(update.user_id, "7");
        assert_eq!(update.score, 1050.0);
    }
}
