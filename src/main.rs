use std::sync::{Arc, RwLock};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wisp::api::{self, AppState};
use wisp::config::Config;
use wisp::services::{
    GameSession, HttpScoreReporter, JsonStore, PlayerTable, RatingFeed, TraceNotifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wisp=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Wisp server on {}:{}", config.host, config.port);

    // Restore game state from disk
    let store = Arc::new(JsonStore::new(&config.data_dir));
    let mut session = GameSession::restore(&config, store.clone());
    session.set_notifier(Arc::new(TraceNotifier));

    // Bridge to the remote score service when configured
    let rating_feed = config.score_endpoint.as_ref().map(|endpoint| {
        info!("Score endpoint configured: {}", endpoint);
        session.set_reporter(Arc::new(HttpScoreReporter::new(endpoint)));

        let feed = RatingFeed::new(endpoint, Duration::from_millis(config.rating_poll_ms));
        feed.clone().start();
        feed
    });

    session.start();
    let session = Arc::new(RwLock::new(session));

    // Player score table backing the rating endpoints
    let players = PlayerTable::load(store);

    // Create application state
    let state = AppState {
        config: config.clone(),
        session: session.clone(),
        players,
        rating_feed,
    };

    // Drive the game: one tick per second advances prices, checks the
    // active position's triggers and re-renders
    {
        let session = session.clone();
        let tick_interval = Duration::from_millis(config.tick_interval_ms);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            loop {
                interval.tick().await;
                match session.write() {
                    Ok(mut session) => {
                        if let Some(closed) = session.tick() {
                            info!(
                                "Position auto-closed ({}): pnl {}",
                                closed.reason, closed.profit
                            );
                        }
                    }
                    Err(_) => warn!("Session lock poisoned, skipping tick"),
                }
            }
        });
    }

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Wisp server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
