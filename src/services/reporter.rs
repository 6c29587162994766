//! Score Reporter & Rating Feed
//!
//! Optional bridge to a remote score service. Submissions are
//! fire-and-forget; the rating feed polls on a fixed interval with no
//! retry. Neither has an error contract: failures vanish by design.

use crate::types::{PlayerScore, ScoreUpdate};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

/// Capability for submitting score snapshots to a remote service.
pub trait ScoreReporter: Send + Sync {
    fn report_score(&self, user_id: &str, name: &str, score: f64);
}

/// Default reporter: does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ScoreReporter for NoopReporter {
    fn report_score(&self, _user_id: &str, _name: &str, _score: f64) {}
}

/// Reporter that POSTs `{user_id, name, score}` to `{base}/update_score`
/// on a spawned task and drops the outcome.
pub struct HttpScoreReporter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpScoreReporter {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/update_score", base_url.trim_end_matches('/')),
        }
    }
}

impl ScoreReporter for HttpScoreReporter {
    fn report_score(&self, user_id: &str, name: &str, score: f64) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let body = ScoreUpdate {
            user_id: user_id.to_string(),
            name: name.to_string(),
            score,
        };
        tokio::spawn(async move {
            if let Err(e) = client.post(&endpoint).json(&body).send().await {
                debug!("Score submission failed: {}", e);
            }
        });
    }
}

/// Cached view of the remote rating list, refreshed by a background poll.
pub struct RatingFeed {
    client: reqwest::Client,
    endpoint: String,
    poll_interval: Duration,
    rating: RwLock<Vec<PlayerScore>>,
}

impl RatingFeed {
    pub fn new(base_url: &str, poll_interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/rating", base_url.trim_end_matches('/')),
            poll_interval,
            rating: RwLock::new(Vec::new()),
        })
    }

    /// Spawn the polling loop. A failed poll leaves the cache as-is
    /// until the next interval.
    pub fn start(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.poll_interval);
            loop {
                interval.tick().await;
                self.poll_once().await;
            }
        });
    }

    async fn poll_once(&self) {
        let response = match self.client.get(&self.endpoint).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Rating poll failed: {}", e);
                return;
            }
        };
        match response.json::<Vec<PlayerScore>>().await {
            Ok(players) => {
                if let Ok(mut cache) = self.rating.write() {
                    *cache = players;
                }
            }
            Err(e) => debug!("Rating decode failed: {}", e),
        }
    }

    /// Latest cached rating list.
    pub fn rating(&self) -> Vec<PlayerScore> {
        self.rating.read().map(|r| r.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_reporter_endpoint_normalization() {
        let reporter = HttpScoreReporter::new("http://example.test/");
        assert_eq!(reporter.endpoint, "http://example.test/update_score");
    }

    #[test]
    fn test_rating_feed_endpoint_and_empty_cache() {
        let feed = RatingFeed::new("http://example.test", Duration::from_secs(3));
        assert_eq!(feed.endpoint, "http://example.test/rating");
        assert!(feed.rating().is_empty());
    }
}
