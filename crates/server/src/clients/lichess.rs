use std::time::Duration;

use chess_core::{NdjsonDecoder, RawGame, TimeWindow};
use futures::StreamExt;
use reqwest::{Client, StatusCode};

use crate::config::{Config, MAX_GAMES_CAP};

#[derive(Debug, thiserror::Error)]
pub enum LichessError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Lichess returned HTTP {0}")]
    Status(StatusCode),
}

#[derive(Clone)]
pub struct LichessClient {
    client: Client,
    base_url: String,
    max_games: u32,
}

impl LichessClient {
    pub fn new(config: &Config) -> Result<Self, LichessError> {
        let client = Client::builder()
            .user_agent("LichessDailyChart/1.0")
            .timeout(Duration::from_secs(config.lichess_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.lichess_base_url.clone(),
            max_games: config.max_games.min(MAX_GAMES_CAP),
        })
    }

    /// Fetch the games `username` started inside `window`, in the order Lichess
    /// streams them. Lines that fail to decode are skipped.
    pub async fn fetch_games(
        &self,
        username: &str,
        window: TimeWindow,
    ) -> Result<Vec<RawGame>, LichessError> {
        let url = format!("{}/api/games/user/{}", self.base_url, username);

        let params = [
            ("since", window.since_ms.to_string()),
            ("until", window.until_ms.to_string()),
            ("max", self.max_games.to_string()),
        ];

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .header("Accept", "application/x-ndjson")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LichessError::Status(resp.status()));
        }

        let mut decoder = NdjsonDecoder::new();
        let mut games = Vec::new();
        let mut body = resp.bytes_stream();
        while let Some(chunk) = body.next().await {
            games.extend(decoder.feed(&chunk?));
        }
        games.extend(decoder.finish());

        tracing::debug!(username, count = games.len(), "Fetched Lichess games");
        Ok(games)
    }
}
