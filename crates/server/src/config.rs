use std::env;

/// Lichess never returns more than this per request for our use.
pub const MAX_GAMES_CAP: u32 = 500;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub lichess_base_url: String,
    pub lichess_timeout_secs: u64,
    pub max_games: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            lichess_base_url: "https://lichess.org".to_string(),
            lichess_timeout_secs: 30,
            max_games: MAX_GAMES_CAP,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            lichess_base_url: env::var("LICHESS_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.lichess_base_url),
            lichess_timeout_secs: env::var("LICHESS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.lichess_timeout_secs),
            max_games: env::var("LICHESS_MAX_GAMES")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .map(|n| n.clamp(1, MAX_GAMES_CAP))
                .unwrap_or(defaults.max_games),
        }
    }
}
