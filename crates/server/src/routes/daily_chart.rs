use std::sync::LazyLock;

use axum::{
    body::Bytes,
    extract::Query,
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use chess_core::{classify_games, DailySummary, TimeWindow, REPORT_TIMEZONE};
use regex::Regex;
use serde::Deserialize;

use crate::chart;
use crate::clients::lichess::LichessClient;
use crate::error::AppError;

pub const CACHE_POLICY: &str = "public, max-age=60, s-maxage=300, stale-while-revalidate=30";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,50}$").expect("valid username regex"));

#[derive(Debug, Deserialize)]
pub struct DailyChartQuery {
    pub user: Option<String>,
}

/// Trim, drop a leading `@` and check the Lichess username shape.
pub fn normalize_username(raw: Option<&str>) -> Result<String, AppError> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing ?user=USERNAME".into()))?;

    let trimmed = raw.trim();
    let username = trimmed.strip_prefix('@').unwrap_or(trimmed);

    if !USERNAME_RE.is_match(username) {
        return Err(AppError::BadRequest("Invalid username format".into()));
    }
    Ok(username.to_string())
}

/// GET /api/lichess?user=USERNAME
pub async fn get_daily_chart(
    Extension(client): Extension<LichessClient>,
    Query(q): Query<DailyChartQuery>,
) -> Result<Response, AppError> {
    let username = normalize_username(q.user.as_deref())?;
    let png = build_daily_chart(&client, &username).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, CACHE_POLICY),
        ],
        Bytes::from(png),
    )
        .into_response())
}

/// Fetch today's games for `username` and render them.
pub async fn build_daily_chart(client: &LichessClient, username: &str) -> Result<Vec<u8>, AppError> {
    let window = TimeWindow::today(REPORT_TIMEZONE);
    let games = client.fetch_games(username, window).await?;
    let classified = classify_games(&games, username, REPORT_TIMEZONE);
    let summary = DailySummary::from_games(&classified);

    tracing::info!(
        username,
        fetched = games.len(),
        classified = classified.len(),
        "Rendering daily chart"
    );

    let display_name = username.to_string();
    let png = tokio::task::spawn_blocking(move || chart::render_daily_chart(&summary, &display_name))
        .await
        .map_err(|e| AppError::Internal(format!("Render task failed: {e}")))??;

    Ok(png)
}
