pub mod daily_chart;
pub mod health;

use axum::{routing::get, Extension, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::clients::lichess::LichessClient;

pub fn router(client: LichessClient) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/lichess", get(daily_chart::get_daily_chart))
        .layer(Extension(client))
        .layer(cors)
}
