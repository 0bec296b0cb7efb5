use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::chart::RenderError;
use crate::clients::lichess::LichessError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] LichessError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(e) => {
                tracing::error!("Lichess fetch failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}"))
            }
            AppError::Render(e) => {
                tracing::error!("Chart rendering failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}"))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {msg}"))
            }
        };

        (status, [(header::CONTENT_TYPE, "text/plain")], message).into_response()
    }
}
