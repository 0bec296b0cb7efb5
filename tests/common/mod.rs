#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chess_core::{TimeWindow, REPORT_TIMEZONE};
use reqwest::Client;
use server::clients::lichess::LichessClient;
use server::config::Config;

const HOUR_MS: i64 = 3_600_000;

/// What the stub Lichess saw for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub username: String,
    pub params: HashMap<String, String>,
    pub accept: Option<String>,
}

pub type Seen = Arc<Mutex<Vec<SeenRequest>>>;

pub struct StubLichess {
    pub base_url: String,
    pub seen: Seen,
}

impl StubLichess {
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn config(&self) -> Config {
        Config {
            lichess_base_url: self.base_url.clone(),
            lichess_timeout_secs: 5,
            ..Config::default()
        }
    }
}

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

/// Three games started today plus one garbage line, without a trailing newline:
/// Alice beats bob as white, Alice beats bob as black, carol and dave draw.
pub fn sample_ndjson() -> String {
    let t = TimeWindow::today(REPORT_TIMEZONE).since_ms;
    [
        format!(r#"{{"id":"g1","createdAt":{t},"winner":"white","players":{{"white":{{"user":{{"name":"Alice"}}}},"black":{{"user":{{"name":"bob"}}}}}}}}"#),
        "this line is not json".to_string(),
        format!(r#"{{"id":"g2","createdAt":{},"winner":"black","players":{{"white":{{"user":{{"name":"bob"}}}},"black":{{"user":{{"name":"alice"}}}}}}}}"#, t + HOUR_MS),
        format!(r#"{{"id":"g3","createdAt":{},"players":{{"white":{{"user":{{"name":"carol"}}}},"black":{{"user":{{"name":"dave"}}}}}}}}"#, t + 2 * HOUR_MS),
    ]
    .join("\n")
}

async fn user_games(
    State(seen): State<Seen>,
    Path(username): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    seen.lock().unwrap().push(SeenRequest {
        username: username.clone(),
        params,
        accept: headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    let ndjson = [(header::CONTENT_TYPE, "application/x-ndjson")];
    match username.as_str() {
        "ghost" => (StatusCode::NOT_FOUND, "Not found").into_response(),
        "quiet" => (ndjson, String::new()).into_response(),
        _ => (ndjson, sample_ndjson()).into_response(),
    }
}

/// Serve a fake Lichess games API on an ephemeral port.
///
/// `ghost` answers 404, `quiet` has no games, anyone else gets [`sample_ndjson`].
pub async fn spawn_stub_lichess() -> StubLichess {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/api/games/user/{username}", get(user_games))
        .with_state(seen.clone());

    let base_url = serve(app).await;
    StubLichess { base_url, seen }
}

/// Serve the real router, talking to `stub`.
pub async fn spawn_app(stub: &StubLichess) -> String {
    let client = LichessClient::new(&stub.config()).expect("Failed to build Lichess client");
    serve(server::routes::router(client)).await
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
