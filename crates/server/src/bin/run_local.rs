//! Run the daily chart handler once, without starting the HTTP server.
//!
//! Usage: cargo run --bin run-local -- [USERNAME] [--save]
//!
//! The username falls back to TEST_USER. With --save (or SAVE_OUTPUT=1) the
//! PNG is written to output.png in the current directory.

use axum::extract::Query;
use axum::response::IntoResponse;
use axum::Extension;
use server::clients::lichess::LichessClient;
use server::config::Config;
use server::routes::daily_chart::{get_daily_chart, DailyChartQuery};
use tracing_subscriber::EnvFilter;

const OUTPUT_PATH: &str = "output.png";

struct Args {
    user: Option<String>,
    save: bool,
}

fn parse_args() -> Args {
    let mut user = None;
    let mut save = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--save" => save = true,
            _ if user.is_none() => user = Some(arg),
            _ => eprintln!("Ignoring extra argument: {arg}"),
        }
    }
    Args { user, save }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = parse_args();
    let user = args.user.or_else(|| std::env::var("TEST_USER").ok());
    let save = args.save || std::env::var("SAVE_OUTPUT").is_ok_and(|v| v == "1");

    let client = LichessClient::new(&Config::from_env())?;
    let response = get_daily_chart(Extension(client), Query(DailyChartQuery { user }))
        .await
        .into_response();

    println!("Status: {}", response.status());
    for (name, value) in response.headers() {
        println!("  {}: {}", name, value.to_str().unwrap_or("<binary>"));
    }

    let is_png = response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .is_some_and(|v| v == "image/png");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

    if !is_png {
        println!("Body: {}", String::from_utf8_lossy(&body));
    } else if save {
        std::fs::write(OUTPUT_PATH, &body)?;
        println!("Saved {} bytes to {OUTPUT_PATH}", body.len());
    } else {
        println!("Received {} bytes of PNG. Pass --save or set SAVE_OUTPUT=1 to keep it.", body.len());
    }

    Ok(())
}
