use server::chart;
use server::clients::lichess::LichessClient;
use server::config;
use server::routes;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    // Register the chart font before the first request needs it
    chart::init_fonts()?;

    let client = LichessClient::new(&config)?;
    tracing::info!(
        base_url = %config.lichess_base_url,
        max_games = config.max_games,
        "Lichess client configured"
    );

    let addr = format!("{}:{}", config.host, config.port);
    let app = routes::router(client);

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
