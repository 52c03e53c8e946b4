//! wordcycle-server — standalone vocabulary cycle server.
//!
//! See `config` for the environment variables it reads.

use anyhow::Context;
use tokio::net::TcpListener;
use wordcycle_server::config::ServerConfig;
use wordcycle_server::router::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may set RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wordcycle_server=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;
    tracing::info!(backend = state.sampler.backend(), "Sampler ready");

    let app = build_router(state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    tracing::info!("Server running at http://{}", bind_addr);
    tracing::info!("Endpoint: http://{}/get", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
