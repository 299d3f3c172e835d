mod ai;
mod config;
mod errors;
mod models;
mod pipeline;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("Starting document QA API server...");

    // Missing credentials fail here, at boot, never per-request
    let config = config::Config::from_env()?;
    tracing::info!(
        "Loaded configuration: server={}:{}, model={}",
        config.server.host,
        config.server.port,
        config.gemini.model
    );

    let drive = storage::DriveClient::new(
        &config.drive,
        Duration::from_secs(config.pipeline.fetch_timeout_seconds),
    );
    let gemini = ai::GeminiClient::new(
        &config.gemini,
        Duration::from_secs(config.pipeline.answer_timeout_seconds),
    );

    let state = state::AppState::new(config.clone(), drive, gemini);

    // Build router with middleware
    let app = routes::create_router(state).layer(
        ServiceBuilder::new()
            // Logging layer
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            // CORS layer: permissive cross-origin access, answers OPTIONS
            // pre-flight with no body
            .layer(CorsLayer::permissive())
            // Compression layer
            .layer(CompressionLayer::new()),
    );

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Health check available at http://{}/api/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
