mod config;
mod decode;
mod errors;
mod import;
mod models;
mod parser;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::decode::{DocumentDecoder, LocalDecoder, RemoteDecoder};
use crate::parser::tables::HeuristicTables;
use crate::parser::ResumeParser;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume importer v{}", env!("CARGO_PKG_VERSION"));

    // Heuristic tables: built-in, or overridden from HEURISTICS_PATH
    let tables = match &config.heuristics_path {
        Some(path) => {
            info!("Loading heuristic tables from {}", path.display());
            HeuristicTables::load(path)?
        }
        None => HeuristicTables::default(),
    };
    let parser = ResumeParser::new(tables).context("Heuristic tables failed to compile")?;

    // Document decoder: remote service when DECODER_URL is set, in-process otherwise
    let decoder: Arc<dyn DocumentDecoder> = match &config.decoder_url {
        Some(url) => {
            info!("Using remote decoder at {url}");
            Arc::new(
                RemoteDecoder::new(url.clone(), config.decoder_timeout)
                    .context("Failed to build decoder HTTP client")?,
            )
        }
        None => {
            info!("Using in-process decoder");
            Arc::new(LocalDecoder)
        }
    };

    info!(
        "Upload limit {} bytes, decode timeout {}s",
        config.max_upload_bytes,
        config.decoder_timeout.as_secs()
    );

    let state = AppState::new(config.clone(), parser, decoder);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
