pub mod health;
pub mod import;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/parse-resume", post(import::handle_parse_resume))
        .route("/api/import-resume", post(import::handle_import_resume))
        .route("/api/parse-text", post(import::handle_parse_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
