pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Builds the application router.
///
/// Uploads are unbounded unless `max_upload_bytes` is set; axum's implicit
/// 2 MiB default is always lifted.
pub fn build_router(state: AppState, max_upload_bytes: Option<usize>) -> Router {
    let body_limit = match max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze-pitch", post(handlers::handle_analyze_pitch))
        .layer(body_limit)
        .with_state(state)
}
