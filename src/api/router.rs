//! Analyzer API router.
//!
//! A composable `Router` that can be mounted on any axum server. CORS is
//! permissive (browser clients upload reports directly), and the body
//! limit tracks the configured upload cap plus multipart overhead.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Headroom over the raw file cap for multipart boundaries and text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn analyzer_router(ctx: ApiContext) -> Router {
    let body_limit = ctx.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(endpoints::health::banner))
        .route("/health", get(endpoints::health::check))
        .route("/analyze", post(endpoints::analyze::upload))
        .route("/analyze-sample", post(endpoints::analyze::sample))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
