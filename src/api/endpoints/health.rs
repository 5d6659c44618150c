//! Health check endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::config;

#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /` — service banner.
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Blood test report analyzer is running",
        status: "healthy",
        version: config::APP_VERSION,
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub components: HealthComponents,
}

#[derive(Serialize)]
pub struct HealthComponents {
    pub api: &'static str,
    pub reasoning_model: String,
    pub file_system: &'static str,
}

/// `GET /health` — per-component health.
///
/// `file_system` reflects whether the staging directory is usable; the
/// reasoning model is reported by name without a round-trip to Ollama so
/// the check stays cheap.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let staging_ok = std::fs::create_dir_all(&ctx.config.staging_dir).is_ok();

    Json(HealthResponse {
        status: if staging_ok { "healthy" } else { "degraded" },
        components: HealthComponents {
            api: "operational",
            reasoning_model: ctx.config.model.clone(),
            file_system: if staging_ok { "accessible" } else { "unavailable" },
        },
    })
}
