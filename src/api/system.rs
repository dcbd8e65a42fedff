//! System API endpoints.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiResponse, AppState, SystemStatus};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub supported_sites: &'static str,
    pub version: &'static str,
}

/// `GET /`
///
/// Unauthenticated liveness probe.
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        service: "vidgate",
        // whatever yt-dlp supports, we support
        supported_sites: "1700+",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/system/status`
///
/// Basic runtime information for operators.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SystemStatus>> {
    let status = SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        extractor_binary: state.shared.config.extractor.binary.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    Json(ApiResponse::success(status))
}
