//! Video extraction endpoints.

use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;
use tracing::info;

use super::{ApiError, ApiResponse, AppState, QualityQuery, VideoRequest, validation};
use crate::services::{ResolvedDownload, VideoDetails};

/// `POST /api/video-info`
///
/// Extracts metadata for a video URL and returns the merged formats
/// available for direct download.
pub async fn video_info(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VideoRequest>,
) -> Result<Json<ApiResponse<VideoDetails>>, ApiError> {
    let url = validation::validate_video_url(&payload.url)?;
    info!(url, "video info requested");

    let details = state.shared.video.fetch_info(url).await?;
    Ok(Json(ApiResponse::success(details)))
}

/// `POST /api/download-url?quality=<hint>`
///
/// Resolves a single direct download URL for the requested quality.
/// Unrecognized hints fall back to the best available quality.
pub async fn download_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QualityQuery>,
    Json(payload): Json<VideoRequest>,
) -> Result<Json<ApiResponse<ResolvedDownload>>, ApiError> {
    let url = validation::validate_video_url(&payload.url)?;
    info!(url, quality = %query.quality, "download url requested");

    let resolved = state
        .shared
        .video
        .resolve_download_url(url, &query.quality)
        .await?;
    Ok(Json(ApiResponse::success(resolved)))
}
