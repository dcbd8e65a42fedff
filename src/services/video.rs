//! Orchestration of metadata extraction and download-URL resolution.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::ytdlp::{ExtractOptions, YtDlpClient, YtDlpError};
use crate::config::ExtractorConfig;
use crate::quality::{RankedFormat, format_policy, select_merged_formats, selector};
use crate::services::platform::Platform;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Backend(#[from] YtDlpError),

    /// Extraction succeeded but the chosen format has no direct URL.
    #[error("no direct download URL available for the requested quality")]
    NoDownloadUrl,
}

/// Metadata plus the ranked merged formats for one video.
#[derive(Debug, Clone, Serialize)]
pub struct VideoDetails {
    pub platform: Platform,
    pub title: String,
    pub thumbnail: Option<String>,
    pub duration: Option<u64>,
    pub uploader: Option<String>,
    pub formats: Vec<RankedFormat>,
    pub timestamp: String,
}

/// A single resolved direct URL for the requested quality.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedDownload {
    pub platform: Platform,
    pub title: String,
    pub download_url: String,
    pub extension: String,
    pub filesize_mb: Option<f64>,
    pub has_audio: bool,
    pub has_video: bool,
    pub timestamp: String,
}

pub struct VideoService {
    ytdlp: Arc<YtDlpClient>,
    merge_container: String,
}

impl VideoService {
    #[must_use]
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            ytdlp: Arc::new(YtDlpClient::new(config)),
            merge_container: config.merge_container.clone(),
        }
    }

    /// Fetch metadata and rank the merged formats for `url`.
    pub async fn fetch_info(&self, url: &str) -> Result<VideoDetails, ExtractionError> {
        let platform = Platform::detect(url);
        let info = self.ytdlp.extract(url, &ExtractOptions::default()).await?;
        let formats = select_merged_formats(&info.formats);
        info!(
            url,
            platform = platform.as_str(),
            reported = info.formats.len(),
            surfaced = formats.len(),
            "ranked merged formats"
        );

        Ok(VideoDetails {
            platform,
            title: info.title.unwrap_or_else(|| "Unknown".to_string()),
            thumbnail: info.thumbnail,
            duration: info.duration.map(|d| d.round() as u64),
            uploader: info.uploader,
            formats,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Resolve a direct download URL for `url` at the hinted quality.
    ///
    /// The hint is mapped to a known format policy first; arbitrary caller
    /// input never reaches the extractor command line.
    pub async fn resolve_download_url(
        &self,
        url: &str,
        quality: &str,
    ) -> Result<ResolvedDownload, ExtractionError> {
        let platform = Platform::detect(url);
        let policy = format_policy(quality);
        let options = ExtractOptions {
            format_policy: Some(policy.to_string()),
        };
        let info = self.ytdlp.extract(url, &options).await?;

        let Some(download_url) = info.url.filter(|u| !u.is_empty()) else {
            warn!(url, quality, platform = %platform, "extraction yielded no direct URL");
            return Err(ExtractionError::NoDownloadUrl);
        };

        let has_video = track_present(info.vcodec.as_deref());
        let has_audio = track_present(info.acodec.as_deref());

        Ok(ResolvedDownload {
            platform,
            title: info.title.unwrap_or_else(|| "Unknown".to_string()),
            download_url,
            extension: self.merge_container.clone(),
            filesize_mb: selector::size_in_megabytes(
                info.filesize
                    .filter(|s| *s > 0.0)
                    .or(info.filesize_approx.filter(|s| *s > 0.0)),
            ),
            has_audio,
            has_video,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// A codec field of `"none"` marks a missing track, and an absent field
/// is treated the same way.
fn track_present(codec: Option<&str>) -> bool {
    codec.is_some_and(|c| c != "none")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_present() {
        assert!(track_present(Some("avc1.64001F")));
        assert!(!track_present(Some("none")));
        // a record without the codec field has no track
        assert!(!track_present(None));
    }
}
