//! Ranking of backend-reported formats into the list we surface.
//!
//! Clients expect a single playable URL per entry, so only formats that
//! already carry both an audio and a video track survive; adaptive
//! audio-only/video-only streams are dropped rather than muxed.

use serde::Serialize;
use std::collections::HashSet;

use crate::clients::ytdlp::RawFormat;
use crate::constants::limits::MAX_RANKED_FORMATS;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A merged format ready for the API response.
#[derive(Debug, Clone, Serialize)]
pub struct RankedFormat {
    pub format_id: String,

    /// Height with a "p" suffix, e.g. "1080p".
    pub quality: String,

    pub resolution: u32,

    pub extension: String,

    pub filesize: u64,

    /// Rounded to two decimals; unset when the backend reported no size.
    pub filesize_mb: Option<f64>,

    pub url: String,

    pub has_audio: bool,

    pub has_video: bool,
}

/// Size in MiB rounded to two decimals, or None for unknown/zero sizes.
#[must_use]
pub fn size_in_megabytes(bytes: Option<f64>) -> Option<f64> {
    bytes
        .filter(|b| *b > 0.0)
        .map(|b| (b / BYTES_PER_MIB * 100.0).round() / 100.0)
}

/// Select the merged formats worth surfacing.
///
/// Keeps only formats with both tracks, a direct URL and a known height,
/// one entry per (height, extension) pair with the first occurrence
/// winning (the backend lists its preferred rendition first), sorted by
/// height descending and capped at [`MAX_RANKED_FORMATS`]. Pure and
/// infallible: an empty input yields an empty output.
#[must_use]
pub fn select_merged_formats(raw: &[RawFormat]) -> Vec<RankedFormat> {
    let mut selected = Vec::new();
    let mut seen: HashSet<(u32, String)> = HashSet::new();

    for format in raw {
        if !(format.has_video() && format.has_audio()) {
            continue;
        }

        let Some(url) = format.url.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        let Some(height) = format.height.filter(|h| *h > 0) else {
            continue;
        };

        let extension = format.ext.clone().unwrap_or_else(|| "mp4".to_string());
        if !seen.insert((height, extension.clone())) {
            continue;
        }

        let bytes = format.size_bytes();
        selected.push(RankedFormat {
            format_id: format.format_id.clone().unwrap_or_default(),
            quality: format!("{height}p"),
            resolution: height,
            extension,
            filesize: bytes.unwrap_or(0.0) as u64,
            filesize_mb: size_in_megabytes(bytes),
            url: url.to_string(),
            has_audio: true,
            has_video: true,
        });
    }

    // sort_by is stable, so equal heights keep their input order
    selected.sort_by(|a, b| b.resolution.cmp(&a.resolution));
    selected.truncate(MAX_RANKED_FORMATS);
    selected
}
