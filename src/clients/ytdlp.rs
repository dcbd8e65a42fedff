//! Client for the yt-dlp extraction backend.
//!
//! Every extraction is a single subprocess invocation with `--dump-json`;
//! no download happens on our side. Failures are reported with the message
//! text yt-dlp printed, so callers can surface it to the API client.

use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::config::ExtractorConfig;

#[derive(Debug, Error)]
pub enum YtDlpError {
    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("extraction timed out after {0} seconds")]
    Timeout(u64),

    /// The backend ran but reported a failure (unsupported URL, network
    /// error, geo restriction, ...). Carries the backend's own message.
    #[error("{0}")]
    Backend(String),

    #[error("failed to parse extractor output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One encoded rendition of a video as reported by the backend.
///
/// All fields are optional; yt-dlp omits or nulls most of them depending
/// on the site. `vcodec`/`acodec` use the literal `"none"` sentinel for a
/// missing track.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    pub format_id: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub height: Option<u32>,
    pub ext: Option<String>,
    pub url: Option<String>,
    pub filesize: Option<f64>,
    pub filesize_approx: Option<f64>,
}

impl RawFormat {
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref().is_some_and(|c| c != "none")
    }

    pub fn has_audio(&self) -> bool {
        self.acodec.as_deref().is_some_and(|c| c != "none")
    }

    /// Prefer the exact size, fall back to the estimate.
    pub fn size_bytes(&self) -> Option<f64> {
        self.filesize
            .filter(|s| *s > 0.0)
            .or(self.filesize_approx.filter(|s| *s > 0.0))
    }
}

/// Top-level extraction record. When a format policy was supplied the
/// resolved fields (`url`, `vcodec`, ...) describe the single chosen format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVideoInfo {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub uploader: Option<String>,

    #[serde(default)]
    pub formats: Vec<RawFormat>,

    pub url: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub filesize: Option<f64>,
    pub filesize_approx: Option<f64>,
}

/// Per-request knobs forwarded to the backend.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// yt-dlp format-selection policy (`-f`). None lists all formats.
    pub format_policy: Option<String>,
}

#[derive(Clone)]
pub struct YtDlpClient {
    binary: String,
    cookies_file: Option<PathBuf>,
    socket_timeout: u64,
    request_timeout: Duration,
    merge_container: String,
}

impl YtDlpClient {
    #[must_use]
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            cookies_file: config.cookies_file.clone(),
            socket_timeout: config.socket_timeout_seconds,
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
            merge_container: config.merge_container.clone(),
        }
    }

    /// Extract metadata for `url` without downloading anything.
    ///
    /// One invocation per call; transient failures are surfaced directly
    /// rather than retried here.
    pub async fn extract(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<RawVideoInfo, YtDlpError> {
        let args = self.build_args(url, options);
        debug!(binary = %self.binary, ?args, "invoking extractor");

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.request_timeout, cmd.output())
            .await
            .map_err(|_| YtDlpError::Timeout(self.request_timeout.as_secs()))?
            .map_err(|source| YtDlpError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(YtDlpError::Backend(backend_message(&stderr, output.status)));
        }

        parse_extraction(&output.stdout)
    }

    fn build_args(&self, url: &str, options: &ExtractOptions) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--no-check-certificates".to_string(),
            "--socket-timeout".to_string(),
            self.socket_timeout.to_string(),
            "--merge-output-format".to_string(),
            self.merge_container.clone(),
            "--recode-video".to_string(),
            self.merge_container.clone(),
        ];

        if let Some(policy) = &options.format_policy {
            args.push("-f".to_string());
            args.push(policy.clone());
        }

        if let Some(path) = &self.cookies_file {
            args.push("--cookies".to_string());
            args.push(path.to_string_lossy().to_string());
        }

        args.push(url.to_string());
        args
    }
}

/// `--dump-json` emits one JSON object per line; with `--no-playlist` that
/// is a single line, but skip any stray blank lines.
fn parse_extraction(stdout: &[u8]) -> Result<RawVideoInfo, YtDlpError> {
    let text = String::from_utf8_lossy(stdout);
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    Ok(serde_json::from_str(line)?)
}

/// Pull the `ERROR:` lines out of stderr. yt-dlp prefixes every fatal
/// message that way; anything else is noise we do not want to forward.
fn backend_message(stderr: &str, status: std::process::ExitStatus) -> String {
    let errors: Vec<&str> = stderr
        .lines()
        .filter_map(|l| l.trim().strip_prefix("ERROR:"))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if !errors.is_empty() {
        return errors.join("; ");
    }

    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map_or_else(|| format!("extractor exited with {status}"), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extraction() {
        let json = r#"{
            "title": "Some Video",
            "duration": 212.5,
            "uploader": "someone",
            "formats": [
                {"format_id": "22", "vcodec": "avc1.64001F", "acodec": "mp4a.40.2",
                 "height": 720, "ext": "mp4", "url": "https://cdn/v.mp4",
                 "filesize": 10485760},
                {"format_id": "251", "vcodec": "none", "acodec": "opus",
                 "ext": "webm", "url": "https://cdn/a.webm"}
            ]
        }"#;

        let info = parse_extraction(json.as_bytes()).unwrap();
        assert_eq!(info.title.as_deref(), Some("Some Video"));
        assert_eq!(info.formats.len(), 2);
        assert!(info.formats[0].has_video());
        assert!(info.formats[0].has_audio());
        assert!(!info.formats[1].has_video());
        assert_eq!(info.formats[0].size_bytes(), Some(10_485_760.0));
    }

    #[test]
    fn test_track_detection_sentinels() {
        // only "none" and a missing field mean no track
        let fmt = RawFormat {
            vcodec: Some(String::new()),
            acodec: None,
            ..RawFormat::default()
        };
        assert!(fmt.has_video());
        assert!(!fmt.has_audio());

        let fmt = RawFormat {
            vcodec: Some("none".to_string()),
            ..RawFormat::default()
        };
        assert!(!fmt.has_video());
    }

    #[test]
    fn test_parse_extraction_skips_blank_lines() {
        let out = b"\n{\"title\": \"t\"}\n";
        let info = parse_extraction(out).unwrap();
        assert_eq!(info.title.as_deref(), Some("t"));
    }

    #[test]
    fn test_parse_extraction_rejects_garbage() {
        assert!(parse_extraction(b"not json").is_err());
    }

    #[test]
    fn test_size_bytes_prefers_exact() {
        let fmt = RawFormat {
            filesize: Some(100.0),
            filesize_approx: Some(200.0),
            ..RawFormat::default()
        };
        assert_eq!(fmt.size_bytes(), Some(100.0));

        let fmt = RawFormat {
            filesize: Some(0.0),
            filesize_approx: Some(200.0),
            ..RawFormat::default()
        };
        assert_eq!(fmt.size_bytes(), Some(200.0));

        let fmt = RawFormat::default();
        assert_eq!(fmt.size_bytes(), None);
    }

    #[test]
    fn test_backend_message_extracts_error_lines() {
        let ok = std::process::Command::new("false").status();
        let status = ok.expect("spawn false");

        let stderr = "WARNING: something minor\nERROR: Unsupported URL: https://x\n";
        assert_eq!(
            backend_message(stderr, status),
            "Unsupported URL: https://x"
        );

        let stderr = "some trailing noise\n";
        assert_eq!(backend_message(stderr, status), "some trailing noise");
    }

    #[test]
    fn test_build_args_includes_policy_and_cookies() {
        let config = ExtractorConfig {
            cookies_file: Some(PathBuf::from("/tmp/cookies.txt")),
            ..ExtractorConfig::default()
        };
        let client = YtDlpClient::new(&config);
        let options = ExtractOptions {
            format_policy: Some("bestvideo+bestaudio/best".to_string()),
        };

        let args = client.build_args("https://example.com/v", &options);
        assert!(args.contains(&"--dump-json".to_string()));
        assert!(args.contains(&"-f".to_string()));
        assert!(args.contains(&"--cookies".to_string()));
        assert_eq!(args.last().unwrap(), "https://example.com/v");

        let args = client.build_args("https://example.com/v", &ExtractOptions::default());
        assert!(!args.contains(&"-f".to_string()));
    }
}
