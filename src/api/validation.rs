use url::Url;

use super::ApiError;

/// Validate a caller-supplied video URL.
///
/// Requires an absolute http(s) URL with a host. This also guarantees the
/// value can never be mistaken for an extractor command-line flag.
pub fn validate_video_url(url: &str) -> Result<&str, ApiError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("URL cannot be empty"));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|_| ApiError::validation(format!("Invalid URL: {trimmed}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::validation(
            "URL must use the http or https scheme",
        ));
    }

    if parsed.host_str().is_none() {
        return Err(ApiError::validation("URL must have a host"));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_urls() {
        assert!(validate_video_url("https://www.youtube.com/watch?v=abc").is_ok());
        assert!(validate_video_url("http://example.com/v/1").is_ok());
        assert_eq!(
            validate_video_url("  https://youtu.be/abc  ").unwrap(),
            "https://youtu.be/abc"
        );
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(validate_video_url("").is_err());
        assert!(validate_video_url("   ").is_err());
        assert!(validate_video_url("not a url").is_err());
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        assert!(validate_video_url("file:///etc/passwd").is_err());
        assert!(validate_video_url("ftp://example.com/v").is_err());
    }

    #[test]
    fn test_rejects_flag_lookalikes() {
        assert!(validate_video_url("--exec=rm").is_err());
        assert!(validate_video_url("-f").is_err());
    }
}
