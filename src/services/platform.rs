//! Source platform detection from the request URL.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Platforms we recognize by hostname. Everything else extracts fine too,
/// the label is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Tiktok,
    Facebook,
    Twitter,
    Other,
}

impl Platform {
    /// Classify a URL by matching well-known hostnames anywhere in it.
    #[must_use]
    pub fn detect(url: &str) -> Self {
        for (platform, pattern) in patterns() {
            if pattern.is_match(url) {
                return *platform;
            }
        }
        Self::Other
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Instagram => "instagram",
            Self::Tiktok => "tiktok",
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn patterns() -> &'static [(Platform, Regex)] {
    static PATTERNS: OnceLock<Vec<(Platform, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |p: &str| Regex::new(p).expect("Invalid regex");
        vec![
            (Platform::Youtube, compile(r"(?i)(youtube\.com|youtu\.be)")),
            (Platform::Instagram, compile(r"(?i)instagram\.com")),
            (Platform::Tiktok, compile(r"(?i)tiktok\.com")),
            (Platform::Facebook, compile(r"(?i)(facebook\.com|fb\.watch)")),
            (Platform::Twitter, compile(r"(?i)(twitter\.com|x\.com)")),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_known_platforms() {
        assert_eq!(
            Platform::detect("https://www.youtube.com/watch?v=abc"),
            Platform::Youtube
        );
        assert_eq!(Platform::detect("https://youtu.be/abc"), Platform::Youtube);
        assert_eq!(
            Platform::detect("https://www.instagram.com/reel/xyz/"),
            Platform::Instagram
        );
        assert_eq!(
            Platform::detect("https://www.tiktok.com/@user/video/1"),
            Platform::Tiktok
        );
        assert_eq!(Platform::detect("https://fb.watch/abc/"), Platform::Facebook);
        assert_eq!(
            Platform::detect("https://x.com/user/status/1"),
            Platform::Twitter
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            Platform::detect("https://WWW.YOUTUBE.COM/watch?v=abc"),
            Platform::Youtube
        );
    }

    #[test]
    fn test_unknown_platform() {
        assert_eq!(Platform::detect("https://vimeo.com/12345"), Platform::Other);
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&Platform::Youtube).unwrap();
        assert_eq!(json, "\"youtube\"");
    }
}
