//! Mapping from caller-supplied quality hints to extractor policies.

/// Policy used when the hint is not in [`POLICIES`]. Unrestricted best
/// available; this is the documented fallback, not an error.
pub const DEFAULT_POLICY: &str = "bestvideo+bestaudio/best";

/// Recognized hint tokens and the format-selection policy each maps to.
/// Every capped policy prefers an mp4 video plus m4a audio pair so the
/// merge step stays a cheap remux.
const POLICIES: &[(&str, &str)] = &[
    (
        "2160",
        "bestvideo[height<=2160][ext=mp4]+bestaudio[ext=m4a]/best[height<=2160]",
    ),
    (
        "1440",
        "bestvideo[height<=1440][ext=mp4]+bestaudio[ext=m4a]/best[height<=1440]",
    ),
    (
        "1080",
        "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080]",
    ),
    (
        "720",
        "bestvideo[height<=720][ext=mp4]+bestaudio[ext=m4a]/best[height<=720]",
    ),
    (
        "480",
        "bestvideo[height<=480][ext=mp4]+bestaudio[ext=m4a]/best[height<=480]",
    ),
    (
        "360",
        "bestvideo[height<=360][ext=mp4]+bestaudio[ext=m4a]/best[height<=360]",
    ),
    ("best", "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best"),
];

/// Resolve a quality hint to an extractor format policy.
#[must_use]
pub fn format_policy(hint: &str) -> &'static str {
    POLICIES
        .iter()
        .find(|(token, _)| *token == hint)
        .map_or(DEFAULT_POLICY, |(_, policy)| *policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_hints() {
        assert_eq!(
            format_policy("1080"),
            "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080]"
        );
        assert_eq!(
            format_policy("best"),
            "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best"
        );

        for (token, policy) in POLICIES {
            assert_eq!(format_policy(token), *policy);
        }
    }

    #[test]
    fn test_unrecognized_hint_falls_back() {
        assert_eq!(format_policy("4320"), DEFAULT_POLICY);
        assert_eq!(format_policy("1080p"), DEFAULT_POLICY);
        assert_eq!(format_policy(""), DEFAULT_POLICY);
        assert_eq!(format_policy("BEST"), DEFAULT_POLICY);
    }
}
