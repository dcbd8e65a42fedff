pub mod limits {

    /// Hard cap on the ranked-format list returned by video-info.
    pub const MAX_RANKED_FORMATS: usize = 15;
}

pub mod extractor {

    pub const DEFAULT_BINARY: &str = "yt-dlp";

    /// Canonical output container; resolved downloads always report this
    /// extension regardless of the source container.
    pub const MERGE_CONTAINER: &str = "mp4";

    pub const SOCKET_TIMEOUT_SECS: u64 = 15;

    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}
