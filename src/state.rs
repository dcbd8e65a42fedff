use std::sync::Arc;

use crate::config::Config;
use crate::services::VideoService;

/// Everything the HTTP layer needs, built once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub video: Arc<VideoService>,
}

impl SharedState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let video = Arc::new(VideoService::new(&config.extractor));
        Self {
            config: Arc::new(config),
            video,
        }
    }
}
