pub mod platform;
pub mod video;

pub use platform::Platform;
pub use video::{ExtractionError, ResolvedDownload, VideoDetails, VideoService};
