// Library interface for motorecap
// The desktop UI lives in the binary, everything it drives is here

pub mod config;
pub mod errors;
pub mod export;
pub mod playback;
pub mod slides;
pub mod stats;

// Re-export commonly used types
pub use errors::RecapError;
pub use export::{CapturedRegion, PngExporter, SummaryExporter};
pub use playback::{PlaybackEngine, PlaybackState, REFERENCE_DECK, SlideId, SlideSpec, TapZone};
pub use slides::SlideContent;
pub use stats::{Challans, RideStats, RiderRank, submit};
