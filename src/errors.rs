// Error types for motorecap

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum RecapError {
    // User input validation errors
    #[snafu(display("Invalid rider input: {field} - {reason}"))]
    InvalidRiderInput { field: String, reason: String },
    #[snafu(display("Error serializing rider stats"))]
    StatsSerializeError { source: serde_json::Error },

    // Playback errors
    #[snafu(display("Playback already started, reset before starting a new session"))]
    PlaybackAlreadyStarted,
    #[snafu(display("Slide deck is empty"))]
    EmptySlideDeck,
    #[snafu(display("Slide {id} has a zero duration"))]
    ZeroSlideDuration { id: String },

    // Summary export errors
    #[snafu(display("Nothing to export, the captured region is empty"))]
    EmptyCapture,
    #[snafu(display(
        "Captured region of {width}x{height} does not match its {len} bytes of pixels"
    ))]
    InvalidCapture {
        width: u32,
        height: u32,
        len: usize,
    },
    #[snafu(display("Error encoding summary image"))]
    ExportEncodeError { source: image::ImageError },
    #[snafu(display("Error writing summary image"))]
    ExportIOError { source: io::Error },
    #[snafu(display("Export cancelled"))]
    ExportCancelled,

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
}

impl RecapError {
    /// Whether the error came from rejecting the rider's form input.
    pub fn is_validation(&self) -> bool {
        matches!(self, RecapError::InvalidRiderInput { .. })
    }

    /// Whether the error came from the summary image export.
    pub fn is_export(&self) -> bool {
        matches!(
            self,
            RecapError::EmptyCapture
                | RecapError::InvalidCapture { .. }
                | RecapError::ExportEncodeError { .. }
                | RecapError::ExportIOError { .. }
                | RecapError::ExportCancelled
        )
    }
}
