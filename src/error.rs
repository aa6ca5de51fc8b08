use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for startup and configuration operations.
pub type ReelResult<T> = Result<T, ReelError>;

/// The error type for everything that may abort startup.
///
/// Per-cycle failures (capture, input) are converted to a skipped cycle by the
/// control loop and never travel further than that.
#[derive(Debug, Error)]
pub enum ReelError {
    #[error("Template '{name}' could not be loaded from {path:?}: {source}")]
    TemplateMissing {
        name: String,
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Template directory not found: {path:?}")]
    TemplateDirMissing { path: PathBuf },

    #[error("Template '{name}' is empty ({width}x{height})")]
    TemplateEmpty { name: String, width: u32, height: u32 },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Input driver failed: {0}")]
    Input(#[from] InputError),

    #[error("Automation command channel closed")]
    ChannelClosed,
}

/// Why a capture produced no image. Always means "skip this cycle".
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture region {width}x{height} at ({left},{top}) is empty or off-frame")]
    InvalidRegion {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    },

    #[error("Capture provider unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Failed to decode frame {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No frames available in {path:?}")]
    NoFrames { path: PathBuf },
}

/// Failure reported by an input driver for a single primitive.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input '{op}' rejected: {reason}")]
    Rejected { op: &'static str, reason: String },
}

impl CaptureError {
    pub fn invalid_region(region: &crate::game_automation::match_image::DetectionRegion) -> Self {
        CaptureError::InvalidRegion {
            left: region.left,
            top: region.top,
            width: region.width,
            height: region.height,
        }
    }
}
