// Visualizer error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Visualizer error code constants
///
/// Single source of truth for the numeric codes reported to hosts that
/// embed the visualizer (UI shells, the CLI exit report).
///
/// Error code range: 3001-3007
pub struct VisualizerErrorCodes {}

impl VisualizerErrorCodes {
    /// `start()` was called without a spectrum source
    pub const SOURCE_NOT_CONFIGURED: i32 = 3001;

    /// Visualizer tick loop is already running
    pub const ALREADY_RUNNING: i32 = 3002;

    /// Visualizer tick loop is not running
    pub const NOT_RUNNING: i32 = 3003;

    /// Viewport dimensions were zero, negative or not finite
    pub const INVALID_VIEWPORT: i32 = 3004;

    /// Configuration failed validation
    pub const INVALID_CONFIG: i32 = 3005;

    /// Spectrum source could not be opened
    pub const SOURCE_OPEN_FAILED: i32 = 3006;

    /// Spectrum source produced undecodable audio
    pub const SOURCE_DECODE_FAILED: i32 = 3007;
}

/// Log a visualizer error with structured context
///
/// Logs the numeric code, the failing component and the human-readable
/// message. Never panics.
pub fn log_visualizer_error(err: &VisualizerError, context: &str) {
    error!(
        "Visualizer error in {}: code={}, component=Visualizer, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Visualizer errors
///
/// Only the control surface and the reference sources can fail; the
/// steady-state tick never returns an error.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualizerError {
    /// No spectrum source was supplied to `start()`
    SourceNotConfigured,

    /// Visualizer is already running
    AlreadyRunning,

    /// Visualizer is not running
    NotRunning,

    /// Viewport dimensions rejected
    InvalidViewport { width: f32, height: f32 },

    /// Configuration rejected by validation
    InvalidConfig { reason: String },

    /// Source could not be opened
    SourceOpenFailed { reason: String },

    /// Source audio could not be decoded
    SourceDecodeFailed { reason: String },
}

impl ErrorCode for VisualizerError {
    fn code(&self) -> i32 {
        match self {
            VisualizerError::SourceNotConfigured => VisualizerErrorCodes::SOURCE_NOT_CONFIGURED,
            VisualizerError::AlreadyRunning => VisualizerErrorCodes::ALREADY_RUNNING,
            VisualizerError::NotRunning => VisualizerErrorCodes::NOT_RUNNING,
            VisualizerError::InvalidViewport { .. } => VisualizerErrorCodes::INVALID_VIEWPORT,
            VisualizerError::InvalidConfig { .. } => VisualizerErrorCodes::INVALID_CONFIG,
            VisualizerError::SourceOpenFailed { .. } => VisualizerErrorCodes::SOURCE_OPEN_FAILED,
            VisualizerError::SourceDecodeFailed { .. } => {
                VisualizerErrorCodes::SOURCE_DECODE_FAILED
            }
        }
    }

    fn message(&self) -> String {
        match self {
            VisualizerError::SourceNotConfigured => {
                "No spectrum source configured. Supply a source to start().".to_string()
            }
            VisualizerError::AlreadyRunning => {
                "Visualizer already running. Call stop() first.".to_string()
            }
            VisualizerError::NotRunning => {
                "Visualizer not running. Call start() first.".to_string()
            }
            VisualizerError::InvalidViewport { width, height } => {
                format!("Invalid viewport {}x{}", width, height)
            }
            VisualizerError::InvalidConfig { reason } => {
                format!("Invalid configuration: {}", reason)
            }
            VisualizerError::SourceOpenFailed { reason } => {
                format!("Failed to open spectrum source: {}", reason)
            }
            VisualizerError::SourceDecodeFailed { reason } => {
                format!("Failed to decode source audio: {}", reason)
            }
        }
    }
}

impl fmt::Display for VisualizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VisualizerError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for VisualizerError {}

impl From<std::io::Error> for VisualizerError {
    fn from(err: std::io::Error) -> Self {
        VisualizerError::SourceOpenFailed {
            reason: err.to_string(),
        }
    }
}

impl From<hound::Error> for VisualizerError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => io.into(),
            other => VisualizerError::SourceDecodeFailed {
                reason: other.to_string(),
            },
        }
    }
}
