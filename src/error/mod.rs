// Error types for the pulsefield visualizer
//
// This module defines the error type for the visualizer control surface and
// the reference spectrum sources, with numeric codes for hosts that embed
// the core behind an FFI or process boundary.

mod visualizer;

pub use visualizer::{log_visualizer_error, VisualizerError, VisualizerErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
