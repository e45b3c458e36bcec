//! Error types for algoviz-vis.

use thiserror::Error;

/// Result type for visualizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the visualizer and its server.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value could not be used
    #[error("Configuration error: {0}")]
    Config(String),

    /// Playback needs a tokio runtime to schedule ticks on
    #[error("No tokio runtime available for playback scheduling")]
    NoRuntime,

    /// Result payload did not match its kind
    #[error(transparent)]
    Payload(#[from] algoviz_trace::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors a render target can report when presenting a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Nothing is attached to receive the frame
    #[error("Render target not found: {0}")]
    TargetNotFound(String),
}
