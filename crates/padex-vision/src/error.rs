//! Error types for the vision layer.

use thiserror::Error;

/// Errors that can occur when reading fields through a vision backend.
#[derive(Error, Debug)]
pub enum VisionError {
    /// No API key was configured for the backend.
    #[error("no vision API key configured")]
    MissingApiKey,

    /// The backend was explicitly disabled (text-only mode).
    #[error("vision backend is disabled")]
    Disabled,

    /// Transport-level failure (connect, TLS, timeout, decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The API reply carried no message content.
    #[error("API reply contained no content")]
    EmptyReply,
}
