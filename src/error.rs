//! Error types for the hat try-on backend.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Inbound frame bytes could not be decoded into an image
    #[error("Frame decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket transport failed; terminates the owning session
    #[error("Transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark extraction backend error
    #[error("Extractor error: {0}")]
    Extractor(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure, caught at the per-frame boundary
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error ends the session. Transport failures do; everything
    /// else is answered per-frame and the session continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
