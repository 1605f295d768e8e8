//! Error types for the Bedrock bridge

use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Bridge error types
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Failed to spawn the server process
    #[error("Spawn error: {0}")]
    Spawn(String),

    /// A child stream was not captured or the server is not running
    #[error("Stream error: {0}")]
    Stream(String),

    /// I/O error on the child streams
    #[error("I/O error: {0}")]
    Io(String),

    /// `server.properties` could not be read or written
    #[error("Properties error: {0}")]
    Properties(String),
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}
