//! Error types for streamstack-core

use thiserror::Error;

/// Result type alias for streamstack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for streamstack-core
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from an underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A filter plugin with the same name is already registered
    #[error("Filter '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Seek requested on a stream that cannot seek
    #[error("Stream is not seekable")]
    NotSeekable,

    /// Directory listing requested on a stream without one
    #[error("Stream has no directory listing")]
    NotADirectory,

    /// Compressed payload could not be decoded
    #[error("Decompression error: {0}")]
    Decompress(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
