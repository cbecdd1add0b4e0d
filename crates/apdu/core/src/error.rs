//! Core error types for APDU operations

use crate::response::{ResponseError, StatusError};
use crate::transport::TransportError;

/// Result type for APDU operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for APDU operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Command could not be parsed from the given number of bytes
    #[error("invalid command length: {0}")]
    InvalidCommandLength(usize),

    /// Response-related errors
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Status word errors
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Transport-related errors
    #[error(transparent)]
    Transport(#[from] TransportError),
}
