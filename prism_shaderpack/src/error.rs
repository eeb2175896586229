//! Error types for Prism
//!
//! This module defines the error type shared by the pass deriver,
//! the shader pack description and the in-crate collaborator implementations.

use std::fmt;

/// Result type for Prism operations
pub type Result<T> = std::result::Result<T, Error>;

/// Prism errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Collaborator or I/O failure (patcher, allocator, file system)
    BackendError(String),

    /// Malformed input text (import directive, asset location)
    MalformedInput(String),

    /// Invalid or missing resource (asset, factory, framebuffer)
    InvalidResource(String),

    /// Object used before it was initialized (passes read before derive)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::BackendError(err.to_string())
    }
}
