//! Error types for conifer.
//!
//! The generators and the morph engine clamp bad input instead of failing;
//! the only fallible operation in the core is loading the photo collection.

use std::fmt;

/// Errors that can occur while loading the photo collection.
#[derive(Debug)]
pub enum PhotoError {
    /// Failed to read the collection file from disk.
    Io(std::io::Error),
    /// The collection file is not valid JSON for the expected schema.
    Json(serde_json::Error),
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::Io(e) => write!(f, "Failed to read photo collection: {}", e),
            PhotoError::Json(e) => write!(f, "Failed to parse photo collection: {}", e),
        }
    }
}

impl std::error::Error for PhotoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PhotoError::Io(e) => Some(e),
            PhotoError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(e: std::io::Error) -> Self {
        PhotoError::Io(e)
    }
}

impl From<serde_json::Error> for PhotoError {
    fn from(e: serde_json::Error) -> Self {
        PhotoError::Json(e)
    }
}
