//! Error types for the snapping engine

use thiserror::Error;

/// Snapping engine errors
///
/// Only configuration is fallible; no-match is `None`, and lifecycle misuse
/// panics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnapError {
    /// Invalid configuration
    #[error("Invalid snap configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for snapping operations
pub type Result<T> = std::result::Result<T, SnapError>;
