//! Error types for pixel and layout operations.

use emblem_common::PayloadError;
use thiserror::Error;

/// Errors that can occur in atlas operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    /// Payload byte length failed validation.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// A destination rectangle does not fit inside the target buffer.
    #[error("rectangle {width}x{height} at ({x}, {y}) exceeds {dest_width}x{dest_height} bounds")]
    OutOfBounds {
        /// Rectangle x offset.
        x: u32,
        /// Rectangle y offset.
        y: u32,
        /// Rectangle width.
        width: u32,
        /// Rectangle height.
        height: u32,
        /// Destination buffer width.
        dest_width: u32,
        /// Destination buffer height.
        dest_height: u32,
    },

    /// A cache file could not be read or written.
    #[error("preview cache I/O failed for '{name}': {reason}")]
    Cache {
        /// Cache entry name.
        name: String,
        /// Underlying failure description.
        reason: String,
    },
}

/// Result alias for atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
