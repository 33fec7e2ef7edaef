//! Error types for session operations.

use emblem_common::{ObjectId, PayloadError};
use thiserror::Error;

/// Errors that can occur in the session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A wire payload was not valid base64.
    #[error("wire payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A decoded payload failed length validation.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// An operation referenced an object the coordinator does not own.
    #[error("unknown object {0:?}")]
    UnknownObject(ObjectId),

    /// Policy configuration could not be read.
    #[error("failed to read session policy: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Policy configuration could not be parsed.
    #[error("failed to parse session policy: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
