//! Shared payload validation errors.
//!
//! Raw RGBA payloads cross three boundaries (sanitize output, wire decode,
//! save load) and all of them enforce the same two rules: the byte length
//! must be a multiple of 4, and a non-empty payload must match the block
//! type's declared `width * height * 4`.

use thiserror::Error;

/// Validation failure for a raw RGBA payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Byte length is not a multiple of 4.
    #[error("payload length {actual} is not a multiple of 4")]
    NotPixelAligned {
        /// Actual byte length.
        actual: usize,
    },

    /// Byte length does not match the declared dimensions.
    #[error("payload length {actual} does not match expected {expected} ({width}x{height}x4)")]
    LengthMismatch {
        /// Expected byte length (`width * height * 4`).
        expected: usize,
        /// Actual byte length.
        actual: usize,
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
}

/// Validates a raw payload against declared dimensions.
pub fn validate_payload_len(bytes: usize, width: u32, height: u32) -> Result<(), PayloadError> {
    if bytes & 3 != 0 {
        return Err(PayloadError::NotPixelAligned { actual: bytes });
    }
    let expected = width as usize * height as usize * 4;
    if bytes != expected {
        return Err(PayloadError::LengthMismatch {
            expected,
            actual: bytes,
            width,
            height,
        });
    }
    Ok(())
}
