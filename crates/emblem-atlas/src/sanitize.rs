//! Image sanitization.
//!
//! Turns arbitrary user-supplied file bytes into a canonical payload for a
//! block kind. Anything that cannot be used degrades to the empty sentinel
//! ("use the default appearance") rather than an error: a bad image must
//! never abort an update.

use crate::layout::BlockTypeSpec;
use crate::pixel::{ImagePayload, PixelBuffer, Rgba8};
use tracing::debug;

/// Decodes, validates and resizes raw file bytes into the canonical payload
/// for `spec`.
///
/// Empty input means "use the default" and returns [`ImagePayload::Empty`];
/// decode failures are logged at debug level and also resolve to the empty
/// sentinel. The result is always either empty or exactly
/// `spec.width x spec.height`.
///
/// Idempotent over its own output: re-encoding a canonical payload and
/// sanitizing it again reproduces the same pixels, because resizing a
/// buffer to its own size samples exactly at grid points.
#[must_use]
pub fn sanitize(bytes: &[u8], spec: &BlockTypeSpec) -> ImagePayload {
    if bytes.is_empty() {
        return ImagePayload::Empty;
    }

    let decoded = match image::load_from_memory(bytes) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            debug!(kind = ?spec.kind, error = %err, "image decode failed, using default");
            return ImagePayload::Empty;
        }
    };

    let (src_w, src_h) = decoded.dimensions();
    if src_w == 0 || src_h == 0 {
        debug!(kind = ?spec.kind, "decoded image has a zero dimension, using default");
        return ImagePayload::Empty;
    }

    // Image rows come top-down; pixel buffers store the bottom row first.
    let mut src = PixelBuffer::new(src_w, src_h);
    for (x, y, pixel) in decoded.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        src.set(x, src_h - 1 - y, Rgba8::new(r, g, b, a));
    }

    // Mirroring belongs to placement, not sanitization.
    let canonical = crate::compositor::resize(&src, spec.width, spec.height, false, false);
    ImagePayload::Pixels(canonical)
}
