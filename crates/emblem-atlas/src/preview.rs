//! Editor preview thumbnails.
//!
//! A payload is scaled to fit a fixed-size sprite canvas without
//! distortion and centered; the canvas stays transparent around it.

use crate::compositor::{overlay, scale_to_fit};
use crate::pixel::PixelBuffer;
use tracing::debug;

/// Preview sprite canvas width.
pub const PREVIEW_WIDTH: u32 = 1524;
/// Preview sprite canvas height.
pub const PREVIEW_HEIGHT: u32 = 1024;

/// Renders a payload into a preview sprite canvas.
#[must_use]
pub fn preview_sprite(payload: &PixelBuffer) -> PixelBuffer {
    let mut canvas = PixelBuffer::new(PREVIEW_WIDTH, PREVIEW_HEIGHT);
    let (x, y, w, h) = scale_to_fit(
        payload.width(),
        payload.height(),
        PREVIEW_WIDTH,
        PREVIEW_HEIGHT,
    );
    // scale_to_fit never exceeds the canvas, so this cannot fail.
    if let Err(err) = overlay(&mut canvas, payload, x, y, w, h, false, false) {
        debug!(error = %err, "preview placement failed");
    }
    canvas
}
