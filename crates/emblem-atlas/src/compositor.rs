//! Pure pixel-transform algorithms.
//!
//! Every function here is total over well-formed buffers and touches no
//! shared state. Malformed payload lengths are rejected one layer up, in
//! the sanitize pipeline and the wire codec, never here.

use crate::error::{AtlasError, Result};
use crate::pixel::{PixelBuffer, Rgba8};
use serde::{Deserialize, Serialize};

/// Rotation applied to a split-region piece before placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// Quarter turn counter-clockwise.
    Left90,
    /// Quarter turn clockwise.
    Right90,
    /// Half turn.
    Flip180,
}

/// Resizes `src` to `width x height` by bilinear sampling at end-point
/// aligned normalized coordinates. When a mirror flag is set the
/// corresponding coordinate is reflected (`1 - u`) before sampling.
#[must_use]
pub fn resize(
    src: &PixelBuffer,
    width: u32,
    height: u32,
    mirror_x: bool,
    mirror_y: bool,
) -> PixelBuffer {
    let mut dest = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let (u, v) = normalized(x, y, width, height, mirror_x, mirror_y);
            dest.set(x, y, src.sample_bilinear(u, v));
        }
    }
    dest
}

#[inline]
fn normalized(x: u32, y: u32, w: u32, h: u32, mirror_x: bool, mirror_y: bool) -> (f32, f32) {
    let mut u = if w > 1 { x as f32 / (w - 1) as f32 } else { 0.0 };
    let mut v = if h > 1 { y as f32 / (h - 1) as f32 } else { 0.0 };
    if mirror_x {
        u = 1.0 - u;
    }
    if mirror_y {
        v = 1.0 - v;
    }
    (u, v)
}

fn check_bounds(dest: &PixelBuffer, x: u32, y: u32, w: u32, h: u32) -> Result<()> {
    // Widened so extreme offsets cannot wrap past the check.
    if u64::from(x) + u64::from(w) > u64::from(dest.width())
        || u64::from(y) + u64::from(h) > u64::from(dest.height())
    {
        return Err(AtlasError::OutOfBounds {
            x,
            y,
            width: w,
            height: h,
            dest_width: dest.width(),
            dest_height: dest.height(),
        });
    }
    Ok(())
}

/// Writes `overlay` resized to `(w, h)` into `dest` at `(x, y)`, fully
/// replacing the destination pixels. This is the canonical placement mode;
/// see [`overlay_blended`] for the legacy alpha-blend variant.
#[allow(clippy::too_many_arguments)]
pub fn overlay(
    dest: &mut PixelBuffer,
    overlay: &PixelBuffer,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    mirror_x: bool,
    mirror_y: bool,
) -> Result<()> {
    check_bounds(dest, x, y, w, h)?;
    for dy in 0..h {
        for dx in 0..w {
            let (u, v) = normalized(dx, dy, w, h, mirror_x, mirror_y);
            dest.set(x + dx, y + dy, overlay.sample_bilinear(u, v));
        }
    }
    Ok(())
}

/// Legacy placement mode: source-over alpha blend instead of direct
/// replacement. Kept for compatibility with appearances produced by the
/// oldest generation of the format; the canonical path never calls this.
pub fn overlay_blended(
    dest: &mut PixelBuffer,
    overlay: &PixelBuffer,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
) -> Result<()> {
    check_bounds(dest, x, y, w, h)?;
    for dy in 0..h {
        for dx in 0..w {
            let (u, v) = normalized(dx, dy, w, h, false, false);
            let over = overlay.sample_bilinear(u, v);
            let under = dest.get(x + dx, y + dy);
            dest.set(x + dx, y + dy, blend_source_over(over, under));
        }
    }
    Ok(())
}

fn blend_source_over(over: Rgba8, under: Rgba8) -> Rgba8 {
    let ao = f32::from(over.a) / 255.0;
    let au = f32::from(under.a) / 255.0;
    let a_out = ao + au * (1.0 - ao);
    if a_out <= 0.0 {
        return Rgba8::transparent();
    }
    let channel = |o: u8, u: u8| -> u8 {
        let c = (f32::from(o) * ao + f32::from(u) * au * (1.0 - ao)) / a_out;
        c.round() as u8
    };
    Rgba8::new(
        channel(over.r, under.r),
        channel(over.g, under.g),
        channel(over.b, under.b),
        (a_out * 255.0).round() as u8,
    )
}

/// Border width used by [`extend_border`].
pub const BORDER: u32 = 3;

/// Replicates the outermost rows, columns and corner pixels of the rect at
/// `(x, y, w, h)` outward by [`BORDER`] pixels, clamped to `dest` bounds.
/// Keeps GPU mip-map generation from bleeding neighboring atlas content
/// into the region.
pub fn extend_border(dest: &mut PixelBuffer, x: u32, y: u32, w: u32, h: u32) {
    let dw = i64::from(dest.width());
    let dh = i64::from(dest.height());
    let (x, y, w, h) = (i64::from(x), i64::from(y), i64::from(w), i64::from(h));

    for i in 0..i64::from(BORDER) {
        let x1i = (x - (1 + i)).max(0) as u32;
        let xti = (x + w + i).min(dw - 1) as u32;
        let xt1 = (x + w - 1).min(dw - 1) as u32;

        let y1i = (y - (1 + i)).max(0) as u32;
        let yti = (y + h + i).min(dh - 1) as u32;
        let yt1 = (y + h - 1).min(dh - 1) as u32;
        let yw = y.min(dh - 1) as u32;

        // Corners, bottom row first.
        let p = dest.get(x as u32, yw);
        dest.set(x1i, y1i, p);
        let p = dest.get(xt1, yw);
        dest.set(xti, y1i, p);
        let p = dest.get(x as u32, yt1);
        dest.set(x1i, yti, p);
        let p = dest.get(xt1, yt1);
        dest.set(xti, yti, p);

        for xx in (x - i)..(x + w + i) {
            let xx = xx.clamp(0, dw - 1) as u32;
            let p = dest.get(xx, yw);
            dest.set(xx, y1i, p);
            let p = dest.get(xx, yt1);
            dest.set(xx, yti, p);
        }

        for yy in (y - i)..(y + h + i) {
            let yy = yy.clamp(0, dh - 1) as u32;
            let p = dest.get(x as u32, yy);
            dest.set(x1i, yy, p);
            let p = dest.get(xt1, yy);
            dest.set(xti, yy, p);
        }
    }
}

/// Extracts the rectangular sub-buffer at `(x, y, w, h)`.
pub fn cut(src: &PixelBuffer, x: u32, y: u32, w: u32, h: u32) -> Result<PixelBuffer> {
    check_bounds(src, x, y, w, h)?;
    let mut dest = PixelBuffer::new(w, h);
    for dy in 0..h {
        for dx in 0..w {
            dest.set(dx, dy, src.get(x + dx, y + dy));
        }
    }
    Ok(dest)
}

/// Rotates a buffer. Quarter turns swap the output dimensions.
#[must_use]
pub fn rotate(src: &PixelBuffer, rotation: Rotation) -> PixelBuffer {
    let (w, h) = (src.width(), src.height());
    match rotation {
        Rotation::None => src.clone(),
        Rotation::Left90 => {
            let mut dest = PixelBuffer::new(h, w);
            for y in 0..h {
                for x in 0..w {
                    dest.set(h - 1 - y, x, src.get(x, y));
                }
            }
            dest
        }
        Rotation::Right90 => {
            let mut dest = PixelBuffer::new(h, w);
            for y in 0..h {
                for x in 0..w {
                    dest.set(y, w - 1 - x, src.get(x, y));
                }
            }
            dest
        }
        Rotation::Flip180 => {
            let mut dest = PixelBuffer::new(w, h);
            for y in 0..h {
                for x in 0..w {
                    dest.set(w - 1 - x, h - 1 - y, src.get(x, y));
                }
            }
            dest
        }
    }
}

/// Uniform scale-to-fit placement: scales `(src_w, src_h)` by
/// `min(box_w/src_w, box_h/src_h)` and centers it inside the box.
/// Returns `(x_offset, y_offset, new_width, new_height)`.
#[must_use]
pub fn scale_to_fit(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32, u32, u32) {
    let scale_w = f64::from(box_w) / f64::from(src_w);
    let scale_h = f64::from(box_h) / f64::from(src_h);
    let ratio = scale_w.min(scale_h);
    let new_w = box_w.min((ratio * f64::from(src_w)) as u32);
    let new_h = box_h.min((ratio * f64::from(src_h)) as u32);
    ((box_w - new_w) / 2, (box_h - new_h) / 2, new_w, new_h)
}
