//! Raw RGBA pixel buffers.
//!
//! [`PixelBuffer`] is the atomic unit every compositing algorithm operates
//! on: a `width * height` vector of [`Rgba8`] pixels in row-major order,
//! row 0 at the bottom. [`ImagePayload`] wraps it with the whole-payload
//! "empty" sentinel meaning "use the block type's default appearance";
//! an empty buffer is never legal mid-pipeline.

use emblem_common::{validate_payload_len, PayloadError};
use serde::{Deserialize, Serialize};

/// A single RGBA8 pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Creates a pixel from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque pixel.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    #[must_use]
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Checks whether the pixel is fully transparent.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// A width x height buffer of RGBA8 pixels, row-major, bottom row first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl PixelBuffer {
    /// Creates a transparent buffer of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::transparent(); width as usize * height as usize],
        }
    }

    /// Creates a buffer filled with a single color.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Builds a buffer from raw RGBA bytes, validating the length against
    /// the declared dimensions.
    pub fn from_bytes(bytes: &[u8], width: u32, height: u32) -> Result<Self, PayloadError> {
        validate_payload_len(bytes.len(), width, height)?;
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Rgba8::new(c[0], c[1], c[2], c[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Serializes the buffer to raw RGBA bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        bytes
    }

    /// Buffer width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Byte length of the raw RGBA serialization.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * 4
    }

    /// Read access to the raw pixel slice.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    /// Returns the pixel at `(x, y)`. Coordinates must be in bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels[self.index(x, y)]
    }

    /// Sets the pixel at `(x, y)`. Coordinates must be in bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: Rgba8) {
        let i = self.index(x, y);
        self.pixels[i] = pixel;
    }

    /// Bilinear sample at normalized coordinates, end-point aligned:
    /// `u = 0` is the center of column 0 and `u = 1` the center of the last
    /// column, so sampling a buffer at its own grid points is an exact
    /// identity. Coordinates outside `[0, 1]` clamp to the edge.
    #[must_use]
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Rgba8 {
        let fx = (u.clamp(0.0, 1.0) * (self.width - 1) as f32).clamp(0.0, (self.width - 1) as f32);
        let fy =
            (v.clamp(0.0, 1.0) * (self.height - 1) as f32).clamp(0.0, (self.height - 1) as f32);

        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let lerp = |a: u8, b: u8, t: f32| -> f32 { f32::from(a) * (1.0 - t) + f32::from(b) * t };
        let blend = |p00: u8, p10: u8, p01: u8, p11: u8| -> u8 {
            let top = lerp(p00, p10, tx);
            let bottom = lerp(p01, p11, tx);
            (top * (1.0 - ty) + bottom * ty).round() as u8
        };

        let p00 = self.get(x0, y0);
        let p10 = self.get(x1, y0);
        let p01 = self.get(x0, y1);
        let p11 = self.get(x1, y1);

        Rgba8::new(
            blend(p00.r, p10.r, p01.r, p11.r),
            blend(p00.g, p10.g, p01.g, p11.g),
            blend(p00.b, p10.b, p01.b, p11.b),
            blend(p00.a, p10.a, p01.a, p11.a),
        )
    }
}

/// A whole-payload value: either concrete pixels or the "use the default
/// appearance" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImagePayload {
    /// Use the block type's default appearance.
    #[default]
    Empty,
    /// Concrete pixel data.
    Pixels(PixelBuffer),
}

impl ImagePayload {
    /// Checks whether this is the empty sentinel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the pixel buffer, if present.
    #[must_use]
    pub const fn as_pixels(&self) -> Option<&PixelBuffer> {
        match self {
            Self::Empty => None,
            Self::Pixels(buf) => Some(buf),
        }
    }

    /// Serializes to raw RGBA bytes; the empty sentinel is zero bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Empty => Vec::new(),
            Self::Pixels(buf) => buf.to_bytes(),
        }
    }
}

impl From<PixelBuffer> for ImagePayload {
    fn from(buf: PixelBuffer) -> Self {
        Self::Pixels(buf)
    }
}
