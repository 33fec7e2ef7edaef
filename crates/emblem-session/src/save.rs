//! Versioned save records.
//!
//! A persisted object carries its payload as base64 plus a format-version
//! tag. Version 0 is an abandoned format whose image bytes are no longer
//! recoverable; version 1 stored poster payloads at double the canonical
//! resolution; version 2 is the current canonical raw-pixel format. Saving
//! always writes version 2. Loading never fails: anything unusable
//! degrades to the default appearance.

use crate::state::ObjectImageState;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use emblem_atlas::{BlockTypeSpec, ImagePayload, PixelBuffer, Rgba8};
use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing::{debug, info};

/// The format version written by [`save`].
pub const CURRENT_FORMAT_VERSION: u8 = 2;

/// One persisted object appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Payload format version.
    pub format_version: u8,
    /// Base64 of the raw RGBA payload; empty for the default appearance.
    pub payload: String,
    /// Block-specific auxiliary data; see [`BlockAux`] for the aliasing.
    pub aux: u32,
}

/// Block-specific auxiliary state packed into the record's integer field.
///
/// The aliasing is part of the on-disk format: sails store their rotation
/// as raw IEEE-754 bits, openable blocks store a state index. It must be
/// preserved bit-exactly for old files to keep loading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockAux {
    /// No auxiliary state.
    None,
    /// Sail rotation in degrees.
    SailRotation(f32),
    /// Open-state index of an openable block.
    OpenIndex(i32),
}

impl BlockAux {
    /// Packs the auxiliary state into the record field.
    #[must_use]
    pub fn pack(self) -> u32 {
        match self {
            Self::None => 0,
            Self::SailRotation(rotation) => rotation.to_bits(),
            Self::OpenIndex(index) => index as u32,
        }
    }

    /// Reinterprets a record field as a sail rotation.
    #[must_use]
    pub fn rotation_from(aux: u32) -> f32 {
        f32::from_bits(aux)
    }

    /// Reinterprets a record field as an open-state index.
    #[must_use]
    pub const fn open_index_from(aux: u32) -> i32 {
        aux as i32
    }
}

/// Serializes an object's current payload as a current-format record.
#[must_use]
pub fn save(state: &ObjectImageState, aux: BlockAux) -> SaveRecord {
    SaveRecord {
        format_version: CURRENT_FORMAT_VERSION,
        payload: BASE64.encode(state.current.to_bytes()),
        aux: aux.pack(),
    }
}

static LEGACY_NOTE: Once = Once::new();

/// Maps a persisted record to a current-format payload, applying legacy
/// fix-ups. Unusable records resolve to the default appearance.
#[must_use]
pub fn load(record: &SaveRecord, spec: &BlockTypeSpec) -> ImagePayload {
    if record.format_version == 0 {
        // Permanent data loss, not an error; note it once per process.
        LEGACY_NOTE.call_once(|| {
            info!("version 0 save payloads are only recoverable by an older engine; using defaults");
        });
        return ImagePayload::Empty;
    }

    let bytes = match BASE64.decode(&record.payload) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(kind = ?spec.kind, error = %err, "save payload is not valid base64");
            return ImagePayload::Empty;
        }
    };
    if bytes.is_empty() {
        return ImagePayload::Empty;
    }

    match record.format_version {
        1 if spec.is_parametric() => {
            match PixelBuffer::from_bytes(&bytes, spec.width * 2, spec.height * 2) {
                Ok(doubled) => ImagePayload::Pixels(fix_poster(&doubled)),
                Err(err) => {
                    debug!(kind = ?spec.kind, error = %err, "bad version 1 poster payload");
                    ImagePayload::Empty
                }
            }
        }
        1 | 2 => match PixelBuffer::from_bytes(&bytes, spec.width, spec.height) {
            Ok(buf) => ImagePayload::Pixels(buf),
            Err(err) => {
                debug!(kind = ?spec.kind, error = %err, "bad save payload");
                ImagePayload::Empty
            }
        },
        version => {
            debug!(kind = ?spec.kind, version, "unknown save format version");
            ImagePayload::Empty
        }
    }
}

/// Downsamples a double-resolution poster payload by an exact 2x2 box
/// reduction.
#[must_use]
pub fn fix_poster(doubled: &PixelBuffer) -> PixelBuffer {
    let width = doubled.width() / 2;
    let height = doubled.height() / 2;
    let mut out = PixelBuffer::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let quad = [
                doubled.get(2 * x, 2 * y),
                doubled.get(2 * x + 1, 2 * y),
                doubled.get(2 * x, 2 * y + 1),
                doubled.get(2 * x + 1, 2 * y + 1),
            ];
            let avg = |f: fn(Rgba8) -> u8| -> u8 {
                let sum: u16 = quad.iter().map(|&p| u16::from(f(p))).sum();
                ((sum + 2) / 4) as u8
            };
            out.set(
                x,
                y,
                Rgba8::new(avg(|p| p.r), avg(|p| p.g), avg(|p| p.b), avg(|p| p.a)),
            );
        }
    }
    out
}
