//! # Emblem Atlas
//!
//! Pixel-level core of the Emblem engine: raw RGBA buffers, the pure
//! compositing algorithms (resize, overlay, cut, rotate, border extension),
//! the per-block-kind atlas layout tables, parametric poster surfaces,
//! image sanitization, preview thumbnails and the on-disk preview cache.
//!
//! Everything in this crate is deterministic and free of engine state;
//! the session layer drives it through [`layout::place_into_atlas`] and
//! [`sanitize::sanitize`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cache;
pub mod compositor;
pub mod error;
pub mod layout;
pub mod pixel;
pub mod poster;
pub mod preview;
pub mod sanitize;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::PreviewCache;
    pub use crate::compositor::{
        cut, extend_border, overlay, overlay_blended, resize, rotate, scale_to_fit, Rotation,
    };
    pub use crate::error::{AtlasError, Result};
    pub use crate::layout::{
        place_into_atlas, BlockKind, BlockTypeSpec, Placed, Placement, SplitRegion, ATLAS_HEIGHT,
        ATLAS_WIDTH,
    };
    pub use crate::pixel::{ImagePayload, PixelBuffer, Rgba8};
    pub use crate::poster::{PosterMesh, PosterSpec, PosterSurface};
    pub use crate::preview::{preview_sprite, PREVIEW_HEIGHT, PREVIEW_WIDTH};
    pub use crate::sanitize::sanitize;
}

pub use prelude::*;
