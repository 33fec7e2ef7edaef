//! Per-block-kind layout configuration and atlas placement.
//!
//! Each customizable block kind declares a canonical payload size and a
//! placement rule: a fixed offset into the block atlas layout, a set of
//! split regions (cut, rotate, place), or a parametric poster surface that
//! owns a dedicated texture and mesh. The tables are process-wide
//! immutable configuration; the atlas page they map into belongs to one
//! object.

use crate::compositor::{cut, extend_border, overlay, resize, rotate, Rotation};
use crate::error::Result;
use crate::pixel::PixelBuffer;
use crate::poster::{PosterSpec, PosterSurface};
use emblem_common::validate_payload_len;
use serde::{Deserialize, Serialize};

/// Width of a block atlas page.
pub const ATLAS_WIDTH: u32 = 1024;
/// Height of a block atlas page.
pub const ATLAS_HEIGHT: u32 = 1024;

/// Enumerated kind of customizable block surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum BlockKind {
    Bed,
    CurtainH,
    CurtainV,
    Flag,
    RugBig,
    RugSmall,
    Sail,
    PosterH16x9,
    PosterV9x16,
    PosterH5x3,
    PosterV3x5,
    PosterH4x3,
    PosterV3x4,
    PosterH3x2,
    PosterV2x3,
    PosterH2x1,
    PosterV1x2,
    Poster1x1,
}

impl BlockKind {
    /// Every supported block kind, for table iteration.
    pub const ALL: [Self; 18] = [
        Self::Bed,
        Self::CurtainH,
        Self::CurtainV,
        Self::Flag,
        Self::RugBig,
        Self::RugSmall,
        Self::Sail,
        Self::PosterH16x9,
        Self::PosterV9x16,
        Self::PosterH5x3,
        Self::PosterV3x5,
        Self::PosterH4x3,
        Self::PosterV3x4,
        Self::PosterH3x2,
        Self::PosterV2x3,
        Self::PosterH2x1,
        Self::PosterV1x2,
        Self::Poster1x1,
    ];
}

/// One cut-rotate-place rule for a split-image block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRegion {
    /// Source rectangle x offset in the payload.
    pub src_x: u32,
    /// Source rectangle y offset in the payload.
    pub src_y: u32,
    /// Source rectangle width.
    pub width: u32,
    /// Source rectangle height.
    pub height: u32,
    /// Destination x offset in the atlas.
    pub dest_x: u32,
    /// Destination y offset in the atlas.
    pub dest_y: u32,
    /// Rotation applied before placement.
    pub rotation: Rotation,
}

impl SplitRegion {
    /// Destination rectangle dimensions after rotation. Quarter turns swap
    /// width and height.
    #[must_use]
    pub const fn rotated_size(&self) -> (u32, u32) {
        match self.rotation {
            Rotation::None | Rotation::Flip180 => (self.width, self.height),
            Rotation::Left90 | Rotation::Right90 => (self.height, self.width),
        }
    }
}

/// How a block kind's payload reaches the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// One overlay at a fixed atlas offset.
    FixedOffset {
        /// Atlas x offset.
        x: u32,
        /// Atlas y offset.
        y: u32,
    },
    /// Cut the payload into pieces, rotate each and place them at disjoint
    /// atlas rectangles.
    SplitRegions(Vec<SplitRegion>),
    /// The payload owns a dedicated texture and parametric mesh; nothing is
    /// written to the atlas page.
    Parametric(PosterSpec),
}

/// Immutable layout configuration for one block kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTypeSpec {
    /// The block kind this spec describes.
    pub kind: BlockKind,
    /// Canonical payload width in pixels.
    pub width: u32,
    /// Canonical payload height in pixels.
    pub height: u32,
    /// Placement rule.
    pub placement: Placement,
    /// Reflect the horizontal sampling coordinate during placement.
    pub mirror_x: bool,
    /// Reflect the vertical sampling coordinate during placement.
    pub mirror_y: bool,
}

impl BlockTypeSpec {
    /// Returns the layout spec for a block kind.
    #[must_use]
    pub fn of(kind: BlockKind) -> Self {
        let (width, height) = match kind {
            BlockKind::Bed => (959, 682),
            BlockKind::CurtainH => (612, 706),
            BlockKind::CurtainV => (525, 496),
            BlockKind::Flag => (377, 252),
            BlockKind::RugBig => (627, 330),
            BlockKind::RugSmall => (385, 253),
            BlockKind::Sail => (794, 674),
            BlockKind::PosterH16x9 => (960, 540),
            BlockKind::PosterV9x16 => (540, 960),
            BlockKind::PosterH5x3 => (900, 540),
            BlockKind::PosterV3x5 => (540, 900),
            BlockKind::PosterH4x3 => (720, 540),
            BlockKind::PosterV3x4 => (540, 720),
            BlockKind::PosterH3x2 => (810, 540),
            BlockKind::PosterV2x3 => (540, 810),
            BlockKind::PosterH2x1 => (1080, 540),
            BlockKind::PosterV1x2 => (540, 1080),
            BlockKind::Poster1x1 => (540, 540),
        };

        let placement = match kind {
            BlockKind::Bed => Placement::FixedOffset { x: 5, y: 5 },
            BlockKind::CurtainV => Placement::FixedOffset { x: 3, y: 3 },
            BlockKind::Flag => Placement::FixedOffset { x: 256, y: 770 },
            BlockKind::RugBig => Placement::FixedOffset { x: 7, y: 7 },
            BlockKind::RugSmall => Placement::FixedOffset { x: 632, y: 712 },
            BlockKind::Sail => Placement::FixedOffset { x: 3, y: 132 },
            BlockKind::CurtainH => Placement::SplitRegions(vec![
                SplitRegion {
                    src_x: 0,
                    src_y: 0,
                    width: 307,
                    height: 706,
                    dest_x: 3,
                    dest_y: 505,
                    rotation: Rotation::Left90,
                },
                SplitRegion {
                    src_x: 307,
                    src_y: 0,
                    width: 305,
                    height: 706,
                    dest_x: 715,
                    dest_y: 106,
                    rotation: Rotation::Flip180,
                },
            ]),
            BlockKind::PosterH16x9 => Placement::Parametric(PosterSpec::new(960, 540, 2.0, -0.036)),
            BlockKind::PosterV9x16 => Placement::Parametric(PosterSpec::new(540, 960, 1.125, 0.4)),
            BlockKind::PosterH5x3 => Placement::Parametric(PosterSpec::new(900, 540, 1.5, -0.15)),
            BlockKind::PosterV3x5 => Placement::Parametric(PosterSpec::new(540, 900, 1.125, 0.34)),
            BlockKind::PosterH4x3 => Placement::Parametric(PosterSpec::new(720, 540, 1.5, -0.036)),
            BlockKind::PosterV3x4 => Placement::Parametric(PosterSpec::new(540, 720, 1.125, 0.15)),
            BlockKind::PosterH3x2 => {
                Placement::Parametric(PosterSpec::new(810, 540, 1.6875, -0.036))
            }
            BlockKind::PosterV2x3 => Placement::Parametric(PosterSpec::new(540, 810, 1.125, 0.245)),
            BlockKind::PosterH2x1 => Placement::Parametric(PosterSpec::new(1080, 540, 2.25, -0.036)),
            BlockKind::PosterV1x2 => Placement::Parametric(PosterSpec::new(540, 1080, 1.125, 0.525)),
            BlockKind::Poster1x1 => Placement::Parametric(PosterSpec::new(540, 540, 1.125, -0.036)),
        };

        let (mirror_x, mirror_y) = match kind {
            BlockKind::Bed => (true, true),
            BlockKind::Sail => (true, false),
            _ => (false, false),
        };

        Self {
            kind,
            width,
            height,
            placement,
            mirror_x,
            mirror_y,
        }
    }

    /// The only legal non-zero payload byte length for this kind.
    #[must_use]
    pub const fn payload_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Whether this kind owns a dedicated poster surface instead of a
    /// shared-atlas region.
    #[must_use]
    pub const fn is_parametric(&self) -> bool {
        matches!(self.placement, Placement::Parametric(_))
    }
}

/// Outcome of placing a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Placed {
    /// The payload was composited into the atlas page.
    Atlas,
    /// The kind is parametric; a dedicated surface was built instead.
    Surface(PosterSurface),
}

/// Composites a canonical payload into an atlas page (or builds a poster
/// surface for parametric kinds) according to the kind's placement rule.
///
/// The payload must be exactly `spec.payload_len()` bytes of pixels; the
/// length is validated here so the compositor itself can stay total.
pub fn place_into_atlas(
    dest: &mut PixelBuffer,
    payload: &PixelBuffer,
    spec: &BlockTypeSpec,
) -> Result<Placed> {
    validate_payload_len(payload.byte_len(), spec.width, spec.height)?;

    match &spec.placement {
        Placement::FixedOffset { x, y } => {
            overlay(
                dest,
                payload,
                *x,
                *y,
                spec.width,
                spec.height,
                spec.mirror_x,
                spec.mirror_y,
            )?;
            extend_border(dest, *x, *y, spec.width, spec.height);
            Ok(Placed::Atlas)
        }
        Placement::SplitRegions(regions) => {
            for region in regions {
                let piece = cut(payload, region.src_x, region.src_y, region.width, region.height)?;
                let piece = rotate(&piece, region.rotation);
                let (w, h) = region.rotated_size();
                overlay(dest, &piece, region.dest_x, region.dest_y, w, h, false, false)?;
                extend_border(dest, region.dest_x, region.dest_y, w, h);
            }
            Ok(Placed::Atlas)
        }
        Placement::Parametric(poster) => {
            let texture = resize(payload, spec.width, spec.height, spec.mirror_x, spec.mirror_y);
            Ok(Placed::Surface(poster.build_surface(texture)))
        }
    }
}
