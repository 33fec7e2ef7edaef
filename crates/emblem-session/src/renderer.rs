//! Rendering collaborator seam.
//!
//! The coordinator hands committed payloads to a [`RenderTarget`]; real
//! consumers wrap their GPU pipeline, tests use recording or failing
//! implementations, and dedicated servers use [`ValidatingRenderer`] to
//! skip pixel work entirely.

use emblem_atlas::{
    place_into_atlas, BlockKind, BlockTypeSpec, ImagePayload, Placed, PixelBuffer, PosterSurface,
    ATLAS_HEIGHT, ATLAS_WIDTH,
};
use emblem_common::{validate_payload_len, ObjectId};

/// Applies a committed payload to an object's visible appearance.
pub trait RenderTarget {
    /// Uploads the payload for `object`. An `Err` makes the coordinator
    /// roll the object back to its previous payload.
    fn apply(
        &mut self,
        object: ObjectId,
        kind: BlockKind,
        payload: &ImagePayload,
    ) -> Result<(), String>;
}

/// Dedicated-server renderer: validates payload lengths, keeps no pixels.
#[derive(Debug, Default)]
pub struct ValidatingRenderer;

impl RenderTarget for ValidatingRenderer {
    fn apply(
        &mut self,
        _object: ObjectId,
        kind: BlockKind,
        payload: &ImagePayload,
    ) -> Result<(), String> {
        if let ImagePayload::Pixels(buf) = payload {
            let spec = BlockTypeSpec::of(kind);
            validate_payload_len(buf.byte_len(), spec.width, spec.height)
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

/// In-process renderer holding every object's appearance.
///
/// Each object owns its textures exclusively: fixed-offset and split kinds
/// composite into a per-object atlas page, parametric kinds keep a
/// dedicated [`PosterSurface`]. The empty payload reverts the object to
/// its default appearance.
#[derive(Debug, Default)]
pub struct AtlasRenderer {
    textures: ahash::AHashMap<ObjectId, PixelBuffer>,
    surfaces: ahash::AHashMap<ObjectId, PosterSurface>,
}

impl AtlasRenderer {
    /// Creates an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The atlas page for an atlas-kind object, if one was composited.
    #[must_use]
    pub fn texture(&self, object: ObjectId) -> Option<&PixelBuffer> {
        self.textures.get(&object)
    }

    /// The dedicated surface for a parametric object, if one was built.
    #[must_use]
    pub fn surface(&self, object: ObjectId) -> Option<&PosterSurface> {
        self.surfaces.get(&object)
    }

    /// Drops the textures of a destroyed object.
    pub fn forget(&mut self, object: ObjectId) {
        self.textures.remove(&object);
        self.surfaces.remove(&object);
    }
}

impl RenderTarget for AtlasRenderer {
    fn apply(
        &mut self,
        object: ObjectId,
        kind: BlockKind,
        payload: &ImagePayload,
    ) -> Result<(), String> {
        let ImagePayload::Pixels(buf) = payload else {
            // Default appearance: the object's custom textures are gone.
            self.forget(object);
            return Ok(());
        };

        let spec = BlockTypeSpec::of(kind);
        let placed = if spec.is_parametric() {
            // Parametric placement never writes the page.
            let mut scratch = PixelBuffer::new(0, 0);
            place_into_atlas(&mut scratch, buf, &spec)
        } else {
            let page = self
                .textures
                .entry(object)
                .or_insert_with(|| PixelBuffer::new(ATLAS_WIDTH, ATLAS_HEIGHT));
            place_into_atlas(page, buf, &spec)
        }
        .map_err(|e| e.to_string())?;

        if let Placed::Surface(surface) = placed {
            // Replace only once the new surface is fully built.
            self.surfaces.insert(object, surface);
        }
        Ok(())
    }
}
