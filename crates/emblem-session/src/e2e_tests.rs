#![cfg(test)]
#![allow(clippy::unwrap_used)]
//! End-to-end scenarios across sanitize, coordinate, replicate and save.

use crate::config::SessionPolicy;
use crate::coordinator::UpdateCoordinator;
use crate::renderer::{AtlasRenderer, ValidatingRenderer};
use crate::replication::{encode, Transport, WireMessage};
use crate::save::{load, save, BlockAux, CURRENT_FORMAT_VERSION};
use emblem_atlas::{
    preview_sprite, sanitize, BlockKind, BlockTypeSpec, ImagePayload, PixelBuffer, PreviewCache,
    Rgba8, PREVIEW_WIDTH,
};
use emblem_common::PeerId;
use std::io::Cursor;

#[derive(Default)]
struct RecordingTransport {
    to_others: Vec<WireMessage>,
    to_host: Vec<WireMessage>,
    relayed: Vec<(PeerId, WireMessage)>,
}

impl Transport for RecordingTransport {
    fn send_to_others(&mut self, msg: &WireMessage) {
        self.to_others.push(msg.clone());
    }
    fn send_to_host(&mut self, msg: &WireMessage) {
        self.to_host.push(msg.clone());
    }
    fn relay_except(&mut self, origin: PeerId, msg: &WireMessage) {
        self.relayed.push((origin, msg.clone()));
    }
}

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_poster_submission_replication_and_reload() {
    let spec = BlockTypeSpec::of(BlockKind::PosterH16x9);

    // A user submits a 1920x1080 opaque-red PNG for a 16:9 poster.
    let payload = sanitize(&png_bytes(1920, 1080, [255, 0, 0, 255]), &spec);
    let canonical = payload.as_pixels().unwrap().clone();
    assert_eq!((canonical.width(), canonical.height()), (960, 540));
    assert_eq!(canonical.get(100, 100), Rgba8::rgb(255, 0, 0));

    // Apply it on the host, broadcasting to the session.
    let policy = SessionPolicy::host();
    let mut host = UpdateCoordinator::new();
    let id = host.create_object(BlockKind::PosterH16x9, true);
    let mut renderer = AtlasRenderer::new();
    let mut transport = RecordingTransport::default();

    host.request_update(id, payload, true).unwrap();
    let outcomes = host.pump(&mut renderer, &mut transport, &policy);
    assert!(outcomes[0].committed);
    assert_eq!(transport.to_others.len(), 1);

    // The poster got a dedicated surface, not an atlas slot.
    let surface = renderer.surface(id).unwrap();
    assert_eq!(surface.texture.get(10, 10), Rgba8::rgb(255, 0, 0));
    assert!(!surface.mesh.vertices.is_empty());

    // Persist and reload on a fresh session.
    let record = save(host.state(id).unwrap(), BlockAux::None);
    assert_eq!(record.format_version, CURRENT_FORMAT_VERSION);

    let reloaded = load(&record, &spec);
    let mut fresh = UpdateCoordinator::new();
    fresh.adopt_object(id, BlockKind::PosterH16x9, true);
    fresh.request_update(id, reloaded, false).unwrap();
    let mut fresh_renderer = AtlasRenderer::new();
    let mut quiet = RecordingTransport::default();
    fresh.pump(&mut fresh_renderer, &mut quiet, &SessionPolicy::default());

    // Nothing was re-broadcast at load time, and the appearance matches.
    assert!(quiet.to_host.is_empty());
    assert_eq!(
        fresh.current(id),
        Some(&ImagePayload::Pixels(canonical.clone()))
    );
    assert_eq!(fresh_renderer.surface(id).unwrap().texture, canonical);
}

#[test]
fn test_competing_updates_resolve_by_arrival_order() {
    let spec = BlockTypeSpec::of(BlockKind::CurtainH);
    let green = ImagePayload::Pixels(PixelBuffer::filled(
        spec.width,
        spec.height,
        Rgba8::rgb(0, 200, 0),
    ));
    let blue = ImagePayload::Pixels(PixelBuffer::filled(
        spec.width,
        spec.height,
        Rgba8::rgb(0, 0, 200),
    ));

    let policy = SessionPolicy::host();
    let mut host = UpdateCoordinator::new();
    let id = host.create_object(BlockKind::CurtainH, true);

    // A stale network echo of the older green state arrives first, then the
    // user picks blue in the editor before either has been applied.
    let echo = encode(id, &green);
    host.request_inbound(&echo, PeerId::from_raw(3), false, &policy)
        .unwrap();
    host.request_update(id, blue.clone(), true).unwrap();

    let mut renderer = AtlasRenderer::new();
    let mut transport = RecordingTransport::default();
    let outcomes = host.pump(&mut renderer, &mut transport, &policy);

    // Both applied, in arrival order, so blue wins.
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.committed));
    assert_eq!(host.current(id), Some(&blue));

    // The echo was relayed (excluding its origin) and the edit broadcast.
    assert_eq!(transport.relayed.len(), 1);
    assert_eq!(transport.relayed[0].0, PeerId::from_raw(3));
    assert_eq!(transport.to_others.len(), 1);
}

#[test]
fn test_dedicated_server_pipeline_without_pixels() {
    let spec = BlockTypeSpec::of(BlockKind::Sail);
    let payload = ImagePayload::Pixels(PixelBuffer::filled(
        spec.width,
        spec.height,
        Rgba8::rgb(128, 128, 128),
    ));

    let policy = SessionPolicy::host();
    let mut server = UpdateCoordinator::new();
    let id = server.create_object(BlockKind::Sail, true);
    let mut renderer = ValidatingRenderer;
    let mut transport = RecordingTransport::default();

    // An inbound client update passes length validation and is relayed
    // even though the server never composites a texture.
    let msg = encode(id, &payload);
    server
        .request_inbound(&msg, PeerId::from_raw(9), false, &policy)
        .unwrap();
    let outcomes = server.pump(&mut renderer, &mut transport, &policy);

    assert!(outcomes[0].committed);
    assert_eq!(transport.relayed.len(), 1);
    assert_eq!(server.current(id), Some(&payload));

    // Sail aux state survives save/load bit-exactly alongside the pixels.
    let record = save(server.state(id).unwrap(), BlockAux::SailRotation(42.5));
    assert_eq!(BlockAux::rotation_from(record.aux), 42.5);
    assert_eq!(load(&record, &spec), payload);
}

#[test]
fn test_preview_cache_integrates_with_sanitize() {
    let spec = BlockTypeSpec::of(BlockKind::RugSmall);
    let payload = sanitize(&png_bytes(640, 480, [10, 20, 200, 255]), &spec);
    let sprite = preview_sprite(payload.as_pixels().unwrap());
    assert_eq!(sprite.width(), PREVIEW_WIDTH);

    let dir = tempfile::tempdir().unwrap();
    let cache = PreviewCache::open(dir.path()).unwrap();
    cache.store("rug_small", &sprite).unwrap();
    assert_eq!(cache.load("rug_small").unwrap(), sprite);
    assert_eq!(cache.sweep_stale().unwrap(), 0);
}
