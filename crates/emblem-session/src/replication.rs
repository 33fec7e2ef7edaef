//! Wire codec and propagation rules.
//!
//! The wire payload is base64 of the raw RGBA bytes. The current format
//! carries no dimensions (they are fixed by the block kind); the oldest
//! format variant carried explicit width and height, and such payloads are
//! resized to canonical on decode. Decode failures reject the update
//! without mutating any state.

use crate::config::{Role, SessionPolicy};
use crate::error::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use emblem_atlas::{resize, BlockTypeSpec, ImagePayload, PixelBuffer};
use emblem_common::{ObjectId, PeerId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One replicated appearance update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Target object.
    pub object: ObjectId,
    /// Base64 of the raw RGBA payload; empty for the default appearance.
    pub payload: String,
    /// Explicit dimensions, present only in the legacy format variant.
    pub dimensions: Option<(u32, u32)>,
}

/// Encodes a payload in the current wire format.
#[must_use]
pub fn encode(object: ObjectId, payload: &ImagePayload) -> WireMessage {
    WireMessage {
        object,
        payload: BASE64.encode(payload.to_bytes()),
        dimensions: None,
    }
}

/// Encodes a payload in the legacy format with explicit dimensions.
#[must_use]
pub fn encode_legacy(object: ObjectId, payload: &ImagePayload) -> WireMessage {
    let dimensions = payload.as_pixels().map(|buf| (buf.width(), buf.height()));
    WireMessage {
        object,
        payload: BASE64.encode(payload.to_bytes()),
        dimensions,
    }
}

/// Decodes a wire message against the target kind's layout spec.
///
/// Current-format payloads must match the canonical length exactly; legacy
/// payloads are validated against their carried dimensions and then
/// resized to canonical. Any mismatch is an error and the caller must
/// drop the update.
pub fn decode(msg: &WireMessage, spec: &BlockTypeSpec) -> Result<ImagePayload> {
    let bytes = BASE64.decode(&msg.payload)?;
    if bytes.is_empty() {
        return Ok(ImagePayload::Empty);
    }

    match msg.dimensions {
        None => {
            let buf = PixelBuffer::from_bytes(&bytes, spec.width, spec.height)?;
            Ok(ImagePayload::Pixels(buf))
        }
        Some((w, h)) => {
            let buf = PixelBuffer::from_bytes(&bytes, w, h)?;
            if (w, h) == (spec.width, spec.height) {
                Ok(ImagePayload::Pixels(buf))
            } else {
                debug!(kind = ?spec.kind, w, h, "resizing legacy wire payload to canonical");
                Ok(ImagePayload::Pixels(resize(
                    &buf,
                    spec.width,
                    spec.height,
                    false,
                    false,
                )))
            }
        }
    }
}

/// What to do with an inbound update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundAction {
    /// Discard without applying or relaying.
    Drop,
    /// Apply locally only.
    Apply,
    /// Apply locally and relay to every peer except the origin.
    ApplyAndRelay,
}

/// Decides the propagation of an inbound update under the session policy.
///
/// Hosts apply and relay unless a policy forbids it; clients apply and
/// never relay. `origin_is_host` matters only for the host's
/// `prevent_changes` policy.
#[must_use]
pub fn route_inbound(policy: &SessionPolicy, origin_is_host: bool) -> InboundAction {
    if policy.ignore_updates {
        return InboundAction::Drop;
    }
    match policy.role {
        Role::Host => {
            if policy.prevent_changes && !origin_is_host {
                InboundAction::Drop
            } else {
                InboundAction::ApplyAndRelay
            }
        }
        Role::Client => InboundAction::Apply,
    }
}

/// Transport collaborator: reliable delivery is the caller's problem, the
/// engine only chooses the direction.
pub trait Transport {
    /// Sends a self-originated update to every other peer.
    fn send_to_others(&mut self, msg: &WireMessage);

    /// Sends a self-originated update to the host for relay.
    fn send_to_host(&mut self, msg: &WireMessage);

    /// Relays an inbound update to every peer except its origin.
    fn relay_except(&mut self, origin: PeerId, msg: &WireMessage);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use emblem_atlas::{BlockKind, Rgba8};

    fn small_spec() -> BlockTypeSpec {
        BlockTypeSpec::of(BlockKind::Flag)
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let spec = small_spec();
        let payload =
            ImagePayload::Pixels(PixelBuffer::filled(spec.width, spec.height, Rgba8::rgb(4, 5, 6)));
        let msg = encode(ObjectId::new(), &payload);
        assert!(msg.dimensions.is_none());
        assert_eq!(decode(&msg, &spec).unwrap(), payload);
    }

    #[test]
    fn test_empty_payload_round_trip() {
        let spec = small_spec();
        let msg = encode(ObjectId::new(), &ImagePayload::Empty);
        assert_eq!(decode(&msg, &spec).unwrap(), ImagePayload::Empty);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let spec = small_spec();
        let msg = WireMessage {
            object: ObjectId::new(),
            payload: BASE64.encode([0u8; 16]),
            dimensions: None,
        };
        assert!(decode(&msg, &spec).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let spec = small_spec();
        let msg = WireMessage {
            object: ObjectId::new(),
            payload: "!!!not base64!!!".into(),
            dimensions: None,
        };
        assert!(matches!(decode(&msg, &spec), Err(SessionError::Base64(_))));
    }

    #[test]
    fn test_decode_legacy_resizes_to_canonical() {
        let spec = small_spec();
        let legacy = ImagePayload::Pixels(PixelBuffer::filled(10, 10, Rgba8::rgb(7, 7, 7)));
        let msg = encode_legacy(ObjectId::new(), &legacy);
        assert_eq!(msg.dimensions, Some((10, 10)));

        let decoded = decode(&msg, &spec).unwrap();
        let buf = decoded.as_pixels().unwrap();
        assert_eq!((buf.width(), buf.height()), (spec.width, spec.height));
        assert_eq!(buf.get(0, 0), Rgba8::rgb(7, 7, 7));
    }

    #[test]
    fn test_decode_legacy_dimension_mismatch_errors() {
        let spec = small_spec();
        let msg = WireMessage {
            object: ObjectId::new(),
            payload: BASE64.encode([0u8; 16]),
            dimensions: Some((3, 3)),
        };
        assert!(decode(&msg, &spec).is_err());
    }

    #[test]
    fn test_routing_host_relays() {
        let policy = SessionPolicy::host();
        assert_eq!(route_inbound(&policy, false), InboundAction::ApplyAndRelay);
    }

    #[test]
    fn test_routing_host_prevent_changes_drops_non_host() {
        let mut policy = SessionPolicy::host();
        policy.prevent_changes = true;
        assert_eq!(route_inbound(&policy, false), InboundAction::Drop);
        assert_eq!(route_inbound(&policy, true), InboundAction::ApplyAndRelay);
    }

    #[test]
    fn test_routing_ignore_updates_drops_everything() {
        let mut policy = SessionPolicy::host();
        policy.ignore_updates = true;
        assert_eq!(route_inbound(&policy, true), InboundAction::Drop);

        let policy = SessionPolicy {
            ignore_updates: true,
            ..SessionPolicy::default()
        };
        assert_eq!(route_inbound(&policy, true), InboundAction::Drop);
    }

    #[test]
    fn test_routing_client_applies_never_relays() {
        let policy = SessionPolicy::default();
        assert_eq!(route_inbound(&policy, true), InboundAction::Apply);
    }
}
