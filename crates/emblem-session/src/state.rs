//! Per-object image state.

use crate::ticket::TicketQueue;
use emblem_atlas::{ImagePayload, PixelBuffer};

/// Mutable appearance state for one placed customizable object.
///
/// Owned by the coordinator and mutated only while the object's ticket
/// lock is held; `previous` is the rollback snapshot taken at the start of
/// every update.
#[derive(Debug, Default)]
pub struct ObjectImageState {
    /// Latest successfully applied payload.
    pub current: ImagePayload,
    /// Snapshot of `current` before the in-flight update.
    pub previous: ImagePayload,
    /// Whether committed local updates are sent to the session.
    pub send_updates: bool,
    /// FIFO lock serializing updates to this object.
    pub lock: TicketQueue,
    /// Editor thumbnail of the current payload, if one has been built.
    pub preview: Option<PixelBuffer>,
}

impl ObjectImageState {
    /// Creates a default-appearance state.
    #[must_use]
    pub fn new(send_updates: bool) -> Self {
        Self {
            send_updates,
            ..Self::default()
        }
    }
}
