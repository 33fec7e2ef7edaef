//! Per-object update coordination.
//!
//! The coordinator owns every object's image state and serializes updates
//! through each object's ticket queue. Requests are enqueued in arrival
//! order and drained by [`UpdateCoordinator::pump`] on the engine's single
//! logical thread: snapshot, apply through the rendering collaborator,
//! then commit (broadcast and rebuild the preview) or roll back. Updates
//! to different objects are independent; no ordering is guaranteed across
//! objects.

use crate::config::{Role, SessionPolicy};
use crate::error::{Result, SessionError};
use crate::renderer::RenderTarget;
use crate::replication::{decode, encode, route_inbound, InboundAction, Transport, WireMessage};
use crate::state::ObjectImageState;
use crate::ticket::Ticket;
use emblem_atlas::{preview_sprite, BlockKind, BlockTypeSpec, ImagePayload};
use emblem_common::{ObjectId, PeerId};
use std::collections::VecDeque;
use tracing::debug;

/// One queued update, holding its lock ticket until it is pumped.
#[derive(Debug)]
struct PendingUpdate {
    ticket: Ticket,
    payload: ImagePayload,
    broadcast: bool,
    origin: Option<PeerId>,
}

#[derive(Debug)]
struct ObjectEntry {
    kind: BlockKind,
    state: ObjectImageState,
    pending: VecDeque<PendingUpdate>,
}

/// Result of one pumped update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The object the update targeted.
    pub object: ObjectId,
    /// The ticket the request held.
    pub ticket: Ticket,
    /// Whether the update committed (`false` means rolled back).
    pub committed: bool,
}

/// Registry of per-object image state plus the update state machine.
#[derive(Debug, Default)]
pub struct UpdateCoordinator {
    objects: ahash::AHashMap<ObjectId, ObjectEntry>,
}

impl UpdateCoordinator {
    /// Creates an empty coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly placed object with the default appearance.
    pub fn create_object(&mut self, kind: BlockKind, send_updates: bool) -> ObjectId {
        let id = ObjectId::new();
        self.adopt_object(id, kind, send_updates);
        id
    }

    /// Registers an object under a caller-chosen ID, e.g. one assigned by
    /// the save file or the session.
    pub fn adopt_object(&mut self, id: ObjectId, kind: BlockKind, send_updates: bool) {
        self.objects.insert(
            id,
            ObjectEntry {
                kind,
                state: ObjectImageState::new(send_updates),
                pending: VecDeque::new(),
            },
        );
    }

    /// Removes an object. Updates still waiting on its ticket queue are
    /// cancelled and will never touch any other object's state.
    pub fn destroy_object(&mut self, id: ObjectId) -> bool {
        match self.objects.remove(&id) {
            Some(entry) => {
                if !entry.pending.is_empty() {
                    debug!(object = id.raw(), cancelled = entry.pending.len(),
                        "object destroyed with updates still queued");
                }
                true
            }
            None => false,
        }
    }

    /// The block kind of a registered object.
    #[must_use]
    pub fn kind_of(&self, id: ObjectId) -> Option<BlockKind> {
        self.objects.get(&id).map(|e| e.kind)
    }

    /// Read access to an object's image state.
    #[must_use]
    pub fn state(&self, id: ObjectId) -> Option<&ObjectImageState> {
        self.objects.get(&id).map(|e| &e.state)
    }

    /// The latest successfully applied payload for an object.
    #[must_use]
    pub fn current(&self, id: ObjectId) -> Option<&ImagePayload> {
        self.state(id).map(|s| &s.current)
    }

    /// Number of updates waiting across all objects.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.objects.values().map(|e| e.pending.len()).sum()
    }

    /// Enqueues a local update for an object. The returned ticket holds the
    /// object's FIFO slot until the request is pumped.
    pub fn request_update(
        &mut self,
        id: ObjectId,
        payload: ImagePayload,
        broadcast: bool,
    ) -> Result<Ticket> {
        self.enqueue(id, payload, broadcast, None)
    }

    /// Decodes an inbound wire message and enqueues it according to the
    /// session policy. Returns `None` when policy drops the update. A
    /// decode failure rejects the update without mutating any state.
    pub fn request_inbound(
        &mut self,
        msg: &WireMessage,
        origin: PeerId,
        origin_is_host: bool,
        policy: &SessionPolicy,
    ) -> Result<Option<Ticket>> {
        let kind = self
            .kind_of(msg.object)
            .ok_or(SessionError::UnknownObject(msg.object))?;
        let payload = decode(msg, &BlockTypeSpec::of(kind))?;

        match route_inbound(policy, origin_is_host) {
            InboundAction::Drop => {
                debug!(object = msg.object.raw(), "inbound update dropped by policy");
                Ok(None)
            }
            InboundAction::Apply => {
                Ok(Some(self.enqueue(msg.object, payload, false, Some(origin))?))
            }
            InboundAction::ApplyAndRelay => {
                Ok(Some(self.enqueue(msg.object, payload, true, Some(origin))?))
            }
        }
    }

    fn enqueue(
        &mut self,
        id: ObjectId,
        payload: ImagePayload,
        broadcast: bool,
        origin: Option<PeerId>,
    ) -> Result<Ticket> {
        let entry = self
            .objects
            .get_mut(&id)
            .ok_or(SessionError::UnknownObject(id))?;
        let ticket = entry.state.lock.acquire();
        entry.pending.push_back(PendingUpdate {
            ticket,
            payload,
            broadcast,
            origin,
        });
        Ok(ticket)
    }

    /// Drains every queued update in FIFO order per object, applying each
    /// through `renderer` and propagating commits through `transport`.
    pub fn pump(
        &mut self,
        renderer: &mut dyn RenderTarget,
        transport: &mut dyn Transport,
        policy: &SessionPolicy,
    ) -> Vec<UpdateOutcome> {
        let mut ids: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, e)| !e.pending.is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();

        let mut outcomes = Vec::new();
        for id in ids {
            // The object may have been destroyed since the scan.
            while let Some(entry) = self.objects.get_mut(&id) {
                let Some(request) = entry.pending.pop_front() else {
                    break;
                };
                outcomes.push(Self::apply_one(id, entry, request, renderer, transport, policy));
            }
        }
        outcomes
    }

    fn apply_one(
        id: ObjectId,
        entry: &mut ObjectEntry,
        request: PendingUpdate,
        renderer: &mut dyn RenderTarget,
        transport: &mut dyn Transport,
        policy: &SessionPolicy,
    ) -> UpdateOutcome {
        debug_assert!(entry.state.lock.is_head(request.ticket));

        entry.state.previous = entry.state.current.clone();
        entry.state.current = request.payload;

        let committed = match renderer.apply(id, entry.kind, &entry.state.current) {
            Ok(()) => {
                if request.broadcast && entry.state.send_updates {
                    let msg = encode(id, &entry.state.current);
                    match request.origin {
                        None => match policy.role {
                            Role::Host => transport.send_to_others(&msg),
                            Role::Client => transport.send_to_host(&msg),
                        },
                        Some(origin) => {
                            if policy.role == Role::Host {
                                transport.relay_except(origin, &msg);
                            }
                        }
                    }
                }
                entry.state.preview = entry.state.current.as_pixels().map(preview_sprite);
                true
            }
            Err(err) => {
                debug!(object = id.raw(), error = %err, "update failed, rolling back");
                entry.state.current = entry.state.previous.clone();
                false
            }
        };

        entry.state.lock.release(request.ticket);
        UpdateOutcome {
            object: id,
            ticket: request.ticket,
            committed,
        }
    }
}
