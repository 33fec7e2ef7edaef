//! # Emblem Session
//!
//! The stateful half of the Emblem engine: per-object update coordination
//! with ticket-queue mutual exclusion and rollback, the replication codec
//! and propagation rules, session policy configuration, and the versioned
//! save format.
//!
//! The rendering pipeline and the peer transport stay outside this crate,
//! behind the [`renderer::RenderTarget`] and [`replication::Transport`]
//! seams.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod renderer;
pub mod replication;
pub mod save;
pub mod state;
pub mod ticket;

mod e2e_tests;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Role, SessionPolicy};
    pub use crate::coordinator::{UpdateCoordinator, UpdateOutcome};
    pub use crate::error::{Result, SessionError};
    pub use crate::renderer::{AtlasRenderer, RenderTarget, ValidatingRenderer};
    pub use crate::replication::{
        decode, encode, encode_legacy, route_inbound, InboundAction, Transport, WireMessage,
    };
    pub use crate::save::{load, save, BlockAux, SaveRecord, CURRENT_FORMAT_VERSION};
    pub use crate::state::ObjectImageState;
    pub use crate::ticket::{Ticket, TicketQueue};
}

pub use prelude::*;
