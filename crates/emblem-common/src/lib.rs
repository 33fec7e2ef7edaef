//! # Emblem Common
//!
//! Common types and shared abstractions for the Emblem engine.
//!
//! This crate provides foundational types used across all Emblem subsystems:
//! - ID types (ObjectId, PeerId)
//! - Shared payload validation errors
//! - Engine version information for cache keying

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
