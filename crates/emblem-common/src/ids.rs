//! ID types for placed objects and session peers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for object IDs.
static OBJECT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a placed customizable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Creates a new unique object ID.
    #[must_use]
    pub fn new() -> Self {
        Self(OBJECT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates an object ID from a raw value (for deserialization).
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid object ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) object ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a peer in a multiplayer session.
///
/// Assigned by the transport collaborator; the engine only compares them
/// for echo suppression and host checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(u64);

impl PeerId {
    /// Creates a peer ID from a raw transport value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_null_invalid() {
        assert!(!ObjectId::NULL.is_valid());
        assert!(ObjectId::new().is_valid());
    }

    #[test]
    fn test_object_id_from_raw_round_trip() {
        let id = ObjectId::from_raw(42);
        assert_eq!(id.raw(), 42);
    }

    #[test]
    fn test_peer_id_equality() {
        assert_eq!(PeerId::from_raw(7), PeerId::from_raw(7));
        assert_ne!(PeerId::from_raw(7), PeerId::from_raw(8));
    }
}
