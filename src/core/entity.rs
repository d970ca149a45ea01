//! Entity identification.
//!
//! Every card instance and token on a board has a unique `EntityId`.
//! IDs are allocated by the `BoardState` that owns the instance and are
//! never reused within a trial, so an ID identifies one physical card for
//! the whole game even as it moves between zones.
//!
//! ```
//! use goldfish_engine::core::EntityId;
//!
//! let first = EntityId::FIRST;
//! assert_eq!(first.next(), EntityId(2));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance or token within one trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// First ID handed out by a fresh board.
    pub const FIRST: EntityId = EntityId(1);

    /// The ID allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
