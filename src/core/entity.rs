//! Card instance identification.
//!
//! Every physical card in a game has a unique `EntityId`. Two copies of the
//! same definition are two entities; the definition itself is identified by a
//! [`CardId`](crate::cards::CardId).
//!
//! IDs are allocated by the game's card store when decks are built and are
//! never reused while the game lives.
//!
//! ```
//! use villainous::core::EntityId;
//!
//! let goon = EntityId::new(7);
//! assert_eq!(goon.raw(), 7);
//! assert_eq!(goon.to_string(), "Entity(7)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
