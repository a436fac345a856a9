//! Player identification.
//!
//! A `PlayerId` is the opaque handle the collaborator (transport, session
//! layer) uses for a participant. It is stable for the whole life of a table:
//! seat order is shuffled when the game starts and seats shift when someone
//! leaves, but the id never changes. Use [`Game::seat_of`] to find the current
//! seat of a player.
//!
//! [`Game::seat_of`]: crate::game::Game::seat_of

use serde::{Deserialize, Serialize};

/// Opaque participant identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw handle.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_display() {
        assert_eq!(PlayerId::new(3).to_string(), "Player 3");
    }

    #[test]
    fn test_player_serde() {
        let id = PlayerId::new(9);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "9");
        let back: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
