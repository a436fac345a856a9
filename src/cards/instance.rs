//! Card instances - runtime card state.
//!
//! A `Card` is one physical copy. It knows its owner, its definition, where it
//! sits on the board (if anywhere) and which cards are attached to it.
//! Deck, hand and discard membership is tracked by the owning
//! [`Player`](crate::player::Player), not by the card.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardCategory, CardDefinition, CardId};
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;

/// The two halves of a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Top half: heroes and fate cards. Covers the hero-side actions.
    Hero,
    /// Bottom half: allies, items, curses.
    Ally,
}

/// Where a card sits on its owner's board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub location: usize,
    pub side: Side,
    /// Position in the side's stack. For an attachment, the parent's position.
    pub slot: usize,
    /// Attached under the card at `slot`.
    pub attached: bool,
}

/// A card instance in a game.
#[derive(Clone, Debug)]
pub struct Card {
    pub id: EntityId,

    /// The player whose decks this card belongs to.
    pub owner: PlayerId,

    pub definition: Arc<CardDefinition>,

    /// `None` while in a deck, hand or discard pile.
    pub placement: Option<Placement>,

    /// Cards attached to this one, in attachment order.
    pub attachments: SmallVec<[EntityId; 2]>,
}

impl Card {
    /// Create an unplaced card.
    pub fn new(id: EntityId, owner: PlayerId, definition: Arc<CardDefinition>) -> Self {
        Self {
            id,
            owner,
            definition,
            placement: None,
            attachments: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[must_use]
    pub fn category(&self) -> CardCategory {
        self.definition.category
    }

    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.definition.id
    }

    /// Is this card of the given category?
    #[must_use]
    pub fn is(&self, category: CardCategory) -> bool {
        self.definition.category == category
    }

    /// Location index, if the card is on the board.
    #[must_use]
    pub fn location(&self) -> Option<usize> {
        self.placement.map(|p| p.location)
    }

    /// Is this card at `location`?
    #[must_use]
    pub fn is_at(&self, location: usize) -> bool {
        self.location() == Some(location)
    }
}
