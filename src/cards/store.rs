//! Card instance storage.
//!
//! Every card of a game lives in one `CardStore`, keyed by `EntityId`. Zones
//! (decks, hand, location stacks) only hold ids.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::CardDefinition;
use super::instance::Card;
use crate::core::{EntityId, GameError, PlayerId};

/// All card instances of a game.
#[derive(Clone, Debug, Default)]
pub struct CardStore {
    cards: FxHashMap<EntityId, Card>,
    next_id: u32,
}

impl CardStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new card instance and return its id.
    pub fn create(&mut self, owner: PlayerId, definition: Arc<CardDefinition>) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.cards.insert(id, Card::new(id, owner, definition));
        id
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    /// Look up a card, failing with `UnknownCard`.
    pub fn card(&self, id: EntityId) -> Result<&Card, GameError> {
        self.cards.get(&id).ok_or(GameError::UnknownCard(id))
    }

    /// Look up a card mutably, failing with `UnknownCard`.
    pub fn card_mut(&mut self, id: EntityId) -> Result<&mut Card, GameError> {
        self.cards.get_mut(&id).ok_or(GameError::UnknownCard(id))
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Drop every card owned by `owner`. Returns how many were removed.
    pub fn remove_owned_by(&mut self, owner: PlayerId) -> usize {
        let before = self.cards.len();
        self.cards.retain(|_, card| card.owner != owner);
        before - self.cards.len()
    }

    /// Iterate over the cards owned by `owner`.
    pub fn owned_by(&self, owner: PlayerId) -> impl Iterator<Item = &Card> {
        self.cards.values().filter(move |card| card.owner == owner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
