//! Playable characters.
//!
//! A [`Villain`] supplies everything character-specific: the printed
//! locations, the card list for both decks and the objective. The engine
//! only ever talks to villains through this trait and to their cards through
//! [`CardBehavior`](crate::cards::CardBehavior), so adding a character means
//! registering a new implementation, not touching the rules.

pub mod maleficent;

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::board::LocationTemplate;
use crate::cards::{CardDefinition, CardRegistry};
use crate::core::PlayerId;
use crate::game::Game;

pub use maleficent::Maleficent;

/// A playable character.
pub trait Villain: Send + Sync + std::fmt::Debug {
    /// Unique name, used to choose the villain.
    fn name(&self) -> &str;

    /// Rules text of the objective.
    fn objective(&self) -> &str;

    /// The board, left to right.
    fn locations(&self) -> Vec<LocationTemplate>;

    /// Every card of both decks, with copy counts.
    fn cards(&self) -> Vec<CardDefinition>;

    /// Has `player` achieved the objective? Checked at the start of its turn.
    fn has_won(&self, game: &Game, player: PlayerId) -> bool;
}

/// Every villain the server offers, with their card definitions.
#[derive(Debug, Default)]
pub struct VillainRegistry {
    villains: FxHashMap<String, Arc<dyn Villain>>,
    cards: CardRegistry,
}

impl VillainRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in villain.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Maleficent);
        registry
    }

    /// Register a villain and its cards.
    pub fn register(&mut self, villain: impl Villain + 'static) {
        let name = villain.name().to_owned();
        for mut card in villain.cards() {
            card.villain.clone_from(&name);
            self.cards.register(card);
        }
        self.villains.insert(name, Arc::new(villain));
    }

    /// Look up a villain by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Villain>> {
        self.villains.get(name).cloned()
    }

    /// The card definitions of one villain, in registration order.
    #[must_use]
    pub fn deck(&self, name: &str) -> Vec<Arc<CardDefinition>> {
        self.cards.by_villain(name).cloned().collect()
    }

    /// All card definitions.
    #[must_use]
    pub fn cards(&self) -> &CardRegistry {
        &self.cards
    }

    /// Names of the registered villains, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.villains.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
