//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition known to the server and
//! assigns their `CardId`s. Definitions are shared with card instances
//! through `Arc`, so registering happens once at startup.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use villainous::cards::{CardCategory, CardDefinition, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// let id = registry.register(
///     CardDefinition::new("Maleficent", "Cackling Goon", CardCategory::Ally).with_cost(1),
/// );
///
/// let found = registry.get(id).unwrap();
/// assert_eq!(found.name, "Cackling Goon");
/// assert_eq!(registry.by_villain("Maleficent").count(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Arc<CardDefinition>>,
    next_id: u32,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition with an auto-assigned ID.
    ///
    /// Returns the assigned ID.
    pub fn register(&mut self, mut card: CardDefinition) -> CardId {
        self.next_id += 1;
        let id = CardId::new(self.next_id);
        card.id = id;
        self.cards.insert(id, Arc::new(card));
        id
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Arc<CardDefinition>> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Definitions belonging to one villain, ordered by ID.
    pub fn by_villain<'a>(
        &'a self,
        villain: &'a str,
    ) -> impl Iterator<Item = &'a Arc<CardDefinition>> {
        let mut cards: Vec<_> = self
            .cards
            .values()
            .filter(move |c| c.villain == villain)
            .collect();
        cards.sort_by_key(|c| c.id);
        cards.into_iter()
    }

    /// Find a villain's card by name.
    #[must_use]
    pub fn find(&self, villain: &str, name: &str) -> Option<&Arc<CardDefinition>> {
        self.cards
            .values()
            .find(|c| c.villain == villain && c.name == name)
    }
}
