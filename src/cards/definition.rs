//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card kind: name,
//! category, printed cost and strength, how many copies go in the deck, and
//! the [`CardBehavior`] that implements its text.
//!
//! Instance-specific data (owner, placement, attachments) is stored
//! separately in [`Card`](super::Card).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::behavior::{CardBehavior, NoAbility};
use super::instance::Side;

/// Unique identifier for a card definition.
///
/// This identifies the kind of card (e.g. "Savage Goon"), not a specific
/// copy in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
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

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// What kind of card this is.
///
/// The first six come from the villain deck and are played to the ally side
/// of a location; the last three come from the fate deck and are played to
/// the hero side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Ally,
    /// Item attached to an ally already in play.
    AllyItem,
    /// Item placed on its own at a location.
    Item,
    Effect,
    Condition,
    /// Villain special, e.g. Maleficent's curses.
    Curse,
    Hero,
    HeroItem,
    FateEffect,
}

impl CardCategory {
    /// Does this card come from the fate deck?
    #[must_use]
    pub const fn is_fate(self) -> bool {
        matches!(
            self,
            CardCategory::Hero | CardCategory::HeroItem | CardCategory::FateEffect
        )
    }

    /// The side of a location this card is played to.
    #[must_use]
    pub const fn side(self) -> Side {
        if self.is_fate() {
            Side::Hero
        } else {
            Side::Ally
        }
    }

    /// Villain cards that a Move an Item or Ally action can pick up.
    #[must_use]
    pub const fn is_movable_villain_card(self) -> bool {
        matches!(
            self,
            CardCategory::Ally | CardCategory::Item | CardCategory::Curse
        )
    }
}

/// When a card's ability may trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Moment {
    /// Start of turn, before the villain moves.
    BeforeVillainMove,
    /// The card was just drawn.
    OnReceive,
    /// The card was just played from hand.
    OnPlay,
    /// The card was just played by a Fate action.
    OnFate,
    /// An Activate action picked this card.
    OnActivation,
    /// An opponent's action met this condition.
    OnCondition,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use villainous::cards::{CardCategory, CardDefinition};
///
/// let goon = CardDefinition::new("Maleficent", "Savage Goon", CardCategory::Ally)
///     .with_cost(3)
///     .with_strength(4)
///     .with_copies(3);
///
/// assert_eq!(goon.cost, Some(3));
/// assert_eq!(goon.strength, Some(4));
/// assert!(!goon.category.is_fate());
/// ```
#[derive(Clone)]
pub struct CardDefinition {
    /// Assigned by the registry.
    pub id: CardId,

    /// Villain whose decks contain this card.
    pub villain: String,

    pub name: String,

    pub category: CardCategory,

    /// Printed cost. `None` cannot be paid for.
    pub cost: Option<i32>,

    /// Printed strength. `None` for cards without a strength value.
    pub strength: Option<i32>,

    /// Copies shuffled into the deck.
    pub copies: usize,

    pub description: String,

    pub behavior: Arc<dyn CardBehavior>,
}

impl CardDefinition {
    /// Create a new card definition with no ability and one copy.
    pub fn new(
        villain: impl Into<String>,
        name: impl Into<String>,
        category: CardCategory,
    ) -> Self {
        Self {
            id: CardId::new(0),
            villain: villain.into(),
            name: name.into(),
            category,
            cost: None,
            strength: None,
            copies: 1,
            description: String::new(),
            behavior: Arc::new(NoAbility),
        }
    }

    /// Set the printed cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Set the printed strength (builder pattern).
    #[must_use]
    pub fn with_strength(mut self, strength: i32) -> Self {
        self.strength = Some(strength);
        self
    }

    /// Set the number of copies in the deck (builder pattern).
    #[must_use]
    pub fn with_copies(mut self, copies: usize) -> Self {
        self.copies = copies;
        self
    }

    /// Set the rules text (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach the ability implementation (builder pattern).
    #[must_use]
    pub fn with_behavior(mut self, behavior: impl CardBehavior + 'static) -> Self {
        self.behavior = Arc::new(behavior);
        self
    }
}

impl std::fmt::Debug for CardDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDefinition")
            .field("id", &self.id)
            .field("villain", &self.villain)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("cost", &self.cost)
            .field("strength", &self.strength)
            .field("copies", &self.copies)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides() {
        assert_eq!(CardCategory::Ally.side(), Side::Ally);
        assert_eq!(CardCategory::Curse.side(), Side::Ally);
        assert_eq!(CardCategory::Hero.side(), Side::Hero);
        assert_eq!(CardCategory::HeroItem.side(), Side::Hero);
        assert_eq!(CardCategory::FateEffect.side(), Side::Hero);
    }

    #[test]
    fn test_movable() {
        assert!(CardCategory::Ally.is_movable_villain_card());
        assert!(CardCategory::Item.is_movable_villain_card());
        assert!(CardCategory::Curse.is_movable_villain_card());
        assert!(!CardCategory::AllyItem.is_movable_villain_card());
        assert!(!CardCategory::Effect.is_movable_villain_card());
        assert!(!CardCategory::Hero.is_movable_villain_card());
    }

    #[test]
    fn test_builder_defaults() {
        let card = CardDefinition::new("Maleficent", "Vanish", CardCategory::Effect);
        assert_eq!(card.copies, 1);
        assert_eq!(card.cost, None);
        assert_eq!(card.strength, None);
        assert!(card.description.is_empty());
        assert!(format!("{card:?}").contains("Vanish"));
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&CardCategory::HeroItem).unwrap();
        assert_eq!(json, "\"HeroItem\"");
    }
}
