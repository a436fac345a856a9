//! Per-player state: zones, power, board and turn bookkeeping.
//!
//! A `Player` owns the ids of its cards in five zones plus its locations; the
//! cards themselves live in the game's [`CardStore`]. The top of a deck is
//! the end of its vector.
//!
//! Everything here is synchronous bookkeeping. Anything that consults the
//! effect bus or asks a player lives on [`Game`](crate::game::Game).

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::Location;
use crate::cards::{CardDefinition, CardStore};
use crate::core::{EntityId, GameError, GameRng, PlayerId};
use crate::villains::Villain;

/// The card zones a player owns, besides the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    VillainDeck,
    VillainDiscard,
    Hand,
    FateDeck,
    FateDiscard,
}

impl Zone {
    pub const ALL: [Zone; 5] = [
        Zone::VillainDeck,
        Zone::VillainDiscard,
        Zone::Hand,
        Zone::FateDeck,
        Zone::FateDiscard,
    ];
}

/// One participant at the table.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub is_owner: bool,
    /// Chosen character. `None` until chosen.
    pub villain: Option<Arc<dyn Villain>>,

    pub villain_deck: Vec<EntityId>,
    pub villain_discard: Vec<EntityId>,
    pub hand: Vec<EntityId>,
    pub fate_deck: Vec<EntityId>,
    pub fate_discard: Vec<EntityId>,

    pub locations: Vec<Location>,
    /// Where the villain mover stands.
    pub location_index: usize,
    pub power: i32,
    pub hand_limit: usize,
    /// Indices of the actions used this turn at the current location.
    pub performed_actions: FxHashSet<usize>,
}

impl Player {
    /// A seated player who has not chosen a villain yet.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            is_owner: false,
            villain: None,
            villain_deck: Vec::new(),
            villain_discard: Vec::new(),
            hand: Vec::new(),
            fate_deck: Vec::new(),
            fate_discard: Vec::new(),
            locations: Vec::new(),
            location_index: 0,
            power: 0,
            hand_limit: 0,
            performed_actions: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn villain_name(&self) -> Option<String> {
        self.villain.as_ref().map(|v| v.name().to_owned())
    }

    #[must_use]
    pub fn has_chosen(&self) -> bool {
        self.villain.is_some()
    }

    /// Build the board and both decks. Any previous state is discarded.
    pub fn setup(
        &mut self,
        deck: &[Arc<CardDefinition>],
        store: &mut CardStore,
        rng: &mut GameRng,
        power: i32,
        hand_limit: usize,
    ) -> Result<(), GameError> {
        let villain = self
            .villain
            .clone()
            .ok_or(GameError::NotReady { required: 1 })?;

        self.locations = villain
            .locations()
            .iter()
            .enumerate()
            .map(|(index, template)| Location::from_template(index, template))
            .collect();
        self.location_index = 0;
        self.power = power;
        self.hand_limit = hand_limit;
        self.performed_actions.clear();
        for zone in Zone::ALL {
            self.zone_mut(zone).clear();
        }

        for definition in deck {
            for _ in 0..definition.copies {
                let card = store.create(self.id, Arc::clone(definition));
                if definition.category.is_fate() {
                    self.fate_deck.push(card);
                } else {
                    self.villain_deck.push(card);
                }
            }
        }
        rng.shuffle(&mut self.villain_deck);
        rng.shuffle(&mut self.fate_deck);
        Ok(())
    }

    #[must_use]
    pub fn zone(&self, zone: Zone) -> &Vec<EntityId> {
        match zone {
            Zone::VillainDeck => &self.villain_deck,
            Zone::VillainDiscard => &self.villain_discard,
            Zone::Hand => &self.hand,
            Zone::FateDeck => &self.fate_deck,
            Zone::FateDiscard => &self.fate_discard,
        }
    }

    pub fn zone_mut(&mut self, zone: Zone) -> &mut Vec<EntityId> {
        match zone {
            Zone::VillainDeck => &mut self.villain_deck,
            Zone::VillainDiscard => &mut self.villain_discard,
            Zone::Hand => &mut self.hand,
            Zone::FateDeck => &mut self.fate_deck,
            Zone::FateDiscard => &mut self.fate_discard,
        }
    }

    /// Which zone holds `card`, if any.
    #[must_use]
    pub fn find_zone(&self, card: EntityId) -> Option<Zone> {
        Zone::ALL.into_iter().find(|z| self.zone(*z).contains(&card))
    }

    /// Remove `card` from `zone`. Returns false if it was not there.
    pub fn take(&mut self, zone: Zone, card: EntityId) -> bool {
        let cards = self.zone_mut(zone);
        match cards.iter().position(|&c| c == card) {
            Some(position) => {
                cards.remove(position);
                true
            }
            None => false,
        }
    }

    /// Take the top card of a deck, reshuffling its discard pile first if the
    /// deck is empty. `None` when both are empty.
    pub fn draw_from(&mut self, deck: Zone, discard: Zone, rng: &mut GameRng) -> Option<EntityId> {
        if self.zone(deck).is_empty() {
            let mut reshuffled = std::mem::take(self.zone_mut(discard));
            rng.shuffle(&mut reshuffled);
            *self.zone_mut(deck) = reshuffled;
        }
        self.zone_mut(deck).pop()
    }

    /// Draw a villain card into the hand.
    pub fn draw_villain_card(&mut self, rng: &mut GameRng) -> Option<EntityId> {
        let card = self.draw_from(Zone::VillainDeck, Zone::VillainDiscard, rng)?;
        self.hand.push(card);
        Some(card)
    }

    /// Reveal the top fate card. The card is in no zone until placed.
    pub fn draw_fate_card(&mut self, rng: &mut GameRng) -> Option<EntityId> {
        self.draw_from(Zone::FateDeck, Zone::FateDiscard, rng)
    }

    /// Is the hand below the limit with something left to draw?
    #[must_use]
    pub fn needs_cards(&self) -> bool {
        self.hand.len() < self.hand_limit
            && !(self.villain_deck.is_empty() && self.villain_discard.is_empty())
    }

    /// Can a Fate action target this player at all?
    #[must_use]
    pub fn can_be_fated(&self) -> bool {
        !self.fate_deck.is_empty() || !self.fate_discard.is_empty()
    }

    pub fn location(&self, index: usize) -> Result<&Location, GameError> {
        self.locations.get(index).ok_or(GameError::OutOfRange {
            what: "location",
            index,
            len: self.locations.len(),
        })
    }

    pub fn location_mut(&mut self, index: usize) -> Result<&mut Location, GameError> {
        let len = self.locations.len();
        self.locations.get_mut(index).ok_or(GameError::OutOfRange {
            what: "location",
            index,
            len,
        })
    }

    pub fn gain_power(&mut self, amount: i32) {
        self.power += amount;
    }

    /// Pay `amount` power.
    pub fn spend_power(&mut self, amount: i32) -> Result<(), GameError> {
        if amount > self.power {
            return Err(GameError::NotEnoughPower {
                available: self.power,
                required: amount,
            });
        }
        self.power -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::cards::CardCategory;

    fn player_with_deck(cards: usize, rng: &mut GameRng) -> (Player, CardStore) {
        let mut store = CardStore::new();
        let mut player = Player::new(PlayerId::new(1));
        player.hand_limit = 4;
        let def = Arc::new(CardDefinition::new("Test", "Goon", CardCategory::Ally));
        for _ in 0..cards {
            player.villain_deck.push(store.create(player.id, Arc::clone(&def)));
        }
        rng.shuffle(&mut player.villain_deck);
        (player, store)
    }

    #[test]
    fn test_draw_reshuffles_discard() {
        let mut rng = GameRng::new(1);
        let (mut player, _store) = player_with_deck(2, &mut rng);

        let a = player.draw_villain_card(&mut rng).unwrap();
        let b = player.draw_villain_card(&mut rng).unwrap();
        assert!(player.villain_deck.is_empty());

        assert!(player.take(Zone::Hand, a));
        player.villain_discard.push(a);

        assert_eq!(player.draw_villain_card(&mut rng), Some(a));
        assert!(player.villain_discard.is_empty());
        assert_eq!(player.hand, vec![b, a]);
        assert_eq!(player.draw_villain_card(&mut rng), None);
    }

    #[test]
    fn test_needs_cards() {
        let mut rng = GameRng::new(1);
        let (mut player, _store) = player_with_deck(6, &mut rng);
        assert!(player.needs_cards());
        while player.needs_cards() {
            player.draw_villain_card(&mut rng);
        }
        assert_eq!(player.hand.len(), 4);
    }

    #[test]
    fn test_spend_power() {
        let mut player = Player::new(PlayerId::new(1));
        player.gain_power(2);
        assert_eq!(
            player.spend_power(3),
            Err(GameError::NotEnoughPower {
                available: 2,
                required: 3
            })
        );
        assert_eq!(player.power, 2);
        player.spend_power(2).unwrap();
        assert_eq!(player.power, 0);
    }

    #[test]
    fn test_can_be_fated() {
        let mut player = Player::new(PlayerId::new(1));
        assert!(!player.can_be_fated());
        player.fate_discard.push(EntityId::new(3));
        assert!(player.can_be_fated());
    }

    #[test]
    fn test_find_zone() {
        let mut player = Player::new(PlayerId::new(1));
        player.fate_discard.push(EntityId::new(3));
        assert_eq!(player.find_zone(EntityId::new(3)), Some(Zone::FateDiscard));
        assert_eq!(player.find_zone(EntityId::new(4)), None);
    }

    proptest! {
        /// Drawing and discarding in any order never creates or loses a card.
        #[test]
        fn prop_draw_and_discard_keep_cards(
            seed in any::<u64>(),
            steps in prop::collection::vec(any::<bool>(), 0..60)
        ) {
            let mut rng = GameRng::new(seed);
            let (mut player, _store) = player_with_deck(10, &mut rng);

            for draw in steps {
                if draw {
                    player.draw_villain_card(&mut rng);
                } else if let Some(card) = player.hand.first().copied() {
                    player.take(Zone::Hand, card);
                    player.villain_discard.push(card);
                }
                let total =
                    player.villain_deck.len() + player.villain_discard.len() + player.hand.len();
                prop_assert_eq!(total, 10);

                let mut all: Vec<_> = player.villain_deck.iter()
                    .chain(&player.villain_discard)
                    .chain(&player.hand)
                    .collect();
                all.sort();
                all.dedup();
                prop_assert_eq!(all.len(), 10);
            }
        }
    }
}
