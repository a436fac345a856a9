//! Board consistency checks.
//!
//! Run after every action and at the end of each turn. Every card a player
//! owns must be in exactly one place (a zone, a location stack, or attached
//! to exactly one card), its recorded placement must match where it was
//! found, and each definition must still have its full number of copies.
//! Any failure is an `InvariantViolation` (or `CopyCount`) and abandons the
//! game.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cards::{CardId, Placement, Side};
use crate::core::{EntityId, GameError, PlayerId};
use crate::player::Zone;

use super::Game;

struct Census {
    player: PlayerId,
    seen: FxHashSet<EntityId>,
    copies: FxHashMap<CardId, usize>,
}

impl Game {
    /// Check every invariant of `player`'s cards.
    pub fn verify_consistency(&self, player: PlayerId) -> Result<(), GameError> {
        let p = self.player(player)?;
        let mut census = Census {
            player,
            seen: FxHashSet::default(),
            copies: FxHashMap::default(),
        };

        for zone in Zone::ALL {
            for &card in p.zone(zone) {
                self.count(&mut census, card)?;
                let c = self.cards.card(card)?;
                if c.placement.is_some() || !c.attachments.is_empty() {
                    return Err(GameError::InvariantViolation(format!(
                        "{card} in {zone:?} is still on the board"
                    )));
                }
            }
        }

        for location in &p.locations {
            for side in [Side::Hero, Side::Ally] {
                for (slot, &card) in location.stack(side).iter().enumerate() {
                    let expected = Placement {
                        location: location.index,
                        side,
                        slot,
                        attached: false,
                    };
                    self.check_placed(&mut census, card, expected)?;
                }
            }
        }

        if let Some(stray) = self
            .cards
            .owned_by(player)
            .map(|c| c.id)
            .find(|id| !census.seen.contains(id))
        {
            return Err(GameError::InvariantViolation(format!(
                "{stray} of {player} is nowhere"
            )));
        }

        if let Some(villain) = p.villain_name() {
            for definition in self.villains.deck(&villain) {
                let found = census.copies.get(&definition.id).copied().unwrap_or(0);
                if found != definition.copies {
                    return Err(GameError::CopyCount {
                        card: definition.id,
                        found,
                        expected: definition.copies,
                    });
                }
            }
        }
        Ok(())
    }

    /// Check every seated player.
    pub fn verify_all(&self) -> Result<(), GameError> {
        self.players
            .iter()
            .try_for_each(|p| self.verify_consistency(p.id))
    }

    fn count(&self, census: &mut Census, card: EntityId) -> Result<(), GameError> {
        if !census.seen.insert(card) {
            return Err(GameError::InvariantViolation(format!(
                "{card} is in two places"
            )));
        }
        let c = self.cards.card(card)?;
        if c.owner != census.player {
            return Err(GameError::InvariantViolation(format!(
                "{card} belongs to {}, found with {}",
                c.owner, census.player
            )));
        }
        *census.copies.entry(c.card_id()).or_default() += 1;
        Ok(())
    }

    fn check_placed(
        &self,
        census: &mut Census,
        card: EntityId,
        expected: Placement,
    ) -> Result<(), GameError> {
        self.count(census, card)?;
        let c = self.cards.card(card)?;
        if c.placement != Some(expected) {
            return Err(GameError::InvariantViolation(format!(
                "{card} records {:?}, found at {expected:?}",
                c.placement
            )));
        }
        let attached = Placement {
            attached: true,
            ..expected
        };
        for &sub in &c.attachments {
            self.check_placed(census, sub, attached)?;
        }
        Ok(())
    }
}
