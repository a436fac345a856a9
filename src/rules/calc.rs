//! Derived values and permissions.
//!
//! Nothing here mutates the game. Strength, cost and every "may I" question
//! combine the printed value, the card's own static modifier and the answers
//! of the effect bus. Results are recomputed on every call.

use crate::cards::{Activation, CardCategory, Moment, Side};
use crate::core::{Action, ActionKind, EntityId, GameError, PlayerId};
use crate::effects::{add_optional, Query};
use crate::game::Game;

impl Game {
    /// Printed strength, plus bonuses, plus the strength of attached cards.
    ///
    /// A card's own static bonus only counts while it is on the board.
    pub fn card_strength(&self, card: EntityId) -> Result<Option<i32>, GameError> {
        let c = self.cards.card(card)?;
        let own = if c.placement.is_some() {
            c.definition.behavior.strength_bonus(self, card)
        } else {
            None
        };
        let bus = self.query_sum(c.owner, Query::StrengthBonus { card });

        let mut strength = add_optional(add_optional(c.definition.strength, own), bus);
        for sub in &c.attachments {
            strength = add_optional(strength, self.card_strength(*sub)?);
        }
        Ok(strength)
    }

    /// Cost of playing `card` to `location` (`None` for effects).
    ///
    /// A card without a printed cost stays unplayable whatever the modifiers.
    pub fn card_cost(
        &self,
        card: EntityId,
        location: Option<usize>,
    ) -> Result<Option<i32>, GameError> {
        let c = self.cards.card(card)?;
        let Some(printed) = c.definition.cost else {
            return Ok(None);
        };
        let own = c.definition.behavior.cost_bonus(self, card, location);
        let bus = self.query_sum(c.owner, Query::CostBonus { card, location });
        Ok(add_optional(add_optional(Some(printed), own), bus))
    }

    fn can_afford_at(&self, player: PlayerId, card: EntityId, location: Option<usize>) -> bool {
        let Ok(p) = self.player(player) else {
            return false;
        };
        matches!(self.card_cost(card, location), Ok(Some(cost)) if cost <= p.power)
    }

    /// Can `player` pay for `card` somewhere?
    #[must_use]
    pub fn can_afford(&self, player: PlayerId, card: EntityId) -> bool {
        let Ok(c) = self.cards.card(card) else {
            return false;
        };
        if c.is(CardCategory::Effect) {
            return self.can_afford_at(player, card, None);
        }
        let Ok(p) = self.player(player) else {
            return false;
        };
        (0..p.locations.len()).any(|i| self.can_afford_at(player, card, Some(i)))
    }

    /// Board shape and card vetoes allow `card` at `location`, cost aside.
    #[must_use]
    pub fn location_accepts(&self, player: PlayerId, card: EntityId, location: usize) -> bool {
        let (Ok(p), Ok(c)) = (self.player(player), self.cards.card(card)) else {
            return false;
        };
        let Ok(loc) = p.location(location) else {
            return false;
        };
        loc.accepts(&self.cards, c.category())
            && self.query_all(player, Query::CanPlayCard { card, location })
    }

    /// Locations `card` may be played to from `player`'s hand right now.
    #[must_use]
    pub fn playable_locations(&self, player: PlayerId, card: EntityId) -> Vec<usize> {
        let Ok(p) = self.player(player) else {
            return Vec::new();
        };
        (0..p.locations.len())
            .filter(|&i| self.location_accepts(player, card, i))
            .filter(|&i| self.can_afford_at(player, card, Some(i)))
            .collect()
    }

    /// May `player` play `card` from hand with a Play a Card action?
    #[must_use]
    pub fn can_play_card(&self, player: PlayerId, card: EntityId) -> bool {
        let Ok(c) = self.cards.card(card) else {
            return false;
        };
        match c.category() {
            CardCategory::Effect => {
                self.can_afford_at(player, card, None)
                    && self.can_activate(Activation::new(player, card, Moment::OnPlay))
            }
            CardCategory::Ally
            | CardCategory::AllyItem
            | CardCategory::Item
            | CardCategory::Curse => !self.playable_locations(player, card).is_empty(),
            CardCategory::Condition
            | CardCategory::Hero
            | CardCategory::HeroItem
            | CardCategory::FateEffect => false,
        }
    }

    /// Locations the fate card `card` may be played to on `target`'s board.
    ///
    /// A hero item needs a hero there that carries no item yet.
    #[must_use]
    pub fn fate_locations(&self, target: PlayerId, card: EntityId) -> Vec<usize> {
        let (Ok(p), Ok(c)) = (self.player(target), self.cards.card(card)) else {
            return Vec::new();
        };
        let item = c.is(CardCategory::HeroItem);
        p.locations
            .iter()
            .filter(|loc| loc.accepts(&self.cards, c.category()))
            .map(|loc| loc.index)
            .filter(|&location| {
                !item || self.unequipped_heroes(target, location).is_ok_and(|h| !h.is_empty())
            })
            .filter(|&location| self.query_all(target, Query::CanFate { card, location }))
            .collect()
    }

    /// Can the revealed fate card be played against `target`?
    #[must_use]
    pub fn can_play_fate_card(&self, target: PlayerId, card: EntityId) -> bool {
        match self.cards.card(card).map(|c| c.category()) {
            Ok(CardCategory::FateEffect) => true,
            Ok(CardCategory::Hero | CardCategory::HeroItem) => {
                !self.fate_locations(target, card).is_empty()
            }
            _ => false,
        }
    }

    /// Allies needed to vanquish `hero`. Never less than one.
    #[must_use]
    pub fn required_ally_count(&self, player: PlayerId, hero: EntityId) -> usize {
        let required = self
            .query_max(player, Query::RequiredAllyCount { hero })
            .unwrap_or(1)
            .max(1);
        usize::try_from(required).unwrap_or(1)
    }

    /// Check that `allies` can defeat `hero`.
    pub fn check_vanquish(
        &self,
        player: PlayerId,
        hero: EntityId,
        allies: &[EntityId],
    ) -> Result<(), GameError> {
        let required = self.required_ally_count(player, hero);
        if allies.len() < required {
            return Err(GameError::NotEnoughAllies {
                required,
                provided: allies.len(),
            });
        }
        let hero_strength = self.card_strength(hero)?.unwrap_or(0);
        let mut strength = 0;
        for ally in allies {
            strength += self.card_strength(*ally)?.unwrap_or(0);
        }
        if strength < hero_strength {
            return Err(GameError::AlliesTooWeak {
                strength,
                hero_strength,
            });
        }
        Ok(())
    }

    /// Allies standing at `hero`'s location.
    pub fn attacking_allies(
        &self,
        player: PlayerId,
        hero: EntityId,
    ) -> Result<Vec<EntityId>, GameError> {
        let location = self
            .cards
            .card(hero)?
            .location()
            .ok_or_else(|| GameError::InvariantViolation(format!("{hero} is not on the board")))?;
        Ok(self.player(player)?.location(location)?.allies(&self.cards))
    }

    /// Every hero on `player`'s board, location by location.
    #[must_use]
    pub fn heroes(&self, player: PlayerId) -> Vec<EntityId> {
        self.player(player)
            .map(|p| p.locations.iter().flat_map(|l| l.heroes(&self.cards)).collect())
            .unwrap_or_default()
    }

    /// Heroes the allies at their location could defeat together.
    #[must_use]
    pub fn defeatable_heroes(&self, player: PlayerId) -> Vec<EntityId> {
        self.heroes(player)
            .into_iter()
            .filter(|&hero| {
                self.attacking_allies(player, hero)
                    .and_then(|allies| self.check_vanquish(player, hero, &allies))
                    .is_ok()
            })
            .collect()
    }

    /// Top-level allies, items and curses on `player`'s board.
    #[must_use]
    pub fn movable_villain_cards(&self, player: PlayerId) -> Vec<EntityId> {
        let Ok(p) = self.player(player) else {
            return Vec::new();
        };
        p.locations
            .iter()
            .flat_map(|l| l.stack(Side::Ally).iter().copied())
            .filter(|id| {
                self.cards
                    .get(*id)
                    .is_some_and(|c| c.category().is_movable_villain_card())
            })
            .collect()
    }

    /// Every card on `player`'s board, attachments right after their parent.
    #[must_use]
    pub fn board_cards(&self, player: PlayerId) -> Vec<EntityId> {
        let Ok(p) = self.player(player) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for location in &p.locations {
            for side in [Side::Hero, Side::Ally] {
                for card in location.stack(side) {
                    self.collect_attached(*card, &mut out);
                }
            }
        }
        out
    }

    fn collect_attached(&self, card: EntityId, out: &mut Vec<EntityId>) {
        out.push(card);
        if let Some(c) = self.cards.get(card) {
            for sub in &c.attachments {
                self.collect_attached(*sub, out);
            }
        }
    }

    /// Board cards an Activate action could trigger. The player must be
    /// able to pay for the card somewhere.
    #[must_use]
    pub fn activatable_cards(&self, player: PlayerId) -> Vec<EntityId> {
        self.board_cards(player)
            .into_iter()
            .filter(|&card| self.can_afford(player, card))
            .filter(|&card| self.can_activate(Activation::new(player, card, Moment::OnActivation)))
            .collect()
    }

    /// May `target` be chosen by a Fate action now?
    ///
    /// With two players the same opponent cannot be fated twice in a row.
    #[must_use]
    pub fn can_fate_player(&self, target: PlayerId) -> bool {
        let Ok(p) = self.player(target) else {
            return false;
        };
        p.can_be_fated() && !(self.players.len() == 2 && self.turn.fated_player == Some(target))
    }

    /// Opponents `actor` may fate.
    #[must_use]
    pub fn fateable_players(&self, actor: PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .map(|p| p.id)
            .filter(|&id| id != actor && self.can_fate_player(id))
            .collect()
    }

    /// Do the preconditions of an action kind hold for `player`?
    #[must_use]
    pub fn action_is_possible(&self, player: PlayerId, kind: ActionKind) -> bool {
        let Ok(p) = self.player(player) else {
            return false;
        };
        match kind {
            ActionKind::GainPower => true,
            ActionKind::MoveItemOrAlly => {
                p.locations.iter().filter(|l| !l.locked).count() > 1
                    && !self.movable_villain_cards(player).is_empty()
            }
            ActionKind::MoveHero => {
                p.locations.iter().filter(|l| !l.locked).count() > 1
                    && !self.heroes(player).is_empty()
            }
            ActionKind::PlayCard => p.hand.iter().any(|&card| self.can_play_card(player, card)),
            ActionKind::Fate => !self.fateable_players(player).is_empty(),
            ActionKind::DiscardCards => !p.hand.is_empty(),
            ActionKind::Vanquish => !self.defeatable_heroes(player).is_empty(),
            ActionKind::Activate => !self.activatable_cards(player).is_empty(),
        }
    }

    /// The actions at one of `player`'s locations, as they stand right now.
    pub fn location_actions(
        &self,
        player: PlayerId,
        location: usize,
    ) -> Result<Vec<Action>, GameError> {
        let p = self.player(player)?;
        let loc = p.location(location)?;
        let performed = if location == p.location_index {
            p.performed_actions.clone()
        } else {
            Default::default()
        };
        Ok(loc.actions(&self.cards, &performed, |kind| {
            self.action_is_possible(player, kind)
        }))
    }
}
