//! Moving cards between zones and the board.
//!
//! These are the primitive card movements every action is built from. Each
//! one leaves the owner's zones, the card's placement and the effect bus in
//! agreement: a card that leaves play for a discard pile loses its
//! subscriptions, and so do the cards attached to it.

use log::{debug, info, warn};

use crate::board::PlayTarget;
use crate::cards::{Activation, CardCategory, Moment, Side};
use crate::core::{EntityId, ErrorKind, GameError, PlayerId};
use crate::effects::Notification;
use crate::game::Game;
use crate::hub::ask::choose_one;
use crate::hub::{GameHub, Question};
use crate::player::Zone;

impl Game {
    /// Put a card that is in no zone onto `player`'s board.
    pub fn place_card(
        &mut self,
        player: PlayerId,
        card: EntityId,
        target: PlayTarget,
    ) -> Result<(), GameError> {
        let seat = self.seat(player)?;
        let Self { players, cards, .. } = self;
        players[seat]
            .location_mut(target.location)?
            .add_card(cards, card, target.side, target.attach_to)
    }

    fn attach_target_is(
        &self,
        player: PlayerId,
        target: PlayTarget,
        category: CardCategory,
    ) -> bool {
        let Some(slot) = target.attach_to else {
            return false;
        };
        self.player(player)
            .and_then(|p| p.location(target.location))
            .ok()
            .and_then(|loc| loc.stack(target.side).get(slot).copied())
            .and_then(|parent| self.cards.get(parent))
            .is_some_and(|parent| parent.is(category))
    }

    /// Play `card` from `player`'s hand, paying its cost.
    ///
    /// Effects take no target; everything else needs one, and an item for an
    /// ally must name the ally's slot. Nothing changes if the card cannot be
    /// played or paid for. If its play ability fails, the card goes back to
    /// the hand and the cost is refunded.
    pub async fn play_card(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
        card: EntityId,
        target: Option<PlayTarget>,
    ) -> Result<(), GameError> {
        if !self.player(player)?.hand.contains(&card) {
            return Err(GameError::CannotPlay(card));
        }
        let category = self.cards.card(card)?.category();

        let target = match (category, target) {
            (CardCategory::Effect, _) => {
                if !self.can_activate(Activation::new(player, card, Moment::OnPlay)) {
                    return Err(GameError::CannotPlay(card));
                }
                None
            }
            (CardCategory::Ally | CardCategory::Item | CardCategory::Curse, Some(t)) => {
                Some(PlayTarget {
                    side: Side::Ally,
                    attach_to: None,
                    ..t
                })
            }
            (CardCategory::AllyItem, Some(t)) => {
                let t = PlayTarget {
                    side: Side::Ally,
                    ..t
                };
                if !self.attach_target_is(player, t, CardCategory::Ally) {
                    return Err(GameError::CannotPlay(card));
                }
                Some(t)
            }
            _ => return Err(GameError::CannotPlay(card)),
        };
        let location = target.map(|t| t.location);
        if let Some(location) = location {
            if !self.location_accepts(player, card, location) {
                return Err(GameError::CannotPlay(card));
            }
        }

        let cost = self
            .card_cost(card, location)?
            .ok_or(GameError::CannotPlay(card))?;
        self.player_mut(player)?.spend_power(cost)?;
        self.player_mut(player)?.take(Zone::Hand, card);
        match target {
            Some(t) => self.place_card(player, card, t)?,
            // Lasting subscriptions of the effect expire on their own.
            None => self.player_mut(player)?.villain_discard.push(card),
        }
        info!(
            "turn: {player} plays {} for {cost}",
            self.cards.card(card)?.name()
        );

        let activation = Activation::new(player, card, Moment::OnPlay);
        if let Err(err) = self.activate(hub, activation).await {
            if err.kind() != ErrorKind::InvariantViolation {
                self.take_back(player, card, cost)?;
            }
            return Err(err);
        }
        self.publish(hub, player, Notification::CardPlayed { card })
            .await
    }

    /// Undo a play: `card` returns to the hand, loses its subscriptions and
    /// `cost` is refunded.
    fn take_back(&mut self, player: PlayerId, card: EntityId, cost: i32) -> Result<(), GameError> {
        self.bus.card_discarded(card);
        if self.cards.card(card)?.placement.is_some() {
            self.lift_from_board(card)?;
        }
        let p = self.player_mut(player)?;
        if let Some(zone) = p.find_zone(card) {
            p.take(zone, card);
        }
        p.hand.push(card);
        p.gain_power(cost);
        warn!("turn: {player} takes back {card}");
        Ok(())
    }

    /// Ask `actor` where a revealed fate card goes on `target`'s board.
    async fn choose_fate_placement(
        &self,
        hub: &dyn GameHub,
        actor: PlayerId,
        target: PlayerId,
        card: EntityId,
    ) -> Result<Option<PlayTarget>, GameError> {
        let category = self.cards.card(card)?.category();
        if category == CardCategory::FateEffect {
            return Ok(None);
        }

        let locations = self.fate_locations(target, card);
        let question = Question::ChooseFateLocation {
            target,
            card: self.card_view(card)?,
            locations: self.location_views(target, &locations)?,
        };
        let location = locations[choose_one(hub, actor, question, locations.len()).await?];

        if category != CardCategory::HeroItem {
            return Ok(Some(PlayTarget::new(location, Side::Hero)));
        }
        let heroes = self.unequipped_heroes(target, location)?;
        let question = Question::ChooseHeroForFateItem {
            item: self.card_view(card)?,
            heroes: self.card_views(&heroes)?,
        };
        let hero = heroes[choose_one(hub, actor, question, heroes.len()).await?];
        let slot = self
            .cards
            .card(hero)?
            .placement
            .map(|p| p.slot)
            .ok_or_else(|| GameError::InvariantViolation(format!("{hero} is not on the board")))?;
        Ok(Some(PlayTarget::new(location, Side::Hero).attached_to(slot)))
    }

    /// Heroes at `location` that carry no hero item yet.
    pub fn unequipped_heroes(
        &self,
        player: PlayerId,
        location: usize,
    ) -> Result<Vec<EntityId>, GameError> {
        let heroes = self.player(player)?.location(location)?.heroes(&self.cards);
        Ok(heroes
            .into_iter()
            .filter(|&hero| {
                self.cards.get(hero).is_some_and(|c| {
                    c.attachments.iter().all(|sub| {
                        self.cards
                            .get(*sub)
                            .map_or(true, |item| !item.is(CardCategory::HeroItem))
                    })
                })
            })
            .collect())
    }

    /// Play a revealed fate card against `target`, discarding `others`.
    ///
    /// `card` and `others` must be in no zone (just revealed). If the
    /// placement questions fail, every revealed card is discarded before the
    /// error is returned.
    pub async fn play_fate_card(
        &mut self,
        hub: &dyn GameHub,
        actor: PlayerId,
        target: PlayerId,
        card: EntityId,
        others: &[EntityId],
    ) -> Result<(), GameError> {
        let placement = match self.choose_fate_placement(hub, actor, target, card).await {
            Ok(placement) => placement,
            Err(err) => {
                self.discard_fate_card(target, card)?;
                for other in others {
                    self.discard_fate_card(target, *other)?;
                }
                return Err(err);
            }
        };
        for other in others {
            self.discard_fate_card(target, *other)?;
        }

        info!(
            "turn: {actor} fates {target} with {}",
            self.cards.card(card)?.name()
        );
        if let Some(t) = placement {
            self.place_card(target, card, t)?;
        } else {
            self.player_mut(target)?.fate_discard.push(card);
        }
        self.turn.fated_player = Some(target);
        self.activate(hub, Activation::new(target, card, Moment::OnFate))
            .await?;
        self.publish(hub, target, Notification::Fated { card }).await
    }

    /// Put a revealed fate card on its owner's fate discard pile.
    pub fn discard_fate_card(&mut self, owner: PlayerId, card: EntityId) -> Result<(), GameError> {
        self.player_mut(owner)?.fate_discard.push(card);
        self.bus.card_discarded(card);
        Ok(())
    }

    /// Discard `card` from `player`'s hand.
    pub fn discard_from_hand(&mut self, player: PlayerId, card: EntityId) -> Result<(), GameError> {
        let p = self.player_mut(player)?;
        if !p.take(Zone::Hand, card) {
            return Err(GameError::InvariantViolation(format!(
                "{card} is not in {player}'s hand"
            )));
        }
        p.villain_discard.push(card);
        self.bus.card_discarded(card);
        Ok(())
    }

    /// Take `card` off the board and discard it with everything attached.
    pub fn discard_from_board(&mut self, card: EntityId) -> Result<(), GameError> {
        let owner = self.lift_from_board(card)?;
        self.discard_detached(owner, card)
    }

    /// Take `card` off the board, attachments included. Returns its owner.
    fn lift_from_board(&mut self, card: EntityId) -> Result<PlayerId, GameError> {
        let c = self.cards.card(card)?;
        let owner = c.owner;
        let placement = c
            .placement
            .ok_or_else(|| GameError::InvariantViolation(format!("{card} is not on the board")))?;

        if placement.attached {
            let root = self
                .player(owner)?
                .location(placement.location)?
                .stack(placement.side)
                .get(placement.slot)
                .copied();
            let holder = root
                .and_then(|root| self.holder_of(root, card))
                .ok_or_else(|| GameError::InvariantViolation(format!("{card} has no parent")))?;
            self.cards
                .card_mut(holder)?
                .attachments
                .retain(|sub| *sub != card);
            self.cards.card_mut(card)?.placement = None;
        } else {
            let seat = self.seat(owner)?;
            let Self { players, cards, .. } = self;
            players[seat]
                .location_mut(placement.location)?
                .remove_card(cards, card)?;
        }
        Ok(owner)
    }

    fn holder_of(&self, root: EntityId, card: EntityId) -> Option<EntityId> {
        let c = self.cards.get(root)?;
        if c.attachments.contains(&card) {
            return Some(root);
        }
        c.attachments
            .iter()
            .find_map(|sub| self.holder_of(*sub, card))
    }

    fn discard_detached(&mut self, owner: PlayerId, card: EntityId) -> Result<(), GameError> {
        let entry = self.cards.card_mut(card)?;
        entry.placement = None;
        let attachments = std::mem::take(&mut entry.attachments);
        let fate = entry.category().is_fate();

        let p = self.player_mut(owner)?;
        if fate {
            p.fate_discard.push(card);
        } else {
            p.villain_discard.push(card);
        }
        self.bus.card_discarded(card);
        debug!("turn: {card} discarded from the board");

        for sub in attachments {
            self.discard_detached(owner, sub)?;
        }
        Ok(())
    }

    /// Move a top-level card to another location of the same board.
    ///
    /// It keeps its side; its attachments come along.
    pub fn move_card(&mut self, card: EntityId, to: usize) -> Result<(), GameError> {
        let c = self.cards.card(card)?;
        let owner = c.owner;
        let placement = c.placement.ok_or(GameError::CannotMove(card))?;
        if placement.attached || placement.location == to {
            return Err(GameError::CannotMove(card));
        }

        let seat = self.seat(owner)?;
        let Self { players, cards, .. } = self;
        let p = &mut players[seat];
        if p.location(to)?.locked {
            return Err(GameError::CannotMove(card));
        }
        p.location_mut(placement.location)?.remove_card(cards, card)?;
        p.location_mut(to)?.add_card(cards, card, placement.side, None)
    }

    /// Draw one villain card into `player`'s hand and trigger its receive
    /// ability.
    pub async fn draw_villain_card(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
    ) -> Result<Option<EntityId>, GameError> {
        let seat = self.seat(player)?;
        let Self { players, rng, .. } = self;
        let Some(card) = players[seat].draw_villain_card(rng) else {
            return Ok(None);
        };
        self.activate(hub, Activation::new(player, card, Moment::OnReceive))
            .await?;
        Ok(Some(card))
    }

    /// Draw up to `count` villain cards. Returns how many were drawn.
    pub async fn draw_villain_cards(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
        count: usize,
    ) -> Result<usize, GameError> {
        let mut drawn = 0;
        while drawn < count && self.draw_villain_card(hub, player).await?.is_some() {
            drawn += 1;
        }
        Ok(drawn)
    }

    /// Reveal up to `count` fate cards from `player`'s fate deck.
    ///
    /// The revealed cards are in no zone; the caller must place or discard
    /// every one of them.
    pub async fn draw_fate_cards(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
        count: usize,
    ) -> Result<Vec<EntityId>, GameError> {
        let seat = self.seat(player)?;
        let mut drawn = Vec::with_capacity(count);
        {
            let Self { players, rng, .. } = self;
            for _ in 0..count {
                match players[seat].draw_fate_card(rng) {
                    Some(card) => drawn.push(card),
                    None => break,
                }
            }
        }
        for card in &drawn {
            self.activate(hub, Activation::new(player, *card, Moment::OnReceive))
                .await?;
        }
        Ok(drawn)
    }
}
