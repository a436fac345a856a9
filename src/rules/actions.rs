//! The eight location actions.
//!
//! [`Game::resolve_action`] runs one action for the current player, asking
//! every question it needs through the hub. The action loop has already
//! checked that the action is available; each procedure still fails with
//! `NoOptions` rather than asking an empty question.

use log::info;

use crate::board::PlayTarget;
use crate::cards::{Activation, CardCategory, Moment, Side};
use crate::core::{ActionKind, ActionTemplate, EntityId, GameError, PlayerId};
use crate::game::Game;
use crate::hub::ask::{choose_many, choose_one, choose_player};
use crate::hub::{GameHub, Question};

impl Game {
    /// Resolve one action for `player`.
    pub async fn resolve_action(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
        template: ActionTemplate,
    ) -> Result<(), GameError> {
        info!("turn: {player} performs {}", template.kind);
        match template.kind {
            ActionKind::GainPower => {
                self.player_mut(player)?
                    .gain_power(template.amount.unwrap_or(0));
                Ok(())
            }
            ActionKind::MoveItemOrAlly => self.move_item_or_ally(hub, player).await,
            ActionKind::MoveHero => self.move_hero(hub, player).await,
            ActionKind::PlayCard => self.play_from_hand(hub, player).await,
            ActionKind::Fate => self.fate(hub, player).await,
            ActionKind::DiscardCards => self.discard_cards(hub, player).await,
            ActionKind::Vanquish => self.vanquish(hub, player).await,
            ActionKind::Activate => self.activate_card(hub, player).await,
        }
    }

    /// Run the action at `index` of one of `player`'s locations, outside the
    /// action loop. Used by card abilities.
    pub async fn perform_special_action(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
        location: usize,
        index: usize,
    ) -> Result<(), GameError> {
        let actions = self.location_actions(player, location)?;
        let action = *actions.get(index).ok_or(GameError::OutOfRange {
            what: "action",
            index,
            len: actions.len(),
        })?;
        if action.covered {
            return Err(GameError::ActionCovered { index });
        }
        if !action.possible {
            return Err(GameError::ActionBlocked { index });
        }
        self.resolve_action(hub, player, action.template).await
    }

    /// Unlocked locations other than `from`.
    fn other_locations(&self, player: PlayerId, from: usize) -> Result<Vec<usize>, GameError> {
        Ok(self
            .player(player)?
            .locations
            .iter()
            .filter(|l| !l.locked && l.index != from)
            .map(|l| l.index)
            .collect())
    }

    fn location_of(&self, card: EntityId) -> Result<usize, GameError> {
        self.cards
            .card(card)?
            .location()
            .ok_or_else(|| GameError::InvariantViolation(format!("{card} is not on the board")))
    }

    async fn move_item_or_ally(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
    ) -> Result<(), GameError> {
        let cards = self.movable_villain_cards(player);
        let question = Question::ChooseItemOrAllyToMove {
            cards: self.card_views(&cards)?,
        };
        let card = cards[choose_one(hub, player, question, cards.len()).await?];

        let locations = self.other_locations(player, self.location_of(card)?)?;
        let question = Question::ChooseLocationForItemOrAlly {
            card: self.card_view(card)?,
            locations: self.location_views(player, &locations)?,
        };
        let to = locations[choose_one(hub, player, question, locations.len()).await?];
        self.move_card(card, to)
    }

    async fn move_hero(&mut self, hub: &dyn GameHub, player: PlayerId) -> Result<(), GameError> {
        let heroes = self.heroes(player);
        let question = Question::ChooseHeroToMove {
            heroes: self.card_views(&heroes)?,
        };
        let hero = heroes[choose_one(hub, player, question, heroes.len()).await?];

        let locations = self.other_locations(player, self.location_of(hero)?)?;
        let question = Question::ChooseLocationForHero {
            hero: self.card_view(hero)?,
            locations: self.location_views(player, &locations)?,
        };
        let to = locations[choose_one(hub, player, question, locations.len()).await?];
        self.move_card(hero, to)
    }

    async fn play_from_hand(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
    ) -> Result<(), GameError> {
        let playable: Vec<EntityId> = self
            .player(player)?
            .hand
            .iter()
            .copied()
            .filter(|&card| self.can_play_card(player, card))
            .collect();
        let question = Question::ChooseCardToPlay {
            cards: self.card_views(&playable)?,
        };
        let card = playable[choose_one(hub, player, question, playable.len()).await?];

        let category = self.cards.card(card)?.category();
        if category == CardCategory::Effect {
            return self.play_card(hub, player, card, None).await;
        }

        let locations = self.playable_locations(player, card);
        let question = Question::ChooseLocationToPlay {
            card: self.card_view(card)?,
            locations: self.location_views(player, &locations)?,
        };
        let location = locations[choose_one(hub, player, question, locations.len()).await?];

        let mut target = PlayTarget::new(location, Side::Ally);
        if category == CardCategory::AllyItem {
            let allies = self.player(player)?.location(location)?.allies(&self.cards);
            let question = Question::ChooseAllyForItem {
                item: self.card_view(card)?,
                allies: self.card_views(&allies)?,
            };
            let ally = allies[choose_one(hub, player, question, allies.len()).await?];
            let slot = self
                .cards
                .card(ally)?
                .placement
                .map(|p| p.slot)
                .ok_or(GameError::CannotPlay(card))?;
            target = target.attached_to(slot);
        }
        self.play_card(hub, player, card, Some(target)).await
    }

    /// Fate an opponent: reveal fate cards from its deck and play one of
    /// them against it.
    pub async fn fate(&mut self, hub: &dyn GameHub, actor: PlayerId) -> Result<(), GameError> {
        let targets = self.fateable_players(actor);
        let question = Question::ChooseFateTarget {
            players: targets.clone(),
        };
        let target = choose_player(hub, actor, question, &targets).await?;

        let drawn = self
            .draw_fate_cards(hub, target, self.config.fate_draw_count)
            .await?;
        let playable: Vec<EntityId> = drawn
            .iter()
            .copied()
            .filter(|&card| self.can_play_fate_card(target, card))
            .collect();
        if playable.is_empty() {
            info!("turn: nothing {actor} revealed can be played against {target}");
            for card in drawn {
                self.discard_fate_card(target, card)?;
            }
            return Ok(());
        }

        let question = Question::ChooseFateCard {
            target,
            cards: self.card_views(&playable)?,
        };
        let chosen = match choose_one(hub, actor, question, playable.len()).await {
            Ok(index) => playable[index],
            Err(err) => {
                for card in drawn {
                    self.discard_fate_card(target, card)?;
                }
                return Err(err);
            }
        };
        let others: Vec<EntityId> = drawn.into_iter().filter(|&c| c != chosen).collect();
        self.play_fate_card(hub, actor, target, chosen, &others).await
    }

    async fn discard_cards(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
    ) -> Result<(), GameError> {
        let hand = self.player(player)?.hand.clone();
        let question = Question::ChooseCardsToDiscard {
            cards: self.card_views(&hand)?,
            min: 0,
            max: hand.len(),
        };
        let picked = choose_many(hub, player, question, hand.len(), 0, hand.len()).await?;
        for index in picked {
            self.discard_from_hand(player, hand[index])?;
        }
        Ok(())
    }

    async fn vanquish(&mut self, hub: &dyn GameHub, player: PlayerId) -> Result<(), GameError> {
        let heroes = self.defeatable_heroes(player);
        let question = Question::ChooseHeroToVanquish {
            heroes: self.card_views(&heroes)?,
        };
        let hero = heroes[choose_one(hub, player, question, heroes.len()).await?];
        self.vanquish_hero(hub, player, hero).await
    }

    async fn activate_card(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
    ) -> Result<(), GameError> {
        let cards = self.activatable_cards(player);
        let question = Question::ChooseCardToActivate {
            cards: self.card_views(&cards)?,
        };
        let card = cards[choose_one(hub, player, question, cards.len()).await?];
        self.activate(hub, Activation::new(player, card, Moment::OnActivation))
            .await?;
        Ok(())
    }
}
