//! Maleficent: start your turn with a Curse at each location.
//!
//! ## Realm
//!
//! | Location              | Hero side                 | Ally side            |
//! |-----------------------|---------------------------|----------------------|
//! | Forbidden Mountains   | Move Item/Ally, Play Card | Gain 1, Play Card    |
//! | Briar Rose's Cottage  | Gain 2, Move Item/Ally    | Play Card, Discard   |
//! | The Forest            | Discard, Play Card        | Gain 3, Play Card    |
//! | King Stefan's Castle  | Gain 1, Fate              | Vanquish, Play Card  |
//!
//! Curses are Maleficent's villain-specific cards. Each one registers its
//! restriction on the effect bus when played and discards itself when its
//! condition is met.

use async_trait::async_trait;

use crate::board::LocationTemplate;
use crate::cards::{Activation, CardBehavior, CardCategory, CardDefinition, Moment, Side};
use crate::core::{Action, ActionKind, ActionTemplate, EntityId, GameError, PlayerId};
use crate::effects::{
    Duration, Notification, NotificationKind, Query, QueryKind, QueryValue, Subscription,
};
use crate::game::Game;
use crate::hub::ask::{choose_many, choose_one, choose_optional, confirm};
use crate::hub::{GameHub, Question};
use crate::player::Zone;

use super::Villain;

const NAME: &str = "Maleficent";
const DREAMLESS_SLEEP: &str = "Dreamless Sleep";

/// Maleficent, from The Worst Takes It All.
#[derive(Clone, Copy, Debug, Default)]
pub struct Maleficent;

impl Villain for Maleficent {
    fn name(&self) -> &str {
        NAME
    }

    fn objective(&self) -> &str {
        "Start your turn with a Curse at each location."
    }

    fn locations(&self) -> Vec<LocationTemplate> {
        use ActionKind::{DiscardCards, Fate, MoveItemOrAlly, PlayCard, Vanquish};
        let a = ActionTemplate::new;
        vec![
            LocationTemplate::new("Forbidden Mountains")
                .with_hero_actions(&[a(MoveItemOrAlly), a(PlayCard)])
                .with_ally_actions(&[ActionTemplate::gain_power(1), a(PlayCard)]),
            LocationTemplate::new("Briar Rose's Cottage")
                .with_hero_actions(&[ActionTemplate::gain_power(2), a(MoveItemOrAlly)])
                .with_ally_actions(&[a(PlayCard), a(DiscardCards)]),
            LocationTemplate::new("The Forest")
                .with_hero_actions(&[a(DiscardCards), a(PlayCard)])
                .with_ally_actions(&[ActionTemplate::gain_power(3), a(PlayCard)]),
            LocationTemplate::new("King Stefan's Castle")
                .with_hero_actions(&[ActionTemplate::gain_power(1), a(Fate)])
                .with_ally_actions(&[a(Vanquish), a(PlayCard)]),
        ]
    }

    fn cards(&self) -> Vec<CardDefinition> {
        use CardCategory::{Ally, Condition, Curse, Effect, FateEffect, Hero, HeroItem, Item};
        let villain = |name: &str, category, cost, copies, text: &str| {
            CardDefinition::new(NAME, name, category)
                .with_cost(cost)
                .with_copies(copies)
                .with_description(text)
        };
        let fate = |name: &str, category, copies, text: &str| {
            CardDefinition::new(NAME, name, category)
                .with_copies(copies)
                .with_description(text)
        };

        vec![
            villain("Cackling Goon", Ally, 1, 3, "Cackling Goon gets +1 Strength for each Hero at his location.")
                .with_strength(1)
                .with_behavior(CacklingGoon),
            villain("Savage Goon", Ally, 3, 3, "No additional Ability.").with_strength(4),
            villain("Sinister Goon", Ally, 2, 3, "Sinister Goon gets +1 Strength if there are any Curses at his location.")
                .with_strength(3)
                .with_behavior(SinisterGoon),
            villain("Raven", Ally, 3, 1, "Before Maleficent moves, you may move Raven to any location and perform one available action at his new location. Raven cannot perform Fate actions.")
                .with_strength(1)
                .with_behavior(Raven),
            villain("Dragon Form", Effect, 1, 3, "Defeat a Hero with a Strength of 3 or less. If a Fate action targets you before your next turn, gain 3 Power.")
                .with_behavior(DragonForm),
            villain("Vanish", Effect, 0, 3, "At the start of your next turn, Maleficent does not have to move to a new location.")
                .with_behavior(Vanish),
            villain("Forest of Thorns", Curse, 3, 3, "Heroes must have a Strength of 4 or more to be played to this location. Discard this Curse when a Hero is played to this location.")
                .with_behavior(ForestOfThorns),
            villain("Green Fire", Curse, 3, 3, "Heroes cannot be played to this location. Discard this Curse if Maleficent moves to this location.")
                .with_behavior(GreenFire),
            villain(DREAMLESS_SLEEP, Curse, 3, 2, "Heroes at this location get -2 Strength. Discard this Curse when an Ally is played to this location.")
                .with_behavior(DreamlessSleep),
            villain("Malice", Condition, 2, 2, "During their turn, if another player defeats a Hero with a Strength of 4 or more, you may play Malice. Defeat a Hero with a Strength of 4 or less.")
                .with_behavior(Malice),
            villain("Tyranny", Condition, 2, 2, "During their turn, if another player has three or more Allies in their Realm, you may play Tyranny. Draw three cards into your hand, then discard any three cards.")
                .with_behavior(Tyranny),
            villain("Spinning Wheel", Item, 1, 1, "If a Hero is defeated at this location, gain Power equal to the Hero's Strength minus 1.")
                .with_behavior(SpinningWheel),
            villain("Staff", Item, 1, 1, "If Maleficent is at this location, the Cost to play an Effect or Curse is reduced by 1 Power.")
                .with_behavior(Staff),
            fate("Guards", Hero, 3, "When performing a Vanquish action to defeat Guards, at least two Allies must be used.")
                .with_strength(3)
                .with_behavior(Guards),
            fate("Sword of Truth", HeroItem, 3, "When Sword of Truth is played, attach it to a Hero with no other attached Items. That Hero gets +2 Strength. The Cost to play a Curse to this location is increased by 2 Power.")
                .with_strength(2)
                .with_behavior(SwordOfTruth),
            fate("Once Upon a Dream", FateEffect, 2, "Discard a Curse from a location in Maleficent's Realm that has a Hero.")
                .with_behavior(OnceUponADream),
            fate("Aurora", Hero, 1, "When Aurora is played, reveal the top card of Maleficent's Fate deck. If it is a Hero, play it. Otherwise, return it to the top of the deck.")
                .with_strength(4)
                .with_behavior(Aurora),
            fate("Fauna", Hero, 1, "When Fauna is played, you may discard Dreamless Sleep from her location.")
                .with_strength(2)
                .with_behavior(Fauna),
            fate("Flora", Hero, 1, "When Flora is played, Maleficent must reveal her hand. Until Flora is defeated, Maleficent must play with her hand revealed.")
                .with_strength(3)
                .with_behavior(Flora),
            fate("King Hubert", Hero, 1, "When King Hubert is played, you may move one Ally from each adjacent location to his location.")
                .with_strength(3)
                .with_behavior(KingHubert),
            fate("King Stefan", Hero, 1, "When King Stefan is played, you may move Maleficent to any location.")
                .with_strength(4)
                .with_behavior(KingStefan),
            fate("Merryweather", Hero, 1, "Curses cannot be played to Merryweather's location.")
                .with_strength(4)
                .with_behavior(Merryweather),
            fate("Prince Phillip", Hero, 1, "When Prince Phillip is played, you may discard all Allies from his location.")
                .with_strength(5)
                .with_behavior(PrincePhillip),
        ]
    }

    fn has_won(&self, game: &Game, player: PlayerId) -> bool {
        game.player(player).is_ok_and(|p| {
            !p.locations.is_empty()
                && p.locations
                    .iter()
                    .all(|l| !l.cards_of(&game.cards, Side::Ally, CardCategory::Curse).is_empty())
        })
    }
}

fn location_of(game: &Game, card: EntityId) -> Option<usize> {
    game.cards.get(card).and_then(|c| c.location())
}

fn is_category(game: &Game, card: EntityId, category: CardCategory) -> bool {
    game.cards.get(card).is_some_and(|c| c.is(category))
}

/// Top-level cards of `category` on the ally side of one of `player`'s locations.
fn ally_side(
    game: &Game,
    player: PlayerId,
    location: usize,
    category: CardCategory,
) -> Vec<EntityId> {
    game.player(player)
        .and_then(|p| p.location(location))
        .map(|l| l.cards_of(&game.cards, Side::Ally, category))
        .unwrap_or_default()
}

fn heroes_at(game: &Game, player: PlayerId, location: usize) -> Vec<EntityId> {
    game.player(player)
        .and_then(|p| p.location(location))
        .map(|l| l.heroes(&game.cards))
        .unwrap_or_default()
}

/// Heroes on `player`'s board with at most `max` strength.
fn heroes_up_to(game: &Game, player: PlayerId, max: i32) -> Vec<EntityId> {
    game.heroes(player)
        .into_iter()
        .filter(|&hero| matches!(game.card_strength(hero), Ok(Some(s)) if s <= max))
        .collect()
}

/// Ask the card owner which of `heroes` to defeat, then defeat it.
async fn defeat_one(
    game: &mut Game,
    hub: &dyn GameHub,
    player: PlayerId,
    heroes: &[EntityId],
) -> Result<(), GameError> {
    let question = Question::ChooseHeroToVanquish {
        heroes: game.card_views(heroes)?,
    };
    let hero = heroes[choose_one(hub, player, question, heroes.len()).await?];
    game.defeat_hero_directly(hub, player, hero).await
}

// ---------------------------------------------------------------------------
// Allies
// ---------------------------------------------------------------------------

struct CacklingGoon;

#[async_trait]
impl CardBehavior for CacklingGoon {
    fn strength_bonus(&self, game: &Game, card: EntityId) -> Option<i32> {
        let owner = game.cards.get(card)?.owner;
        let heroes = heroes_at(game, owner, location_of(game, card)?);
        i32::try_from(heroes.len()).ok()
    }
}

struct SinisterGoon;

#[async_trait]
impl CardBehavior for SinisterGoon {
    fn strength_bonus(&self, game: &Game, card: EntityId) -> Option<i32> {
        let owner = game.cards.get(card)?.owner;
        let curses = ally_side(game, owner, location_of(game, card)?, CardCategory::Curse);
        (!curses.is_empty()).then_some(1)
    }
}

struct Raven;

#[async_trait]
impl CardBehavior for Raven {
    fn can_activate(&self, game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::BeforeVillainMove
            && location_of(game, activation.card).is_some()
    }

    async fn activate(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let Activation { owner, card, .. } = activation;
        let question = Question::PerformSpecial {
            card: game.card_view(card)?,
        };
        if !confirm(hub, owner, question).await? {
            return Ok(());
        }

        let here = location_of(game, card);
        let locations: Vec<usize> = game
            .player(owner)?
            .locations
            .iter()
            .filter(|l| !l.locked && Some(l.index) != here)
            .map(|l| l.index)
            .collect();
        let question = Question::ChooseSpecialLocation {
            card: game.card_view(card)?,
            locations: game.location_views(owner, &locations)?,
        };
        let to = locations[choose_one(hub, owner, question, locations.len()).await?];
        game.move_card(card, to)?;

        let actions: Vec<Action> = game
            .location_actions(owner, to)?
            .into_iter()
            .filter(|a| a.is_available() && a.template.kind != ActionKind::Fate)
            .collect();
        if actions.is_empty() {
            return Ok(());
        }
        let question = Question::ChooseSpecialAction {
            card: game.card_view(card)?,
            actions: actions.clone(),
        };
        let action = actions[choose_one(hub, owner, question, actions.len()).await?];
        game.perform_special_action(hub, owner, to, action.index).await
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

struct DragonForm;

#[async_trait]
impl CardBehavior for DragonForm {
    fn can_activate(&self, game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnPlay && !heroes_up_to(game, activation.owner, 3).is_empty()
    }

    async fn activate(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let heroes = heroes_up_to(game, activation.owner, 3);
        defeat_one(game, hub, activation.owner, &heroes).await?;
        game.subscribe(
            Subscription::notification(activation.owner, activation.card, NotificationKind::Fated)
                .lasting(Duration::UntilStartOfNextTurn),
        );
        Ok(())
    }

    fn on_notification(
        &self,
        game: &mut Game,
        sub: &Subscription,
        _event: &Notification,
    ) -> Result<(), GameError> {
        game.player_mut(sub.player)?.gain_power(3);
        Ok(())
    }
}

struct Vanish;

#[async_trait]
impl CardBehavior for Vanish {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnPlay
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        game.subscribe(
            Subscription::query(activation.owner, activation.card, QueryKind::NeedsToMove)
                .lasting(Duration::UntilAfterVillainMove),
        );
        Ok(())
    }

    fn answer(&self, _game: &Game, _sub: &Subscription, query: &Query) -> Option<QueryValue> {
        matches!(query, Query::NeedsToMove).then_some(QueryValue::Bool(false))
    }
}

// ---------------------------------------------------------------------------
// Curses
// ---------------------------------------------------------------------------

struct ForestOfThorns;

#[async_trait]
impl CardBehavior for ForestOfThorns {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnPlay
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let Activation { owner, card, .. } = activation;
        game.subscribe(Subscription::query(owner, card, QueryKind::CanFate));
        game.subscribe(Subscription::notification(owner, card, NotificationKind::Fated));
        Ok(())
    }

    fn answer(&self, game: &Game, sub: &Subscription, query: &Query) -> Option<QueryValue> {
        let Query::CanFate { card, location } = *query else {
            return None;
        };
        if Some(location) != location_of(game, sub.card)
            || !is_category(game, card, CardCategory::Hero)
        {
            return None;
        }
        let strength = game.card_strength(card).ok().flatten().unwrap_or(0);
        Some(QueryValue::Bool(strength >= 4))
    }

    fn on_notification(
        &self,
        game: &mut Game,
        sub: &Subscription,
        event: &Notification,
    ) -> Result<(), GameError> {
        if let Notification::Fated { card } = *event {
            if is_category(game, card, CardCategory::Hero)
                && location_of(game, card).is_some()
                && location_of(game, card) == location_of(game, sub.card)
            {
                game.discard_from_board(sub.card)?;
            }
        }
        Ok(())
    }
}

struct GreenFire;

#[async_trait]
impl CardBehavior for GreenFire {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnPlay
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let Activation { owner, card, .. } = activation;
        game.subscribe(Subscription::query(owner, card, QueryKind::CanFate));
        game.subscribe(Subscription::notification(owner, card, NotificationKind::VillainMoved));
        Ok(())
    }

    fn answer(&self, game: &Game, sub: &Subscription, query: &Query) -> Option<QueryValue> {
        let Query::CanFate { card, location } = *query else {
            return None;
        };
        let here = Some(location) == location_of(game, sub.card);
        (here && is_category(game, card, CardCategory::Hero)).then_some(QueryValue::Bool(false))
    }

    fn on_notification(
        &self,
        game: &mut Game,
        sub: &Subscription,
        event: &Notification,
    ) -> Result<(), GameError> {
        if let Notification::VillainMoved { location } = *event {
            if Some(location) == location_of(game, sub.card) {
                game.discard_from_board(sub.card)?;
            }
        }
        Ok(())
    }
}

struct DreamlessSleep;

#[async_trait]
impl CardBehavior for DreamlessSleep {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnPlay
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let Activation { owner, card, .. } = activation;
        game.subscribe(Subscription::query(owner, card, QueryKind::StrengthBonus));
        game.subscribe(Subscription::notification(owner, card, NotificationKind::CardPlayed));
        Ok(())
    }

    fn answer(&self, game: &Game, sub: &Subscription, query: &Query) -> Option<QueryValue> {
        let Query::StrengthBonus { card } = *query else {
            return None;
        };
        let here = location_of(game, sub.card)?;
        (is_category(game, card, CardCategory::Hero) && location_of(game, card) == Some(here))
            .then_some(QueryValue::Int(-2))
    }

    fn on_notification(
        &self,
        game: &mut Game,
        sub: &Subscription,
        event: &Notification,
    ) -> Result<(), GameError> {
        if let Notification::CardPlayed { card } = *event {
            if is_category(game, card, CardCategory::Ally)
                && location_of(game, card).is_some()
                && location_of(game, card) == location_of(game, sub.card)
            {
                game.discard_from_board(sub.card)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

struct Malice;

#[async_trait]
impl CardBehavior for Malice {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnReceive
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        game.subscribe(
            Subscription::interrupt(
                activation.owner,
                activation.card,
                NotificationKind::HeroVanquished,
            )
            .for_others(),
        );
        Ok(())
    }

    async fn on_interrupt(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        sub: &Subscription,
        event: &Notification,
    ) -> Result<(), GameError> {
        let Notification::HeroVanquished { strength, .. } = *event else {
            return Ok(());
        };
        let owner = sub.player;
        if strength < 4 || !game.player(owner)?.hand.contains(&sub.card) {
            return Ok(());
        }
        let heroes = heroes_up_to(game, owner, 4);
        if heroes.is_empty() {
            return Ok(());
        }

        let question = Question::ActivateCondition {
            card: game.card_view(sub.card)?,
        };
        if !confirm(hub, owner, question).await? {
            return Ok(());
        }
        let question = Question::ChooseHeroToVanquish {
            heroes: game.card_views(&heroes)?,
        };
        let hero = heroes[choose_one(hub, owner, question, heroes.len()).await?];

        game.player_mut(owner)?.take(Zone::Hand, sub.card);
        game.player_mut(owner)?.villain_discard.push(sub.card);
        game.bus.card_discarded(sub.card);
        game.defeat_hero_directly(hub, owner, hero).await
    }
}

struct Tyranny;

#[async_trait]
impl CardBehavior for Tyranny {
    fn can_activate(&self, game: &Game, activation: Activation) -> bool {
        if activation.moment != Moment::OnCondition {
            return false;
        }
        let Ok(current) = game.current_player_id() else {
            return false;
        };
        let allies = game
            .board_cards(current)
            .into_iter()
            .filter(|&c| is_category(game, c, CardCategory::Ally))
            .count();
        current != activation.owner && allies >= 3
    }

    async fn activate(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let owner = activation.owner;
        game.draw_villain_cards(hub, owner, 3).await?;

        let hand = game.player(owner)?.hand.clone();
        let count = hand.len().min(3);
        let question = Question::ChooseCardsToDiscard {
            cards: game.card_views(&hand)?,
            min: count,
            max: count,
        };
        let picked = choose_many(hub, owner, question, hand.len(), count, count).await?;
        for index in picked {
            game.discard_from_hand(owner, hand[index])?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

struct SpinningWheel;

#[async_trait]
impl CardBehavior for SpinningWheel {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnPlay
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        game.subscribe(Subscription::notification(
            activation.owner,
            activation.card,
            NotificationKind::HeroVanquished,
        ));
        Ok(())
    }

    fn on_notification(
        &self,
        game: &mut Game,
        sub: &Subscription,
        event: &Notification,
    ) -> Result<(), GameError> {
        if let Notification::HeroVanquished {
            strength, location, ..
        } = *event
        {
            if Some(location) == location_of(game, sub.card) {
                game.player_mut(sub.player)?.gain_power((strength - 1).max(0));
            }
        }
        Ok(())
    }
}

struct Staff;

#[async_trait]
impl CardBehavior for Staff {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnPlay
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        game.subscribe(Subscription::query(
            activation.owner,
            activation.card,
            QueryKind::CostBonus,
        ));
        Ok(())
    }

    fn answer(&self, game: &Game, sub: &Subscription, query: &Query) -> Option<QueryValue> {
        let Query::CostBonus { card, location } = *query else {
            return None;
        };
        let here = location_of(game, sub.card)?;
        let villain_at = game.player(sub.player).ok()?.location_index;
        let kind = game.cards.get(card)?.category();
        let discounted = matches!(kind, CardCategory::Effect | CardCategory::Curse)
            && villain_at == here
            && location.unwrap_or(villain_at) == here;
        discounted.then_some(QueryValue::Int(-1))
    }
}

// ---------------------------------------------------------------------------
// Fate cards
// ---------------------------------------------------------------------------

struct Guards;

#[async_trait]
impl CardBehavior for Guards {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnFate
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        game.subscribe(Subscription::query(
            activation.owner,
            activation.card,
            QueryKind::RequiredAllyCount,
        ));
        Ok(())
    }

    fn answer(&self, _game: &Game, sub: &Subscription, query: &Query) -> Option<QueryValue> {
        matches!(*query, Query::RequiredAllyCount { hero } if hero == sub.card)
            .then_some(QueryValue::Int(2))
    }
}

struct SwordOfTruth;

#[async_trait]
impl CardBehavior for SwordOfTruth {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        matches!(activation.moment, Moment::OnReceive | Moment::OnFate)
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let Activation { owner, card, moment } = activation;
        let kind = if moment == Moment::OnReceive {
            QueryKind::CanFate
        } else {
            QueryKind::CostBonus
        };
        game.subscribe(Subscription::query(owner, card, kind));
        Ok(())
    }

    fn answer(&self, game: &Game, sub: &Subscription, query: &Query) -> Option<QueryValue> {
        match *query {
            Query::CanFate { card, location } if card == sub.card => {
                let free = game
                    .unequipped_heroes(sub.player, location)
                    .is_ok_and(|heroes| !heroes.is_empty());
                Some(QueryValue::Bool(free))
            }
            Query::CostBonus {
                card,
                location: Some(location),
            } => (is_category(game, card, CardCategory::Curse)
                && location_of(game, sub.card) == Some(location))
            .then_some(QueryValue::Int(2)),
            _ => None,
        }
    }
}

struct OnceUponADream;

impl OnceUponADream {
    fn locations(game: &Game, player: PlayerId) -> Vec<usize> {
        game.player(player)
            .map(|p| {
                p.locations
                    .iter()
                    .filter(|l| {
                        l.is_covered(&game.cards)
                            && !l.cards_of(&game.cards, Side::Ally, CardCategory::Curse).is_empty()
                    })
                    .map(|l| l.index)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl CardBehavior for OnceUponADream {
    fn can_activate(&self, game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnFate && !Self::locations(game, activation.owner).is_empty()
    }

    async fn activate(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let Activation { owner, card, .. } = activation;
        let asker = game.current_player_id()?;
        let locations = Self::locations(game, owner);
        let question = Question::ChooseSpecialLocation {
            card: game.card_view(card)?,
            locations: game.location_views(owner, &locations)?,
        };
        let location = locations[choose_one(hub, asker, question, locations.len()).await?];

        let curses = ally_side(game, owner, location, CardCategory::Curse);
        let question = Question::ChooseSpecialCard {
            card: game.card_view(card)?,
            cards: game.card_views(&curses)?,
            optional: false,
        };
        let curse = curses[choose_one(hub, asker, question, curses.len()).await?];
        game.discard_from_board(curse)
    }
}

struct Aurora;

#[async_trait]
impl CardBehavior for Aurora {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnFate
    }

    async fn activate(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let owner = activation.owner;
        let Some(&revealed) = game.draw_fate_cards(hub, owner, 1).await?.first() else {
            return Ok(());
        };
        if is_category(game, revealed, CardCategory::Hero)
            && game.can_play_fate_card(owner, revealed)
        {
            let current = game.current_player_id()?;
            return game.play_fate_card(hub, current, owner, revealed, &[]).await;
        }
        game.bus.card_discarded(revealed);
        game.player_mut(owner)?.fate_deck.push(revealed);
        Ok(())
    }
}

struct Fauna;

impl Fauna {
    fn sleep_here(game: &Game, owner: PlayerId, card: EntityId) -> Option<EntityId> {
        ally_side(game, owner, location_of(game, card)?, CardCategory::Curse)
            .into_iter()
            .find(|&c| game.cards.get(c).is_some_and(|c| c.name() == DREAMLESS_SLEEP))
    }
}

#[async_trait]
impl CardBehavior for Fauna {
    fn can_activate(&self, game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnFate
            && Self::sleep_here(game, activation.owner, activation.card).is_some()
    }

    async fn activate(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let Some(sleep) = Self::sleep_here(game, activation.owner, activation.card) else {
            return Ok(());
        };
        let asker = game.current_player_id()?;
        let question = Question::PerformSpecial {
            card: game.card_view(activation.card)?,
        };
        if confirm(hub, asker, question).await? {
            game.discard_from_board(sleep)?;
        }
        Ok(())
    }
}

struct Flora;

#[async_trait]
impl CardBehavior for Flora {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnFate
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        game.subscribe(Subscription::query(
            activation.owner,
            activation.card,
            QueryKind::CardsRevealed,
        ));
        Ok(())
    }

    fn answer(&self, _game: &Game, _sub: &Subscription, query: &Query) -> Option<QueryValue> {
        matches!(query, Query::CardsRevealed).then_some(QueryValue::Bool(true))
    }
}

struct KingHubert;

#[async_trait]
impl CardBehavior for KingHubert {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnFate
    }

    async fn activate(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let Activation { owner, card, .. } = activation;
        let Some(here) = location_of(game, card) else {
            return Ok(());
        };
        let asker = game.current_player_id()?;
        let count = game.player(owner)?.locations.len();

        for neighbour in [here.checked_sub(1), Some(here + 1)].into_iter().flatten() {
            if neighbour >= count {
                continue;
            }
            let allies = ally_side(game, owner, neighbour, CardCategory::Ally);
            if allies.is_empty() {
                continue;
            }
            let question = Question::ChooseSpecialCard {
                card: game.card_view(card)?,
                cards: game.card_views(&allies)?,
                optional: true,
            };
            if let Some(index) = choose_optional(hub, asker, question, allies.len()).await? {
                game.move_card(allies[index], here)?;
            }
        }
        Ok(())
    }
}

struct KingStefan;

#[async_trait]
impl CardBehavior for KingStefan {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnFate
    }

    async fn activate(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let asker = game.current_player_id()?;
        game.move_villain(hub, activation.owner, asker, true).await
    }
}

struct Merryweather;

#[async_trait]
impl CardBehavior for Merryweather {
    fn can_activate(&self, _game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnFate
    }

    async fn activate(
        &self,
        game: &mut Game,
        _hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        game.subscribe(Subscription::query(
            activation.owner,
            activation.card,
            QueryKind::CanPlayCard,
        ));
        Ok(())
    }

    fn answer(&self, game: &Game, sub: &Subscription, query: &Query) -> Option<QueryValue> {
        let Query::CanPlayCard { card, location } = *query else {
            return None;
        };
        let here = location_of(game, sub.card) == Some(location);
        (here && is_category(game, card, CardCategory::Curse)).then_some(QueryValue::Bool(false))
    }
}

struct PrincePhillip;

impl PrincePhillip {
    fn allies_here(game: &Game, owner: PlayerId, card: EntityId) -> Vec<EntityId> {
        location_of(game, card)
            .map(|here| ally_side(game, owner, here, CardCategory::Ally))
            .unwrap_or_default()
    }
}

#[async_trait]
impl CardBehavior for PrincePhillip {
    fn can_activate(&self, game: &Game, activation: Activation) -> bool {
        activation.moment == Moment::OnFate
            && !Self::allies_here(game, activation.owner, activation.card).is_empty()
    }

    async fn activate(
        &self,
        game: &mut Game,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<(), GameError> {
        let asker = game.current_player_id()?;
        let question = Question::PerformSpecial {
            card: game.card_view(activation.card)?,
        };
        if !confirm(hub, asker, question).await? {
            return Ok(());
        }
        for ally in Self::allies_here(game, activation.owner, activation.card) {
            game.discard_from_board(ally)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_sizes() {
        let cards = Maleficent.cards();
        let villain: usize = cards.iter().filter(|c| !c.category.is_fate()).map(|c| c.copies).sum();
        let fate: usize = cards.iter().filter(|c| c.category.is_fate()).map(|c| c.copies).sum();
        assert_eq!(villain, 30);
        assert_eq!(fate, 15);
    }

    #[test]
    fn test_realm() {
        let locations = Maleficent.locations();
        assert_eq!(locations.len(), 4);
        assert_eq!(locations[3].name, "King Stefan's Castle");
        assert_eq!(locations[3].hero_actions[1].kind, ActionKind::Fate);
        assert_eq!(locations[2].ally_actions[0], ActionTemplate::gain_power(3));
        assert!(locations.iter().all(|l| !l.locked));
    }

    #[test]
    fn test_fate_cards_have_no_cost() {
        assert!(Maleficent
            .cards()
            .iter()
            .filter(|c| c.category.is_fate())
            .all(|c| c.cost.is_none()));
    }
}
