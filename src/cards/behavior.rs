//! Card abilities.
//!
//! The engine never looks at card names. Everything a card's text does goes
//! through [`CardBehavior`]:
//!
//! - `can_activate` / `activate` are invoked by the turn algorithm at the
//!   [`Moment`](super::Moment)s it defines.
//! - `strength_bonus` / `cost_bonus` are the card's own static modifiers.
//! - `answer`, `on_notification` and `on_interrupt` run the subscriptions the
//!   card registered on the effect bus.
//!
//! Every method has a no-op default, so a vanilla card is `NoAbility`.

use async_trait::async_trait;

use crate::core::{EntityId, GameError, PlayerId};
use crate::effects::{Notification, Query, QueryValue, Subscription};
use crate::game::Game;
use crate::hub::GameHub;

use super::definition::Moment;

/// Who activates which card, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Activation {
    /// Owner of the card.
    pub owner: PlayerId,
    pub card: EntityId,
    pub moment: Moment,
}

impl Activation {
    #[must_use]
    pub const fn new(owner: PlayerId, card: EntityId, moment: Moment) -> Self {
        Self {
            owner,
            card,
            moment,
        }
    }
}

/// The capability interface every card implements.
#[async_trait]
pub trait CardBehavior: Send + Sync {
    /// Can this card's ability trigger at `activation.moment` right now?
    fn can_activate(&self, _game: &Game, _activation: Activation) -> bool {
        false
    }

    /// Resolve the ability. Only called when `can_activate` holds.
    async fn activate(
        &self,
        _game: &mut Game,
        _hub: &dyn GameHub,
        _activation: Activation,
    ) -> Result<(), GameError> {
        Ok(())
    }

    /// Static strength modifier, applied while the card is on the board.
    fn strength_bonus(&self, _game: &Game, _card: EntityId) -> Option<i32> {
        None
    }

    /// Static cost modifier when played to `location`.
    fn cost_bonus(&self, _game: &Game, _card: EntityId, _location: Option<usize>) -> Option<i32> {
        None
    }

    /// Answer a query this card subscribed to. `None` means no opinion.
    fn answer(
        &self,
        _game: &Game,
        _subscription: &Subscription,
        _query: &Query,
    ) -> Option<QueryValue> {
        None
    }

    /// React to a notification this card subscribed to.
    fn on_notification(
        &self,
        _game: &mut Game,
        _subscription: &Subscription,
        _event: &Notification,
    ) -> Result<(), GameError> {
        Ok(())
    }

    /// React to a notification with the ability to ask players.
    async fn on_interrupt(
        &self,
        _game: &mut Game,
        _hub: &dyn GameHub,
        _subscription: &Subscription,
        _event: &Notification,
    ) -> Result<(), GameError> {
        Ok(())
    }
}

/// A card with no text.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAbility;

#[async_trait]
impl CardBehavior for NoAbility {}
