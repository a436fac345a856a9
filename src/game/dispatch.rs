//! Running the effect bus against the game.
//!
//! The bus only stores subscriptions. Dispatch looks up the card behind each
//! subscription and calls its [`CardBehavior`] with the whole game, so
//! handlers may read anything and (for notifications) change anything,
//! including the bus itself. Handler lists are snapshotted before dispatch;
//! a subscription removed by an earlier handler is skipped.

use std::sync::Arc;

use log::trace;

use crate::cards::{Activation, CardBehavior};
use crate::core::{EntityId, GameError, PlayerId};
use crate::effects::{event, Notification, Query, QueryValue, Subscription, SubscriptionId};
use crate::hub::GameHub;

use super::Game;

impl Game {
    /// Register a subscription on the bus.
    pub fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId {
        self.bus.subscribe(subscription)
    }

    fn behavior_of(&self, card: EntityId) -> Option<Arc<dyn CardBehavior>> {
        self.cards
            .get(card)
            .map(|c| Arc::clone(&c.definition.behavior))
    }

    /// Every subscribed card's answer to `query`, in registration order.
    #[must_use]
    pub fn query(&self, acting: PlayerId, query: Query) -> Vec<Option<QueryValue>> {
        self.bus
            .query_handlers(query.kind(), acting)
            .iter()
            .map(|sub| {
                self.cards
                    .get(sub.card)
                    .and_then(|card| card.definition.behavior.answer(self, sub, &query))
            })
            .collect()
    }

    /// Sum of the numeric answers.
    #[must_use]
    pub fn query_sum(&self, acting: PlayerId, query: Query) -> Option<i32> {
        event::sum(self.query(acting, query))
    }

    /// Largest numeric answer.
    #[must_use]
    pub fn query_max(&self, acting: PlayerId, query: Query) -> Option<i32> {
        event::max(self.query(acting, query))
    }

    /// Nobody vetoed.
    #[must_use]
    pub fn query_all(&self, acting: PlayerId, query: Query) -> bool {
        event::all(self.query(acting, query))
    }

    /// Somebody agreed.
    #[must_use]
    pub fn query_any(&self, acting: PlayerId, query: Query) -> bool {
        event::any(self.query(acting, query))
    }

    /// Publish `event` with `acting` as the actor.
    ///
    /// Synchronous handlers run first, then interrupt handlers, each group in
    /// registration order.
    pub async fn publish(
        &mut self,
        hub: &dyn GameHub,
        acting: PlayerId,
        event: Notification,
    ) -> Result<(), GameError> {
        trace!("bus: publish {event:?} for {acting}");
        let kind = event.kind();

        for sub in self.bus.notification_handlers(kind, acting) {
            if !self.bus.contains(sub.id) {
                continue;
            }
            if let Some(behavior) = self.behavior_of(sub.card) {
                behavior.on_notification(self, &sub, &event)?;
            }
        }

        for sub in self.bus.interrupt_handlers(kind, acting) {
            if !self.bus.contains(sub.id) {
                continue;
            }
            if let Some(behavior) = self.behavior_of(sub.card) {
                behavior.on_interrupt(self, hub, &sub, &event).await?;
            }
        }
        Ok(())
    }

    /// Would the card's ability trigger?
    #[must_use]
    pub fn can_activate(&self, activation: Activation) -> bool {
        self.behavior_of(activation.card)
            .is_some_and(|behavior| behavior.can_activate(self, activation))
    }

    /// Run the card's ability if it can trigger. Returns whether it ran.
    pub async fn activate(
        &mut self,
        hub: &dyn GameHub,
        activation: Activation,
    ) -> Result<bool, GameError> {
        let Some(behavior) = self.behavior_of(activation.card) else {
            return Ok(false);
        };
        if !behavior.can_activate(self, activation) {
            return Ok(false);
        }
        trace!(
            "bus: activate {} for {} at {:?}",
            activation.card,
            activation.owner,
            activation.moment
        );
        behavior.activate(self, hub, activation).await?;
        Ok(true)
    }
}
