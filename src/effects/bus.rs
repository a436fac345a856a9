//! The effect bus.
//!
//! Cards subscribe to notifications and queries while they are in play (or in
//! hand, for conditions). The engine publishes notifications at fixed points
//! of the turn and queries the bus whenever it computes a cost, a strength or
//! a permission.
//!
//! Three tables are kept, each indexed by event kind:
//!
//! - notification handlers: synchronous, run in registration order,
//! - interrupt handlers: may ask players, run after the synchronous ones,
//! - query handlers: answer a [`Query`](super::Query).
//!
//! A subscription is scoped to the player who registered it. `Owner`
//! subscriptions only see events where that player is acting; `Others`
//! subscriptions only see events where somebody else is.
//!
//! Subscriptions end when their card is discarded ([`EffectBus::card_discarded`])
//! or when their [`Duration`] boundary is reached ([`EffectBus::duration_ended`]).
//! The bus does not know about cards or turns: callers are responsible for
//! invoking both at the right time.

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};

use super::event::{NotificationKind, QueryKind};

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

impl SubscriptionId {
    /// Create a new subscription ID.
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

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscription({})", self.0)
    }
}

/// Whose actions a subscription reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scope {
    /// Only when the registering player is acting.
    #[default]
    Owner,
    /// Only when another player is acting.
    Others,
}

/// When a subscription expires on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Duration {
    /// Lives until its card is discarded.
    #[default]
    UntilDiscarded,
    /// Ends when the registering player's next turn starts.
    UntilStartOfNextTurn,
    /// Ends after the registering player's next villain move.
    UntilAfterVillainMove,
}

/// What a subscription listens for, and in which table it lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    Notification(NotificationKind),
    Interrupt(NotificationKind),
    Query(QueryKind),
}

/// A card's registration on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Assigned by the bus.
    pub id: SubscriptionId,
    /// Player who registered it.
    pub player: PlayerId,
    /// Card whose ability answers it.
    pub card: EntityId,
    pub trigger: Trigger,
    pub scope: Scope,
    pub duration: Duration,
}

impl Subscription {
    /// Create a subscription scoped to its owner, lasting until discarded.
    #[must_use]
    pub fn new(player: PlayerId, card: EntityId, trigger: Trigger) -> Self {
        Self {
            id: SubscriptionId::new(0),
            player,
            card,
            trigger,
            scope: Scope::Owner,
            duration: Duration::UntilDiscarded,
        }
    }

    /// Synchronous notification handler.
    #[must_use]
    pub fn notification(player: PlayerId, card: EntityId, kind: NotificationKind) -> Self {
        Self::new(player, card, Trigger::Notification(kind))
    }

    /// Interrupt handler, allowed to ask players.
    #[must_use]
    pub fn interrupt(player: PlayerId, card: EntityId, kind: NotificationKind) -> Self {
        Self::new(player, card, Trigger::Interrupt(kind))
    }

    /// Query handler.
    #[must_use]
    pub fn query(player: PlayerId, card: EntityId, kind: QueryKind) -> Self {
        Self::new(player, card, Trigger::Query(kind))
    }

    /// React to other players instead (builder pattern).
    #[must_use]
    pub fn for_others(mut self) -> Self {
        self.scope = Scope::Others;
        self
    }

    /// Set the duration (builder pattern).
    #[must_use]
    pub fn lasting(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Does this subscription see events where `acting` is the actor?
    #[must_use]
    pub fn fires_for(&self, acting: PlayerId) -> bool {
        match self.scope {
            Scope::Owner => acting == self.player,
            Scope::Others => acting != self.player,
        }
    }
}

/// Subscription tables.
#[derive(Clone, Debug, Default)]
pub struct EffectBus {
    notifications: FxHashMap<NotificationKind, Vec<Subscription>>,
    interrupts: FxHashMap<NotificationKind, Vec<Subscription>>,
    queries: FxHashMap<QueryKind, Vec<Subscription>>,
    next_id: u32,
}

impl EffectBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription, returns its ID.
    pub fn subscribe(&mut self, mut subscription: Subscription) -> SubscriptionId {
        self.next_id += 1;
        subscription.id = SubscriptionId::new(self.next_id);
        debug!(
            "bus: {} registers {:?} for {} ({:?}, {:?})",
            subscription.card,
            subscription.trigger,
            subscription.player,
            subscription.scope,
            subscription.duration
        );

        match subscription.trigger {
            Trigger::Notification(kind) => {
                self.notifications.entry(kind).or_default().push(subscription)
            }
            Trigger::Interrupt(kind) => self.interrupts.entry(kind).or_default().push(subscription),
            Trigger::Query(kind) => self.queries.entry(kind).or_default().push(subscription),
        }
        subscription.id
    }

    /// Remove one subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<Subscription> {
        let mut removed = None;
        self.remove_where(|s| {
            let hit = s.id == id;
            if hit {
                removed = Some(*s);
            }
            hit
        });
        removed
    }

    /// Is the subscription still registered?
    #[must_use]
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.iter().any(|s| s.id == id)
    }

    /// Synchronous notification handlers that fire for `acting`, in order.
    #[must_use]
    pub fn notification_handlers(
        &self,
        kind: NotificationKind,
        acting: PlayerId,
    ) -> Vec<Subscription> {
        matching(self.notifications.get(&kind), acting)
    }

    /// Interrupt handlers that fire for `acting`, in order.
    #[must_use]
    pub fn interrupt_handlers(
        &self,
        kind: NotificationKind,
        acting: PlayerId,
    ) -> Vec<Subscription> {
        matching(self.interrupts.get(&kind), acting)
    }

    /// Query handlers that fire for `acting`, in order.
    #[must_use]
    pub fn query_handlers(&self, kind: QueryKind, acting: PlayerId) -> Vec<Subscription> {
        matching(self.queries.get(&kind), acting)
    }

    /// Drop every subscription owned by `card`. Returns how many were removed.
    pub fn card_discarded(&mut self, card: EntityId) -> usize {
        let removed = self.remove_where(|s| s.card == card);
        if removed > 0 {
            debug!("bus: {card} discarded, {removed} subscriptions removed");
        }
        removed
    }

    /// Drop every subscription with `duration`, whoever registered it.
    pub fn duration_ended(&mut self, duration: Duration) -> usize {
        self.remove_where(|s| s.duration == duration)
    }

    /// Drop the subscriptions with `duration` registered by `player`.
    pub fn duration_ended_for(&mut self, player: PlayerId, duration: Duration) -> usize {
        let removed = self.remove_where(|s| s.player == player && s.duration == duration);
        if removed > 0 {
            debug!("bus: {duration:?} ended for {player}, {removed} subscriptions removed");
        }
        removed
    }

    /// Drop everything a departing player registered.
    pub fn player_left(&mut self, player: PlayerId) -> usize {
        self.remove_where(|s| s.player == player)
    }

    /// Iterate over every subscription.
    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.notifications
            .values()
            .chain(self.interrupts.values())
            .chain(self.queries.values())
            .flatten()
    }

    /// Subscriptions owned by `card`.
    #[must_use]
    pub fn subscriptions_of(&self, card: EntityId) -> usize {
        self.iter().filter(|s| s.card == card).count()
    }

    /// Total number of subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove_where(&mut self, mut predicate: impl FnMut(&Subscription) -> bool) -> usize {
        let mut removed = 0;
        removed += retain_tables(&mut self.notifications, &mut predicate);
        removed += retain_tables(&mut self.interrupts, &mut predicate);
        removed += retain_tables(&mut self.queries, &mut predicate);
        removed
    }
}

fn matching(list: Option<&Vec<Subscription>>, acting: PlayerId) -> Vec<Subscription> {
    list.map(|subs| subs.iter().filter(|s| s.fires_for(acting)).copied().collect())
        .unwrap_or_default()
}

fn retain_tables<K>(
    table: &mut FxHashMap<K, Vec<Subscription>>,
    predicate: &mut impl FnMut(&Subscription) -> bool,
) -> usize
where
    K: std::hash::Hash + Eq,
{
    let mut removed = 0;
    for list in table.values_mut() {
        let before = list.len();
        list.retain(|s| !predicate(s));
        removed += before - list.len();
    }
    table.retain(|_, list| !list.is_empty());
    removed
}
