//! Effect bus: how card abilities hook into the rules.
//!
//! ## Key Types
//!
//! - `Notification` / `Query`: the events the engine publishes and asks about
//! - `Subscription`: a card's registration (scope, duration)
//! - `EffectBus`: the handler tables
//!
//! Dispatch itself (calling into [`CardBehavior`](crate::cards::CardBehavior))
//! lives on [`Game`](crate::game::Game), which owns both the bus and the cards.

pub mod bus;
pub mod event;

pub use bus::{Duration, EffectBus, Scope, Subscription, SubscriptionId, Trigger};
pub use event::{
    add_optional, Notification, NotificationKind, Query, QueryKind, QueryValue,
};
