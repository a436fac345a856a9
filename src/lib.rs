//! # villainous
//!
//! An authoritative rules engine for Villainous-style games.
//!
//! ## Design Principles
//!
//! 1. **Server-authoritative**: every rule is enforced here. Remote players
//!    only ever answer typed questions through [`GameHub`].
//!
//! 2. **Characters are data plus behaviour**: a [`Villain`] supplies its
//!    locations and card list; each card's text is a [`CardBehavior`]. The
//!    rules never look at card names.
//!
//! 3. **Abilities go through the bus**: cards subscribe to notifications and
//!    queries on the [`EffectBus`] instead of patching the rules.
//!
//! ## Architecture
//!
//! - **One arena per game**: card instances live in a [`CardStore`] and are
//!   referred to by [`EntityId`]. Zones and location stacks hold ids only.
//!
//! - **Resumable turns**: a turn is a sequence of [`game::TurnPhase`]s stored
//!   on the game, so a rejected answer never loses progress.
//!
//! - **One lock per table**: the [`Lobby`] hands out `Arc<Mutex<Game>>`s held
//!   for whole operations, question round trips included.
//!
//! ## Modules
//!
//! - `core`: Entity and player IDs, actions, configuration, RNG, errors
//! - `cards`: Card definitions, behaviours, instances and storage
//! - `board`: Locations and their card stacks
//! - `effects`: Notifications, queries and the subscription tables
//! - `player`: Zones, power and the player's board
//! - `rules`: Costs, strengths, playing, moving, vanquishing, action resolution
//! - `game`: One table, its turn algorithm and consistency checks
//! - `lobby`: The table registry and command dispatch
//! - `hub`: Questions, answers, broadcasts, views and the reference bot
//! - `villains`: Playable characters

pub mod core;
pub mod cards;
pub mod board;
pub mod effects;
pub mod player;
pub mod rules;
pub mod game;
pub mod lobby;
pub mod hub;
pub mod villains;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionKind, ActionTemplate, EntityId, ErrorKind, GameConfig, GameError, GameRng,
    HubError, PlayerId,
};

pub use crate::cards::{
    Activation, Card, CardBehavior, CardCategory, CardDefinition, CardId, CardRegistry,
    CardStore, Moment, NoAbility, Placement, Side,
};

pub use crate::board::{Location, LocationTemplate, PlayTarget};

pub use crate::effects::{
    Duration, EffectBus, Notification, NotificationKind, Query, QueryKind, QueryValue, Scope,
    Subscription, SubscriptionId,
};

pub use crate::player::{Player, Zone};

pub use crate::rules::select_allies;

pub use crate::game::{Game, GameId, GameStatus, Removal, TurnContext, TurnOutcome, TurnPhase};

pub use crate::lobby::{Command, GameSummary, Lobby, Reply};

pub use crate::hub::{Answer, Bot, BotHub, Broadcast, GameHub, Question};

pub use crate::villains::{Maleficent, Villain, VillainRegistry};
