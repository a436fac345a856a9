//! Core engine types: ids, errors, configuration, RNG, location actions.
//!
//! Nothing in here knows about a particular villain; characters plug in
//! through [`crate::villains`] and [`crate::cards::CardBehavior`].

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;

pub use entity::EntityId;
pub use player::PlayerId;
pub use rng::GameRng;
pub use config::GameConfig;
pub use action::{Action, ActionKind, ActionTemplate};
pub use error::{ErrorKind, GameError, HubError};
