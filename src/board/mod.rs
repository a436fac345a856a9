//! The board: each player's row of locations.
//!
//! ## Key Types
//!
//! - `LocationTemplate`: Printed name, actions and lock state
//! - `Location`: Hero-side and ally-side card stacks for one game
//! - `PlayTarget`: Where a card is being put

pub mod location;

pub use location::{Location, LocationTemplate, PlayTarget};
