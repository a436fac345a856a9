//! Rules: derived values, card movement, actions and vanquishing.
//!
//! Everything here is implemented on [`Game`](crate::game::Game), split by
//! concern:
//!
//! - `calc`: strength, cost and every legality check (read-only)
//! - `play`: primitive card movements between zones and the board
//! - `actions`: the eight location actions
//! - `vanquish`: ally selection and hero defeat
//!
//! None of it knows a card by name; card text reaches the rules only through
//! the effect bus and [`CardBehavior`](crate::cards::CardBehavior).

pub mod actions;
pub mod calc;
pub mod play;
pub mod vanquish;

pub use vanquish::select_allies;
