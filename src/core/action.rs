//! Location actions.
//!
//! Each location prints a fixed list of action symbols on its hero side and
//! its ally side. An `ActionTemplate` is one printed symbol; an `Action` is the
//! transient, freshly computed state of that symbol for the current turn
//! (index, covered by a hero, already used, currently possible).
//!
//! Actions are never stored: they are recomputed from the board every time a
//! player is asked to choose one.

use serde::{Deserialize, Serialize};

/// The kinds of action a location can offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    GainPower,
    MoveItemOrAlly,
    MoveHero,
    PlayCard,
    Fate,
    DiscardCards,
    Vanquish,
    Activate,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::GainPower => "Gain Power",
            ActionKind::MoveItemOrAlly => "Move an Item or Ally",
            ActionKind::MoveHero => "Move a Hero",
            ActionKind::PlayCard => "Play a Card",
            ActionKind::Fate => "Fate",
            ActionKind::DiscardCards => "Discard Cards",
            ActionKind::Vanquish => "Vanquish",
            ActionKind::Activate => "Activate",
        };
        f.write_str(name)
    }
}

/// A printed action symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionTemplate {
    pub kind: ActionKind,
    /// Power gained by `GainPower`.
    pub amount: Option<i32>,
}

impl ActionTemplate {
    /// Create a template without an amount.
    #[must_use]
    pub const fn new(kind: ActionKind) -> Self {
        Self { kind, amount: None }
    }

    /// A `GainPower` symbol worth `amount`.
    #[must_use]
    pub const fn gain_power(amount: i32) -> Self {
        Self {
            kind: ActionKind::GainPower,
            amount: Some(amount),
        }
    }
}

/// The current state of one action at a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Index across the hero side then the ally side.
    pub index: usize,
    pub template: ActionTemplate,
    /// A hero on the hero side hides the hero-side actions.
    pub covered: bool,
    /// Already used this turn.
    pub performed: bool,
    /// Preconditions hold right now.
    pub possible: bool,
}

impl Action {
    /// Can the player pick this action right now?
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !self.covered && self.possible && !self.performed
    }
}
