//! Locations: the places on a villain's board.
//!
//! A location has a hero side (top) and an ally side (bottom), each an
//! ordered stack of cards. Stack order matters: it is the index a player uses
//! to pick an attachment target, and every card's [`Placement`] records its
//! position. Removing a card renumbers everything after it.
//!
//! The printed actions never change; which of them can be used right now is
//! recomputed by [`Location::actions`] on every call.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardCategory, CardStore, Placement, Side};
use crate::core::{Action, ActionKind, ActionTemplate, EntityId, GameError};

/// Static description of a location, shared by every game of a villain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTemplate {
    pub name: String,
    pub hero_actions: SmallVec<[ActionTemplate; 2]>,
    pub ally_actions: SmallVec<[ActionTemplate; 2]>,
    /// Starts the game locked.
    pub locked: bool,
}

impl LocationTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hero_actions: SmallVec::new(),
            ally_actions: SmallVec::new(),
            locked: false,
        }
    }

    /// Set the hero-side actions (builder pattern).
    #[must_use]
    pub fn with_hero_actions(mut self, actions: &[ActionTemplate]) -> Self {
        self.hero_actions = actions.iter().copied().collect();
        self
    }

    /// Set the ally-side actions (builder pattern).
    #[must_use]
    pub fn with_ally_actions(mut self, actions: &[ActionTemplate]) -> Self {
        self.ally_actions = actions.iter().copied().collect();
        self
    }

    /// Start the location locked (builder pattern).
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

/// Where a card is being played or moved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayTarget {
    pub location: usize,
    pub side: Side,
    /// Attach under the card at this slot instead of starting a new one.
    pub attach_to: Option<usize>,
}

impl PlayTarget {
    /// A new slot on `side` of `location`.
    #[must_use]
    pub const fn new(location: usize, side: Side) -> Self {
        Self {
            location,
            side,
            attach_to: None,
        }
    }

    /// Attach under the card at `slot` (builder pattern).
    #[must_use]
    pub const fn attached_to(mut self, slot: usize) -> Self {
        self.attach_to = Some(slot);
        self
    }
}

/// A location on one player's board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub index: usize,
    pub name: String,
    pub locked: bool,
    hero_actions: SmallVec<[ActionTemplate; 2]>,
    ally_actions: SmallVec<[ActionTemplate; 2]>,
    hero_cards: Vec<EntityId>,
    ally_cards: Vec<EntityId>,
}

impl Location {
    /// Build the location at `index` from its template.
    #[must_use]
    pub fn from_template(index: usize, template: &LocationTemplate) -> Self {
        Self {
            index,
            name: template.name.clone(),
            locked: template.locked,
            hero_actions: template.hero_actions.clone(),
            ally_actions: template.ally_actions.clone(),
            hero_cards: Vec::new(),
            ally_cards: Vec::new(),
        }
    }

    /// The top-level cards on one side, in stack order.
    #[must_use]
    pub fn stack(&self, side: Side) -> &[EntityId] {
        match side {
            Side::Hero => &self.hero_cards,
            Side::Ally => &self.ally_cards,
        }
    }

    fn stack_mut(&mut self, side: Side) -> &mut Vec<EntityId> {
        match side {
            Side::Hero => &mut self.hero_cards,
            Side::Ally => &mut self.ally_cards,
        }
    }

    /// Printed action templates, hero side first.
    pub fn templates(&self) -> impl Iterator<Item = (Side, ActionTemplate)> + '_ {
        self.hero_actions
            .iter()
            .map(|t| (Side::Hero, *t))
            .chain(self.ally_actions.iter().map(|t| (Side::Ally, *t)))
    }

    /// Top-level cards of one category on one side.
    #[must_use]
    pub fn cards_of(&self, store: &CardStore, side: Side, category: CardCategory) -> Vec<EntityId> {
        self.stack(side)
            .iter()
            .copied()
            .filter(|id| store.get(*id).is_some_and(|c| c.is(category)))
            .collect()
    }

    /// Heroes on the hero side.
    #[must_use]
    pub fn heroes(&self, store: &CardStore) -> Vec<EntityId> {
        self.cards_of(store, Side::Hero, CardCategory::Hero)
    }

    /// Allies on the ally side.
    #[must_use]
    pub fn allies(&self, store: &CardStore) -> Vec<EntityId> {
        self.cards_of(store, Side::Ally, CardCategory::Ally)
    }

    /// Does a hero cover the hero-side actions?
    #[must_use]
    pub fn is_covered(&self, store: &CardStore) -> bool {
        !self.heroes(store).is_empty()
    }

    /// Structural check for playing a card of `category` here: the location
    /// is unlocked and an item has something to attach to.
    #[must_use]
    pub fn accepts(&self, store: &CardStore, category: CardCategory) -> bool {
        if self.locked {
            return false;
        }
        match category {
            CardCategory::AllyItem => !self.allies(store).is_empty(),
            CardCategory::HeroItem => !self.heroes(store).is_empty(),
            _ => true,
        }
    }

    /// Compute the current state of every printed action.
    ///
    /// `possible` decides whether an action kind's preconditions hold.
    pub fn actions(
        &self,
        store: &CardStore,
        performed: &FxHashSet<usize>,
        mut possible: impl FnMut(ActionKind) -> bool,
    ) -> Vec<Action> {
        let covered = self.is_covered(store);
        self.templates()
            .enumerate()
            .map(|(index, (side, template))| Action {
                index,
                template,
                covered: side == Side::Hero && covered,
                performed: performed.contains(&index),
                possible: possible(template.kind),
            })
            .collect()
    }

    /// Put `card` on `side`, optionally attached under an existing card.
    ///
    /// Cards already attached to `card` follow it.
    pub fn add_card(
        &mut self,
        store: &mut CardStore,
        card: EntityId,
        side: Side,
        attach_to: Option<usize>,
    ) -> Result<(), GameError> {
        match attach_to {
            Some(slot) => {
                let stack = self.stack(side);
                let parent = *stack.get(slot).ok_or(GameError::OutOfRange {
                    what: "attachment target",
                    index: slot,
                    len: stack.len(),
                })?;
                store.card_mut(parent)?.attachments.push(card);
                self.place(store, card, side, slot, true)
            }
            None => {
                self.stack_mut(side).push(card);
                let slot = self.stack(side).len() - 1;
                self.place(store, card, side, slot, false)
            }
        }
    }

    /// Take a top-level card off the board, renumbering the rest of its stack.
    ///
    /// The card's attachments stay attached to it but lose their placement.
    pub fn remove_card(&mut self, store: &mut CardStore, card: EntityId) -> Result<(), GameError> {
        let side = store
            .card(card)?
            .placement
            .map(|p| p.side)
            .ok_or_else(|| GameError::InvariantViolation(format!("{card} is not on the board")))?;
        let index = self.index;
        let stack = self.stack_mut(side);
        let position = stack.iter().position(|&c| c == card).ok_or_else(|| {
            GameError::InvariantViolation(format!("{card} is not at location {index}"))
        })?;
        stack.remove(position);

        unplace(store, card)?;

        let renumbered: Vec<_> = self.stack(side)[position..].to_vec();
        for (offset, id) in renumbered.into_iter().enumerate() {
            self.place(store, id, side, position + offset, false)?;
        }
        Ok(())
    }

    fn place(
        &self,
        store: &mut CardStore,
        card: EntityId,
        side: Side,
        slot: usize,
        attached: bool,
    ) -> Result<(), GameError> {
        let entry = store.card_mut(card)?;
        entry.placement = Some(Placement {
            location: self.index,
            side,
            slot,
            attached,
        });
        let attachments = entry.attachments.clone();
        for sub in attachments {
            self.place(store, sub, side, slot, true)?;
        }
        Ok(())
    }
}

fn unplace(store: &mut CardStore, card: EntityId) -> Result<(), GameError> {
    let entry = store.card_mut(card)?;
    entry.placement = None;
    let attachments = entry.attachments.clone();
    for sub in attachments {
        unplace(store, sub)?;
    }
    Ok(())
}
