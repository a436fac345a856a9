//! The boundary to remote decision makers.
//!
//! The engine never talks to sockets. Whenever a rule needs a decision it
//! calls [`GameHub::ask`] with a typed [`Question`] and suspends until the
//! named player answers; whenever something public happens it calls
//! [`GameHub::notify`]. A transport layer implements `GameHub`; tests
//! implement it with scripted answers or the reference [`Bot`].
//!
//! Every question carries the option list the player chooses from, and every
//! index in an [`Answer`] refers to that list.

pub mod ask;
pub mod bot;
pub mod view;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{Action, HubError, PlayerId};
use crate::game::GameId;

pub use bot::{Bot, BotHub};
pub use view::{CardView, GameView, LocationView, OpponentView, PlayerView};

/// Collaborator interface: ask one player, notify many.
#[async_trait]
pub trait GameHub: Send + Sync {
    /// Ask `player` a question and wait for the answer.
    async fn ask(&self, player: PlayerId, question: Question) -> Result<Answer, HubError>;

    /// Fire-and-forget broadcast.
    async fn notify(&self, players: &[PlayerId], message: Broadcast);
}

/// A decision the engine needs from a player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Question {
    /// Pick the villain's destination.
    MoveVillain { locations: Vec<LocationView> },
    /// Pick an action by its index, or skip to end the turn.
    ChooseAction {
        actions: Vec<Action>,
        player: PlayerView,
    },
    ChooseItemOrAllyToMove { cards: Vec<CardView> },
    ChooseLocationForItemOrAlly {
        card: CardView,
        locations: Vec<LocationView>,
    },
    ChooseHeroToMove { heroes: Vec<CardView> },
    ChooseLocationForHero {
        hero: CardView,
        locations: Vec<LocationView>,
    },
    ChooseCardToPlay { cards: Vec<CardView> },
    ChooseLocationToPlay {
        card: CardView,
        locations: Vec<LocationView>,
    },
    ChooseAllyForItem {
        item: CardView,
        allies: Vec<CardView>,
    },
    /// Answer with [`Answer::Player`].
    ChooseFateTarget { players: Vec<PlayerId> },
    ChooseFateCard {
        target: PlayerId,
        cards: Vec<CardView>,
    },
    ChooseFateLocation {
        target: PlayerId,
        card: CardView,
        locations: Vec<LocationView>,
    },
    ChooseHeroForFateItem {
        item: CardView,
        heroes: Vec<CardView>,
    },
    /// Answer with between `min` and `max` distinct indices.
    ChooseCardsToDiscard {
        cards: Vec<CardView>,
        min: usize,
        max: usize,
    },
    ChooseHeroToVanquish { heroes: Vec<CardView> },
    /// Answer with the indices of the allies to use.
    ChooseAlliesForVanquish {
        hero: CardView,
        allies: Vec<CardView>,
        required: usize,
    },
    /// Yes or no.
    PerformSpecial { card: CardView },
    ChooseSpecialLocation {
        card: CardView,
        locations: Vec<LocationView>,
    },
    ChooseSpecialAction {
        card: CardView,
        actions: Vec<Action>,
    },
    /// With `optional`, skipping is allowed.
    ChooseSpecialCard {
        card: CardView,
        cards: Vec<CardView>,
        optional: bool,
    },
    ChooseCardToActivate { cards: Vec<CardView> },
    /// Yes or no: interrupt with this condition card?
    ActivateCondition { card: CardView },
}

impl Question {
    /// Short name for logs and errors.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Question::MoveVillain { .. } => "move villain",
            Question::ChooseAction { .. } => "choose action",
            Question::ChooseItemOrAllyToMove { .. } => "item or ally to move",
            Question::ChooseLocationForItemOrAlly { .. } => "location for item or ally",
            Question::ChooseHeroToMove { .. } => "hero to move",
            Question::ChooseLocationForHero { .. } => "location for hero",
            Question::ChooseCardToPlay { .. } => "card to play",
            Question::ChooseLocationToPlay { .. } => "location to play",
            Question::ChooseAllyForItem { .. } => "ally for item",
            Question::ChooseFateTarget { .. } => "fate target",
            Question::ChooseFateCard { .. } => "fate card",
            Question::ChooseFateLocation { .. } => "fate location",
            Question::ChooseHeroForFateItem { .. } => "hero for fate item",
            Question::ChooseCardsToDiscard { .. } => "cards to discard",
            Question::ChooseHeroToVanquish { .. } => "hero to vanquish",
            Question::ChooseAlliesForVanquish { .. } => "allies for vanquish",
            Question::PerformSpecial { .. } => "perform special",
            Question::ChooseSpecialLocation { .. } => "special location",
            Question::ChooseSpecialAction { .. } => "special action",
            Question::ChooseSpecialCard { .. } => "special card",
            Question::ChooseCardToActivate { .. } => "card to activate",
            Question::ActivateCondition { .. } => "activate condition",
        }
    }
}

/// A player's reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Index(usize),
    /// Decline an optional choice (end the action loop, skip a card).
    Skip,
    Indices(Vec<usize>),
    YesNo(bool),
    Player(PlayerId),
}

/// A seat in a started game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player: PlayerId,
    pub villain: String,
}

/// Public announcements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Broadcast {
    GameCreated { game: GameId, owner: PlayerId },
    PlayerJoined { game: GameId, player: PlayerId },
    PlayerLeft { game: GameId, player: PlayerId },
    VillainChosen { player: PlayerId, villain: String },
    GameReadyToStart { game: GameId },
    GameStarted { game: GameId, seats: Vec<Seat> },
    /// Sent to each player with their own view.
    TurnStarted {
        current: PlayerId,
        round: u32,
        view: Box<GameView>,
    },
    PlayerWon { player: PlayerId, villain: String },
    GameAbandoned { game: GameId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_serde() {
        let answer = Answer::Indices(vec![0, 2]);
        let json = serde_json::to_string(&answer).unwrap();
        let back: Answer = serde_json::from_str(&json).unwrap();
        assert_eq!(answer, back);
    }

    #[test]
    fn test_question_label() {
        let question = Question::ChooseFateTarget {
            players: vec![PlayerId::new(1)],
        };
        assert_eq!(question.label(), "fate target");
    }
}
