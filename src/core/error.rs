//! Error taxonomy.
//!
//! Every fallible operation returns [`GameError`]. Callers that only care about
//! the broad class (reject the request, alert an operator, drop the
//! connection) use [`GameError::kind`].

use thiserror::Error;

use crate::cards::CardId;
use crate::game::{GameId, GameStatus};

use super::entity::EntityId;
use super::player::PlayerId;

/// Failures reported by the collaborator behind [`GameHub`](crate::hub::GameHub).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("player did not answer in time")]
    Timeout,
    #[error("player is not connected")]
    Disconnected,
}

/// Broad error classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected request; the game state did not change.
    IllegalAction,
    /// Not enough power or allies; the game state did not change.
    InsufficientResource,
    /// Corrupted board state. Fatal for the game.
    InvariantViolation,
    /// The collaborator failed to deliver an answer. Fatal for the turn.
    Transport,
}

/// Errors raised by the rules engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("action {index} was already performed this turn")]
    ActionPerformed { index: usize },

    #[error("action {index} is covered by a hero")]
    ActionCovered { index: usize },

    #[error("action {index} is not possible right now")]
    ActionBlocked { index: usize },

    #[error("{what} {index} does not exist (there are {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("nothing to choose from: {0}")]
    NoOptions(&'static str),

    #[error("{0} cannot be played")]
    CannotPlay(EntityId),

    #[error("{0} cannot be moved there")]
    CannotMove(EntityId),

    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("game is {actual:?}, expected {expected:?}")]
    WrongStatus {
        expected: GameStatus,
        actual: GameStatus,
    },

    #[error("{0} is not at this table")]
    UnknownPlayer(PlayerId),

    #[error("{0} does not exist")]
    UnknownCard(EntityId),

    #[error("{0} does not exist")]
    UnknownGame(GameId),

    #[error("no villain named {0:?}")]
    UnknownVillain(String),

    #[error("{0} already joined a table")]
    AlreadyJoined(PlayerId),

    #[error("table is full ({0} seats)")]
    TableFull(usize),

    #[error("need at least {required} players who all chose a villain")]
    NotReady { required: usize },

    #[error("only the table owner may do that")]
    NotOwner(PlayerId),

    #[error("not enough power: have {available}, need {required}")]
    NotEnoughPower { available: i32, required: i32 },

    #[error("allies are too weak: strength {strength} against {hero_strength}")]
    AlliesTooWeak { strength: i32, hero_strength: i32 },

    #[error("at least {required} allies required, got {provided}")]
    NotEnoughAllies { required: usize, provided: usize },

    #[error("invalid answer from {player}: {reason}")]
    Protocol { player: PlayerId, reason: String },

    #[error("{player} could not be asked: {source}")]
    Hub {
        player: PlayerId,
        #[source]
        source: HubError,
    },

    #[error("board state is inconsistent: {0}")]
    InvariantViolation(String),

    #[error("card {card:?} has {found} live copies, expected {expected}")]
    CopyCount {
        card: CardId,
        found: usize,
        expected: usize,
    },
}

impl GameError {
    /// The broad class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotEnoughPower { .. }
            | GameError::AlliesTooWeak { .. }
            | GameError::NotEnoughAllies { .. } => ErrorKind::InsufficientResource,
            GameError::InvariantViolation(_) | GameError::CopyCount { .. } => {
                ErrorKind::InvariantViolation
            }
            GameError::Hub { .. } => ErrorKind::Transport,
            // Malformed answers are rejected like any other illegal request.
            _ => ErrorKind::IllegalAction,
        }
    }

    pub(crate) fn protocol(player: PlayerId, reason: impl Into<String>) -> Self {
        GameError::Protocol {
            player,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            GameError::ActionPerformed { index: 1 }.kind(),
            ErrorKind::IllegalAction
        );
        assert_eq!(
            GameError::NotEnoughPower {
                available: 1,
                required: 3
            }
            .kind(),
            ErrorKind::InsufficientResource
        );
        assert_eq!(
            GameError::InvariantViolation("dup".into()).kind(),
            ErrorKind::InvariantViolation
        );
        assert_eq!(
            GameError::protocol(PlayerId::new(1), "index 9").kind(),
            ErrorKind::IllegalAction
        );
        assert_eq!(
            GameError::Hub {
                player: PlayerId::new(1),
                source: HubError::Timeout
            }
            .kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn test_messages() {
        let err = GameError::NotEnoughAllies {
            required: 2,
            provided: 1,
        };
        assert_eq!(err.to_string(), "at least 2 allies required, got 1");
    }
}
