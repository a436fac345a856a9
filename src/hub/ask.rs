//! Typed wrappers around [`GameHub::ask`].
//!
//! Each helper checks the shape of the answer against the question it asked
//! and turns anything else into a `Protocol` error. Nothing is retried.

use log::warn;
use rustc_hash::FxHashSet;

use crate::core::{GameError, PlayerId};

use super::{Answer, GameHub, Question};

async fn ask(hub: &dyn GameHub, player: PlayerId, question: Question) -> Result<Answer, GameError> {
    hub.ask(player, question)
        .await
        .map_err(|source| GameError::Hub { player, source })
}

fn reject(player: PlayerId, label: &str, reason: String) -> GameError {
    warn!("hub: rejected answer from {player} to {label}: {reason}");
    GameError::protocol(player, format!("{label}: {reason}"))
}

/// Ask for exactly one of `options` choices.
pub async fn choose_one(
    hub: &dyn GameHub,
    player: PlayerId,
    question: Question,
    options: usize,
) -> Result<usize, GameError> {
    let label = question.label();
    if options == 0 {
        return Err(GameError::NoOptions(label));
    }
    match ask(hub, player, question).await? {
        Answer::Index(index) if index < options => Ok(index),
        Answer::Index(index) => Err(reject(
            player,
            label,
            format!("index {index} out of {options} options"),
        )),
        other => Err(reject(player, label, format!("expected an index, got {other:?}"))),
    }
}

/// Ask for one of `options` choices, or none.
pub async fn choose_optional(
    hub: &dyn GameHub,
    player: PlayerId,
    question: Question,
    options: usize,
) -> Result<Option<usize>, GameError> {
    let label = question.label();
    match ask(hub, player, question).await? {
        Answer::Skip => Ok(None),
        Answer::Index(index) if index < options => Ok(Some(index)),
        Answer::Index(index) => Err(reject(
            player,
            label,
            format!("index {index} out of {options} options"),
        )),
        other => Err(reject(
            player,
            label,
            format!("expected an index or skip, got {other:?}"),
        )),
    }
}

/// Ask for between `min` and `max` distinct choices out of `options`.
pub async fn choose_many(
    hub: &dyn GameHub,
    player: PlayerId,
    question: Question,
    options: usize,
    min: usize,
    max: usize,
) -> Result<Vec<usize>, GameError> {
    let label = question.label();
    let indices = match ask(hub, player, question).await? {
        Answer::Indices(indices) => indices,
        Answer::Skip if min == 0 => Vec::new(),
        other => {
            return Err(reject(player, label, format!("expected indices, got {other:?}")));
        }
    };

    if indices.len() < min || indices.len() > max {
        return Err(reject(
            player,
            label,
            format!("{} choices, expected {min}..={max}", indices.len()),
        ));
    }
    let mut seen = FxHashSet::default();
    for &index in &indices {
        if index >= options {
            return Err(reject(
                player,
                label,
                format!("index {index} out of {options} options"),
            ));
        }
        if !seen.insert(index) {
            return Err(reject(player, label, format!("index {index} chosen twice")));
        }
    }
    Ok(indices)
}

/// Ask a yes/no question.
pub async fn confirm(
    hub: &dyn GameHub,
    player: PlayerId,
    question: Question,
) -> Result<bool, GameError> {
    let label = question.label();
    match ask(hub, player, question).await? {
        Answer::YesNo(yes) => Ok(yes),
        other => Err(reject(player, label, format!("expected yes or no, got {other:?}"))),
    }
}

/// Ask for one of `candidates`.
pub async fn choose_player(
    hub: &dyn GameHub,
    player: PlayerId,
    question: Question,
    candidates: &[PlayerId],
) -> Result<PlayerId, GameError> {
    let label = question.label();
    if candidates.is_empty() {
        return Err(GameError::NoOptions(label));
    }
    match ask(hub, player, question).await? {
        Answer::Player(target) if candidates.contains(&target) => Ok(target),
        Answer::Index(index) if index < candidates.len() => Ok(candidates[index]),
        other => Err(reject(
            player,
            label,
            format!("{other:?} is not one of {candidates:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::core::HubError;
    use crate::hub::Broadcast;

    struct Fixed(Mutex<Option<Result<Answer, HubError>>>);

    impl Fixed {
        fn new(answer: Answer) -> Self {
            Self(Mutex::new(Some(Ok(answer))))
        }
    }

    #[async_trait]
    impl GameHub for Fixed {
        async fn ask(&self, _player: PlayerId, _question: Question) -> Result<Answer, HubError> {
            self.0.lock().unwrap().take().unwrap_or(Err(HubError::Disconnected))
        }

        async fn notify(&self, _players: &[PlayerId], _message: Broadcast) {}
    }

    const P: PlayerId = PlayerId::new(1);

    fn question() -> Question {
        Question::ChooseCardToPlay { cards: Vec::new() }
    }

    #[tokio::test]
    async fn test_choose_one() {
        assert_eq!(choose_one(&Fixed::new(Answer::Index(1)), P, question(), 2).await, Ok(1));

        let err = choose_one(&Fixed::new(Answer::Index(2)), P, question(), 2).await.unwrap_err();
        assert!(matches!(err, GameError::Protocol { .. }));

        let err = choose_one(&Fixed::new(Answer::Skip), P, question(), 2).await.unwrap_err();
        assert!(matches!(err, GameError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_choose_one_without_options_does_not_ask() {
        let hub = Fixed::new(Answer::Index(0));
        let err = choose_one(&hub, P, question(), 0).await.unwrap_err();
        assert_eq!(err, GameError::NoOptions("card to play"));
        assert!(hub.0.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_choose_optional() {
        assert_eq!(choose_optional(&Fixed::new(Answer::Skip), P, question(), 2).await, Ok(None));
        assert_eq!(
            choose_optional(&Fixed::new(Answer::Index(0)), P, question(), 2).await,
            Ok(Some(0))
        );
    }

    #[tokio::test]
    async fn test_choose_many_bounds() {
        let picks = |indices: Vec<usize>| Fixed::new(Answer::Indices(indices));
        let ok = choose_many(&picks(vec![2, 0]), P, question(), 3, 0, 3).await;
        assert_eq!(ok, Ok(vec![2, 0]));

        let dup = choose_many(&picks(vec![1, 1]), P, question(), 3, 0, 3).await;
        assert!(dup.is_err());

        let few = choose_many(&picks(vec![1]), P, question(), 3, 2, 3).await;
        assert!(few.is_err());

        let skip = choose_many(&Fixed::new(Answer::Skip), P, question(), 3, 0, 3).await;
        assert_eq!(skip, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_transport_error() {
        let hub = Fixed(Mutex::new(Some(Err(HubError::Timeout))));
        let err = confirm(&hub, P, question()).await.unwrap_err();
        assert_eq!(
            err,
            GameError::Hub {
                player: P,
                source: HubError::Timeout
            }
        );
    }

    #[tokio::test]
    async fn test_choose_player() {
        let candidates = [PlayerId::new(4), PlayerId::new(5)];
        let ask = |answer: Answer| async move {
            choose_player(&Fixed::new(answer), P, question(), &candidates).await
        };
        assert_eq!(ask(Answer::Player(PlayerId::new(5))).await, Ok(PlayerId::new(5)));
        assert_eq!(ask(Answer::Index(0)).await, Ok(PlayerId::new(4)));
        assert!(ask(Answer::Player(P)).await.is_err());
    }
}
