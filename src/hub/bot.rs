//! A reference decision maker.
//!
//! `Bot` answers every question with the first legal option, except where a
//! smarter choice is cheap: it skips optional choices it has nothing for and
//! picks the weakest ally group that still defeats a hero. `BotHub` seats a
//! bot behind every player, which is enough to drive whole games in tests
//! and soak runs.

use async_trait::async_trait;
use log::debug;

use crate::core::{HubError, PlayerId};
use crate::rules::select_allies;

use super::{Answer, Broadcast, GameHub, Question};

/// Stateless answering strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bot;

impl Bot {
    /// Answer `question`.
    #[must_use]
    pub fn answer(question: &Question) -> Answer {
        match question {
            Question::ChooseAction { actions, .. } => actions
                .iter()
                .find(|a| a.is_available())
                .map_or(Answer::Skip, |a| Answer::Index(a.index)),
            Question::ChooseFateTarget { players } => {
                players.first().map_or(Answer::Skip, |p| Answer::Player(*p))
            }
            Question::ChooseCardsToDiscard { min, .. } => Answer::Indices((0..*min).collect()),
            Question::ChooseAlliesForVanquish {
                hero,
                allies,
                required,
            } => {
                let strengths: Vec<i32> = allies.iter().map(|a| a.strength.unwrap_or(0)).collect();
                select_allies(&strengths, hero.strength.unwrap_or(0), *required)
                    .map_or_else(|| Answer::Indices((0..allies.len()).collect()), Answer::Indices)
            }
            Question::PerformSpecial { .. } | Question::ActivateCondition { .. } => {
                Answer::YesNo(true)
            }
            Question::ChooseSpecialCard {
                cards, optional, ..
            } if cards.is_empty() && *optional => Answer::Skip,
            _ => Answer::Index(0),
        }
    }
}

/// A hub where every player is a [`Bot`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BotHub;

#[async_trait]
impl GameHub for BotHub {
    async fn ask(&self, player: PlayerId, question: Question) -> Result<Answer, HubError> {
        let answer = Bot::answer(&question);
        debug!("bot: {player} answers {} with {answer:?}", question.label());
        Ok(answer)
    }

    async fn notify(&self, players: &[PlayerId], message: Broadcast) {
        debug!("bot: {} players notified: {message:?}", players.len());
    }
}
