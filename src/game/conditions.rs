//! Condition cards: opponents interrupting the current player's turn.
//!
//! After every action (and twice around the villain move) each opponent's
//! hand is scanned for condition cards whose trigger is met. The owner is
//! asked whether to play it; a played condition resolves immediately, costs
//! nothing and goes to the discard pile. Each definition is offered to each
//! opponent at most once per turn.

use log::info;

use crate::cards::{Activation, Moment};
use crate::core::{GameError, PlayerId};
use crate::hub::ask::confirm;
use crate::hub::{GameHub, Question};
use crate::player::Zone;

use super::Game;

impl Game {
    /// Offer every opponent of the current player its triggered conditions.
    pub async fn check_conditions(&mut self, hub: &dyn GameHub) -> Result<(), GameError> {
        let current = self.current_player_id()?;
        let opponents: Vec<PlayerId> = self
            .player_ids()
            .into_iter()
            .filter(|&p| p != current)
            .collect();

        for opponent in opponents {
            let hand = self.player(opponent)?.hand.clone();
            for card in hand {
                if !self.player(opponent)?.hand.contains(&card) {
                    continue;
                }
                let key = (opponent, self.cards.card(card)?.card_id());
                if self.turn.checked_conditions.contains(&key) {
                    continue;
                }
                let activation = Activation::new(opponent, card, Moment::OnCondition);
                if !self.can_activate(activation) {
                    continue;
                }

                self.turn.checked_conditions.insert(key);
                let question = Question::ActivateCondition {
                    card: self.card_view(card)?,
                };
                if !confirm(hub, opponent, question).await? {
                    continue;
                }

                info!(
                    "turn: {opponent} interrupts {current} with {}",
                    self.cards.card(card)?.name()
                );
                self.player_mut(opponent)?.take(Zone::Hand, card);
                self.activate(hub, activation).await?;
                self.player_mut(opponent)?.villain_discard.push(card);
                self.bus.card_discarded(card);
            }
        }
        Ok(())
    }
}
