//! The turn algorithm.
//!
//! A turn walks through [`TurnPhase`] in order. The current phase is stored
//! on the game before it runs, so a turn interrupted by a rejected answer
//! resumes at the same step on the next [`Game::play_turn`] call. Transport
//! failures end the turn instead; a corrupt board abandons the game.

use log::{error, info, warn};

use crate::cards::{Activation, Moment};
use crate::core::{ErrorKind, GameError, PlayerId};
use crate::effects::{Duration, Notification, Query};
use crate::hub::ask::{choose_one, choose_optional};
use crate::hub::{Broadcast, GameHub, Question};

use super::{Game, GameStatus, TurnPhase};

/// How a call to [`Game::play_turn`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The turn passed to `next`.
    Passed { next: PlayerId },
    /// The current player met its objective. The game is finished.
    Won(PlayerId),
}

impl Game {
    /// Play the turn of `caller`, who must be the current player.
    pub async fn play_turn(
        &mut self,
        hub: &dyn GameHub,
        caller: PlayerId,
    ) -> Result<TurnOutcome, GameError> {
        self.expect_status(GameStatus::Started)?;
        let current = self.current_player_id()?;
        if caller != current {
            return Err(GameError::NotYourTurn(caller));
        }

        match self.run_turn(hub, current).await {
            Ok(outcome) => Ok(outcome),
            Err(err) if err.kind() == ErrorKind::InvariantViolation => {
                error!("turn: {} abandoned: {err}", self.id);
                self.status = GameStatus::Abandoned;
                hub.notify(&self.player_ids(), Broadcast::GameAbandoned { game: self.id })
                    .await;
                Err(err)
            }
            Err(err) if err.kind() == ErrorKind::Transport => {
                warn!("turn: {current} lost the rest of the turn: {err}");
                self.hand_off(hub).await?;
                Err(err)
            }
            Err(err) => {
                warn!("turn: {current} stopped at {:?}: {err}", self.turn.phase);
                Err(err)
            }
        }
    }

    async fn run_turn(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
    ) -> Result<TurnOutcome, GameError> {
        loop {
            let phase = self.turn.phase;
            match phase {
                TurnPhase::CheckWin => {
                    if self.has_won(player) {
                        self.finish(hub, player).await;
                        return Ok(TurnOutcome::Won(player));
                    }
                }
                TurnPhase::ConditionsBeforeMove | TurnPhase::ConditionsAfterMove => {
                    self.check_conditions(hub).await?;
                }
                TurnPhase::BeforeMoveSpecials => {
                    for card in self.board_cards(player) {
                        if self.cards.contains(card) {
                            let moment = Moment::BeforeVillainMove;
                            self.activate(hub, Activation::new(player, card, moment)).await?;
                        }
                    }
                }
                TurnPhase::StartOfTurnExpiry => {
                    self.bus
                        .duration_ended_for(player, Duration::UntilStartOfNextTurn);
                }
                TurnPhase::MoveVillain => {
                    let needs_to_move = self.query_all(player, Query::NeedsToMove);
                    self.move_villain(hub, player, player, needs_to_move).await?;
                }
                TurnPhase::AfterMoveExpiry => {
                    self.bus
                        .duration_ended_for(player, Duration::UntilAfterVillainMove);
                }
                TurnPhase::ActionLoop => self.action_loop(hub, player).await?,
                TurnPhase::DrawToFull => {
                    self.draw_to_full(hub, player).await?;
                    self.verify_consistency(player)?;
                }
                TurnPhase::Handoff => {
                    let next = self.hand_off(hub).await?;
                    return Ok(TurnOutcome::Passed { next });
                }
            }
            self.turn.phase = phase.next();
        }
    }

    /// Has `player` met its villain's objective?
    #[must_use]
    pub fn has_won(&self, player: PlayerId) -> bool {
        self.player(player)
            .ok()
            .and_then(|p| p.villain.clone())
            .is_some_and(|villain| villain.has_won(self, player))
    }

    async fn finish(&mut self, hub: &dyn GameHub, winner: PlayerId) {
        self.status = GameStatus::Finished;
        self.winner = Some(winner);
        let villain = self
            .player(winner)
            .ok()
            .and_then(|p| p.villain_name())
            .unwrap_or_default();
        info!("turn: {winner} won {} as {villain}", self.id);
        hub.notify(
            &self.player_ids(),
            Broadcast::PlayerWon {
                player: winner,
                villain,
            },
        )
        .await;
    }

    /// Ask `asker` where `player`'s villain goes, then publish the move.
    ///
    /// With `needs_to_move` the current location is not offered. A villain
    /// with nowhere to go stays where it is and nothing is published.
    pub async fn move_villain(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
        asker: PlayerId,
        needs_to_move: bool,
    ) -> Result<(), GameError> {
        let p = self.player(player)?;
        let here = p.location_index;
        let options: Vec<usize> = p
            .locations
            .iter()
            .filter(|l| !l.locked && !(needs_to_move && l.index == here))
            .map(|l| l.index)
            .collect();
        if options.is_empty() {
            info!("turn: {player} has nowhere to move and stays put");
            self.player_mut(player)?.performed_actions.clear();
            return Ok(());
        }
        let question = Question::MoveVillain {
            locations: self.location_views(player, &options)?,
        };
        let destination = options[choose_one(hub, asker, question, options.len()).await?];

        let p = self.player_mut(player)?;
        p.location_index = destination;
        p.performed_actions.clear();
        info!(
            "turn: {player} moves to {}",
            self.player(player)?.location(destination)?.name
        );
        self.publish(
            hub,
            player,
            Notification::VillainMoved {
                location: destination,
            },
        )
        .await
    }

    async fn action_loop(&mut self, hub: &dyn GameHub, player: PlayerId) -> Result<(), GameError> {
        loop {
            let location = self.player(player)?.location_index;
            let actions = self.location_actions(player, location)?;
            if !actions.iter().any(|a| a.is_available()) {
                return Ok(());
            }

            let question = Question::ChooseAction {
                actions: actions.clone(),
                player: self.player_view(player)?,
            };
            let Some(index) = choose_optional(hub, player, question, actions.len()).await? else {
                info!("turn: {player} ends the action phase");
                return Ok(());
            };

            let action = actions[index];
            if action.performed {
                return Err(GameError::ActionPerformed { index });
            }
            if action.covered {
                return Err(GameError::ActionCovered { index });
            }
            if !action.possible {
                return Err(GameError::ActionBlocked { index });
            }

            self.resolve_action(hub, player, action.template).await?;
            self.player_mut(player)?.performed_actions.insert(index);
            self.verify_all()?;
            self.check_conditions(hub).await?;
        }
    }

    /// Draw villain cards until the hand is full or both piles are empty.
    pub async fn draw_to_full(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
    ) -> Result<(), GameError> {
        while self.player(player)?.needs_cards() {
            if self.draw_villain_card(hub, player).await?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Pass the turn to the next seat and announce it.
    async fn hand_off(&mut self, hub: &dyn GameHub) -> Result<PlayerId, GameError> {
        if let Some(p) = self.players.get_mut(self.current) {
            p.performed_actions.clear();
        }
        self.current = (self.current + 1) % self.players.len().max(1);
        if self.current == 0 {
            self.round += 1;
        }
        self.turn.phase = TurnPhase::CheckWin;
        self.turn.checked_conditions.clear();

        let next = self.current_player_id()?;
        info!("turn: {next} is up (round {})", self.round);
        self.announce_turn(hub).await?;
        Ok(next)
    }

    /// Send every player its own view of the turn that is starting.
    pub(crate) async fn announce_turn(&self, hub: &dyn GameHub) -> Result<(), GameError> {
        let current = self.current_player_id()?;
        for player in self.player_ids() {
            let view = self.game_view(player)?;
            hub.notify(
                &[player],
                Broadcast::TurnStarted {
                    current,
                    round: self.round,
                    view: Box::new(view),
                },
            )
            .await;
        }
        Ok(())
    }

    /// Play turns with `hub` answering for everyone until somebody wins or
    /// `max_turns` turns were played. Returns the winner, if any.
    pub async fn play_until(
        &mut self,
        hub: &dyn GameHub,
        max_turns: usize,
    ) -> Result<Option<PlayerId>, GameError> {
        for _ in 0..max_turns {
            let current = self.current_player_id()?;
            if let TurnOutcome::Won(winner) = self.play_turn(hub, current).await? {
                return Ok(Some(winner));
            }
        }
        Ok(None)
    }
}
