//! One table: players, cards, the effect bus and the turn state machine.
//!
//! ## Lifecycle
//!
//! `Created` → `Started` → `Finished` | `Abandoned`
//!
//! - **Created**: the owner is seated, others may join, everyone chooses a
//!   villain.
//! - **Started**: seats are shuffled, boards and decks are built and players
//!   take turns through [`Game::play_turn`].
//! - **Finished**: a villain met its objective at the start of its turn.
//! - **Abandoned**: the last player left, or the board state was found to be
//!   corrupt.
//!
//! All fields are public so tests (and tools) can build any mid-turn state
//! directly. Rules are enforced by the methods, not by field privacy.

mod conditions;
mod consistency;
mod dispatch;
mod turn;

use std::sync::Arc;

use log::info;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, CardStore};
use crate::core::{EntityId, GameConfig, GameError, GameRng, PlayerId};
use crate::effects::EffectBus;
use crate::hub::{Broadcast, GameHub, Seat};
use crate::player::{Player, Zone};
use crate::villains::VillainRegistry;

pub use turn::TurnOutcome;

/// Table identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub u32);

impl GameId {
    /// Create a new game ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({})", self.0)
    }
}

/// Where a table is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Created,
    Started,
    Finished,
    Abandoned,
}

/// The steps of one player's turn, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    #[default]
    CheckWin,
    ConditionsBeforeMove,
    BeforeMoveSpecials,
    StartOfTurnExpiry,
    MoveVillain,
    AfterMoveExpiry,
    ConditionsAfterMove,
    ActionLoop,
    DrawToFull,
    Handoff,
}

impl TurnPhase {
    /// The step after this one. `Handoff` is last.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            TurnPhase::CheckWin => TurnPhase::ConditionsBeforeMove,
            TurnPhase::ConditionsBeforeMove => TurnPhase::BeforeMoveSpecials,
            TurnPhase::BeforeMoveSpecials => TurnPhase::StartOfTurnExpiry,
            TurnPhase::StartOfTurnExpiry => TurnPhase::MoveVillain,
            TurnPhase::MoveVillain => TurnPhase::AfterMoveExpiry,
            TurnPhase::AfterMoveExpiry => TurnPhase::ConditionsAfterMove,
            TurnPhase::ConditionsAfterMove => TurnPhase::ActionLoop,
            TurnPhase::ActionLoop => TurnPhase::DrawToFull,
            TurnPhase::DrawToFull | TurnPhase::Handoff => TurnPhase::Handoff,
        }
    }
}

/// State that lives for one turn, or across turns for fate targeting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnContext {
    pub phase: TurnPhase,
    /// Last player targeted by a Fate action.
    pub fated_player: Option<PlayerId>,
    /// Condition cards already offered this turn, per opponent.
    pub checked_conditions: FxHashSet<(PlayerId, CardId)>,
}

/// What happened when a player left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// Nobody is left.
    Abandoned,
    Removed {
        /// Set when the owner left and the table changed hands.
        new_owner: Option<PlayerId>,
        /// The leaver was taking its turn; the next seat is now up.
        skipped_turn: bool,
    },
}

/// One table.
#[derive(Debug)]
pub struct Game {
    pub id: GameId,
    pub config: GameConfig,
    pub status: GameStatus,
    /// Seat order. Shuffled when the game starts.
    pub players: Vec<Player>,
    /// Completed passes around the table.
    pub round: u32,
    /// Seat of the player whose turn it is.
    pub current: usize,
    pub turn: TurnContext,
    pub bus: EffectBus,
    pub cards: CardStore,
    pub rng: GameRng,
    pub winner: Option<PlayerId>,
    pub villains: Arc<VillainRegistry>,
}

impl Game {
    /// Open a table with `owner` seated.
    pub fn new(
        id: GameId,
        owner: PlayerId,
        config: GameConfig,
        villains: Arc<VillainRegistry>,
    ) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let mut first = Player::new(owner);
        first.is_owner = true;
        Self {
            id,
            config,
            status: GameStatus::Created,
            players: vec![first],
            round: 0,
            current: 0,
            turn: TurnContext::default(),
            bus: EffectBus::new(),
            cards: CardStore::new(),
            rng,
            winner: None,
            villains,
        }
    }

    /// Current table owner.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.is_owner).map(|p| p.id)
    }

    /// Players in seat order.
    #[must_use]
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Seat of `player`.
    #[must_use]
    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player)
    }

    pub(crate) fn seat(&self, player: PlayerId) -> Result<usize, GameError> {
        self.seat_of(player).ok_or(GameError::UnknownPlayer(player))
    }

    pub fn player(&self, player: PlayerId) -> Result<&Player, GameError> {
        self.players
            .iter()
            .find(|p| p.id == player)
            .ok_or(GameError::UnknownPlayer(player))
    }

    pub fn player_mut(&mut self, player: PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .iter_mut()
            .find(|p| p.id == player)
            .ok_or(GameError::UnknownPlayer(player))
    }

    /// Whose turn it is.
    pub fn current_player_id(&self) -> Result<PlayerId, GameError> {
        self.players
            .get(self.current)
            .map(|p| p.id)
            .ok_or(GameError::OutOfRange {
                what: "seat",
                index: self.current,
                len: self.players.len(),
            })
    }

    pub fn card(&self, card: EntityId) -> Result<&Card, GameError> {
        self.cards.card(card)
    }

    /// First card named `name` in one of `player`'s zones.
    #[must_use]
    pub fn find_card(&self, player: PlayerId, zone: Zone, name: &str) -> Option<EntityId> {
        let p = self.player(player).ok()?;
        p.zone(zone)
            .iter()
            .copied()
            .find(|id| self.cards.get(*id).is_some_and(|c| c.name() == name))
    }

    pub(crate) fn expect_status(&self, expected: GameStatus) -> Result<(), GameError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(GameError::WrongStatus {
                expected,
                actual: self.status,
            })
        }
    }

    /// Seat another player.
    pub fn join(&mut self, player: PlayerId) -> Result<(), GameError> {
        self.expect_status(GameStatus::Created)?;
        if self.seat_of(player).is_some() {
            return Err(GameError::AlreadyJoined(player));
        }
        if self.players.len() >= self.config.max_players {
            return Err(GameError::TableFull(self.config.max_players));
        }
        self.players.push(Player::new(player));
        info!("lobby: {player} joined {}", self.id);
        Ok(())
    }

    /// Record `player`'s villain choice.
    pub fn choose_villain(&mut self, player: PlayerId, name: &str) -> Result<(), GameError> {
        self.expect_status(GameStatus::Created)?;
        let villain = self
            .villains
            .get(name)
            .ok_or_else(|| GameError::UnknownVillain(name.to_owned()))?;
        self.player_mut(player)?.villain = Some(villain);
        info!("lobby: {player} chose {name} in {}", self.id);
        Ok(())
    }

    /// Enough players, and every one of them chose a villain.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == GameStatus::Created
            && self.players.len() >= self.config.min_players
            && self.players.iter().all(Player::has_chosen)
    }

    /// Shuffle seats, build every board and deck, deal and start the first turn.
    pub async fn start(&mut self, hub: &dyn GameHub) -> Result<(), GameError> {
        self.expect_status(GameStatus::Created)?;
        if !self.is_ready() {
            return Err(GameError::NotReady {
                required: self.config.min_players,
            });
        }

        self.rng.shuffle(&mut self.players);
        self.status = GameStatus::Started;
        self.round = 0;
        self.current = 0;
        self.turn = TurnContext::default();

        for seat in 0..self.players.len() {
            let name = self.players[seat].villain_name().unwrap_or_default();
            let deck = self.villains.deck(&name);
            let power = self.config.starting_power_for(seat);
            let hand_limit = self.config.hand_limit;
            let Self {
                players, cards, rng, ..
            } = self;
            players[seat].setup(&deck, cards, rng, power, hand_limit)?;
        }

        let seats: Vec<Seat> = self
            .players
            .iter()
            .map(|p| Seat {
                player: p.id,
                villain: p.villain_name().unwrap_or_default(),
            })
            .collect();
        for seat in &seats {
            self.draw_to_full(hub, seat.player).await?;
            self.verify_consistency(seat.player)?;
        }

        info!("lobby: {} started with {} players", self.id, seats.len());
        hub.notify(
            &self.player_ids(),
            Broadcast::GameStarted {
                game: self.id,
                seats,
            },
        )
        .await;
        self.announce_turn(hub).await
    }

    /// Remove a player from the table.
    ///
    /// In a started game the leaver's cards and subscriptions go with it and
    /// the turn order closes the gap: if the leaver was up, the next seat
    /// starts its turn from the beginning.
    pub fn remove_player(&mut self, player: PlayerId) -> Result<Removal, GameError> {
        let seat = self.seat(player)?;
        let leaver = self.players.remove(seat);
        info!("lobby: {player} left {}", self.id);

        if self.players.is_empty() {
            self.status = GameStatus::Abandoned;
            info!("lobby: {} abandoned", self.id);
            return Ok(Removal::Abandoned);
        }

        let mut new_owner = None;
        if leaver.is_owner {
            self.players[0].is_owner = true;
            new_owner = Some(self.players[0].id);
        }

        let mut skipped_turn = false;
        if self.status == GameStatus::Started {
            self.bus.player_left(player);
            self.cards.remove_owned_by(player);
            if self.turn.fated_player == Some(player) {
                self.turn.fated_player = None;
            }
            self.turn.checked_conditions.retain(|(p, _)| *p != player);

            if seat < self.current {
                self.current -= 1;
            } else if seat == self.current {
                skipped_turn = true;
                if self.current >= self.players.len() {
                    self.current = 0;
                    self.round += 1;
                }
                self.turn.phase = TurnPhase::CheckWin;
                self.turn.checked_conditions.clear();
                self.players[self.current].performed_actions.clear();
            }
        }

        Ok(Removal::Removed {
            new_owner,
            skipped_turn,
        })
    }
}
