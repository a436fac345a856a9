//! The table registry.
//!
//! A [`Lobby`] owns every table of a server. Each table is an
//! `Arc<tokio::sync::Mutex<Game>>` that is held for a whole operation,
//! question round trips included, so a table only ever runs one thing at a
//! time. The registry itself sits behind its own mutex and is only held for
//! short bookkeeping steps.
//!
//! The registry guard is never held while waiting for a table: a table may
//! be busy with a remote answer for a long time. Taking the registry while
//! holding a table is fine.
//!
//! Inbound requests arrive as a [`Command`] and are routed by
//! [`Lobby::dispatch`].

use std::sync::Arc;

use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::{GameConfig, GameError, PlayerId};
use crate::game::{Game, GameId, GameStatus, Removal, TurnOutcome};
use crate::hub::{Broadcast, GameHub};
use crate::villains::VillainRegistry;

/// A request from a connected player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    CreateGame,
    JoinGame { game: GameId },
    ChooseVillain { villain: String },
    StartGame,
    PlayTurn,
    LeaveGame,
}

/// The result of a [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Created(GameId),
    Joined(GameId),
    /// `started` is set when the choice completed the table and it auto-started.
    VillainChosen { started: bool },
    Started,
    Turn(TurnOutcome),
    Left(Removal),
}

/// One row of the table list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub status: GameStatus,
    pub owner: Option<PlayerId>,
    pub players: Vec<PlayerId>,
}

#[derive(Debug, Default)]
struct LobbyState {
    games: FxHashMap<GameId, Arc<Mutex<Game>>>,
    memberships: FxHashMap<PlayerId, GameId>,
    next_game_id: u32,
}

impl LobbyState {
    fn table_of(&self, player: PlayerId) -> Result<(GameId, Arc<Mutex<Game>>), GameError> {
        let id = *self
            .memberships
            .get(&player)
            .ok_or(GameError::UnknownPlayer(player))?;
        let game = self.games.get(&id).ok_or(GameError::UnknownGame(id))?;
        Ok((id, Arc::clone(game)))
    }
}

/// Every table on the server.
#[derive(Debug)]
pub struct Lobby {
    villains: Arc<VillainRegistry>,
    config: GameConfig,
    state: Mutex<LobbyState>,
}

impl Lobby {
    /// Create an empty lobby. New tables use `config`.
    pub fn new(config: GameConfig, villains: Arc<VillainRegistry>) -> Self {
        Self {
            villains,
            config,
            state: Mutex::new(LobbyState::default()),
        }
    }

    /// The villains players can choose from.
    #[must_use]
    pub fn villains(&self) -> &VillainRegistry {
        &self.villains
    }

    /// Route one command.
    pub async fn dispatch(
        &self,
        hub: &dyn GameHub,
        player: PlayerId,
        command: Command,
    ) -> Result<Reply, GameError> {
        match command {
            Command::CreateGame => self.create_game(hub, player).await.map(Reply::Created),
            Command::JoinGame { game } => {
                self.join_game(hub, player, game).await?;
                Ok(Reply::Joined(game))
            }
            Command::ChooseVillain { villain } => {
                let started = self.choose_villain(hub, player, &villain).await?;
                Ok(Reply::VillainChosen { started })
            }
            Command::StartGame => {
                self.start_game(hub, player).await?;
                Ok(Reply::Started)
            }
            Command::PlayTurn => self.play_turn(hub, player).await.map(Reply::Turn),
            Command::LeaveGame => self.leave_game(hub, player).await.map(Reply::Left),
        }
    }

    /// Open a new table owned by `owner`, leaving its current table first.
    pub async fn create_game(
        &self,
        hub: &dyn GameHub,
        owner: PlayerId,
    ) -> Result<GameId, GameError> {
        if self.state.lock().await.memberships.contains_key(&owner) {
            self.leave_game(hub, owner).await?;
        }

        let id = {
            let mut state = self.state.lock().await;
            if state.memberships.contains_key(&owner) {
                return Err(GameError::AlreadyJoined(owner));
            }
            state.next_game_id += 1;
            let id = GameId::new(state.next_game_id);
            let game = Game::new(id, owner, self.config.clone(), Arc::clone(&self.villains));
            state.games.insert(id, Arc::new(Mutex::new(game)));
            state.memberships.insert(owner, id);
            id
        };
        info!("lobby: {owner} created {id}");

        hub.notify(&[owner], Broadcast::GameCreated { game: id, owner })
            .await;
        Ok(id)
    }

    /// Sit `player` at table `id`.
    pub async fn join_game(
        &self,
        hub: &dyn GameHub,
        player: PlayerId,
        id: GameId,
    ) -> Result<(), GameError> {
        // The seat is reserved before the table is free to take it.
        let table = {
            let mut state = self.state.lock().await;
            if state.memberships.contains_key(&player) {
                return Err(GameError::AlreadyJoined(player));
            }
            let table = Arc::clone(state.games.get(&id).ok_or(GameError::UnknownGame(id))?);
            state.memberships.insert(player, id);
            table
        };

        let mut game = table.lock().await;
        if let Err(err) = game.join(player) {
            self.state.lock().await.memberships.remove(&player);
            return Err(err);
        }
        hub.notify(&game.player_ids(), Broadcast::PlayerJoined { game: id, player })
            .await;
        Ok(())
    }

    /// Record `player`'s villain. Returns whether the table auto-started.
    pub async fn choose_villain(
        &self,
        hub: &dyn GameHub,
        player: PlayerId,
        villain: &str,
    ) -> Result<bool, GameError> {
        let (id, table) = self.table_of(player).await?;
        let mut game = table.lock().await;

        game.choose_villain(player, villain)?;
        let everyone = game.player_ids();
        hub.notify(
            &everyone,
            Broadcast::VillainChosen {
                player,
                villain: villain.to_owned(),
            },
        )
        .await;

        if !game.is_ready() {
            return Ok(false);
        }
        if game.config.auto_start {
            info!("lobby: {id} is complete, starting");
            game.start(hub).await?;
            return Ok(true);
        }
        hub.notify(&everyone, Broadcast::GameReadyToStart { game: id })
            .await;
        Ok(false)
    }

    /// Start `player`'s table. Only its owner may.
    pub async fn start_game(&self, hub: &dyn GameHub, player: PlayerId) -> Result<(), GameError> {
        let (_, table) = self.table_of(player).await?;
        let mut game = table.lock().await;
        if game.owner() != Some(player) {
            return Err(GameError::NotOwner(player));
        }
        game.start(hub).await
    }

    /// Run `player`'s turn at its table.
    pub async fn play_turn(
        &self,
        hub: &dyn GameHub,
        player: PlayerId,
    ) -> Result<TurnOutcome, GameError> {
        let (_, table) = self.table_of(player).await?;
        let mut game = table.lock().await;
        game.play_turn(hub, player).await
    }

    /// Take `player` away from its table.
    pub async fn leave_game(
        &self,
        hub: &dyn GameHub,
        player: PlayerId,
    ) -> Result<Removal, GameError> {
        let (id, table) = self.table_of(player).await?;
        let mut game = table.lock().await;
        let removal = game.remove_player(player)?;
        {
            let mut state = self.state.lock().await;
            if state.memberships.get(&player) == Some(&id) {
                state.memberships.remove(&player);
            }
            if removal == Removal::Abandoned {
                state.games.remove(&id);
            }
        }

        match removal {
            Removal::Abandoned => {
                hub.notify(&[player], Broadcast::GameAbandoned { game: id })
                    .await;
            }
            Removal::Removed { skipped_turn, .. } => {
                let mut audience = game.player_ids();
                audience.push(player);
                hub.notify(&audience, Broadcast::PlayerLeft { game: id, player })
                    .await;
                if skipped_turn && game.status == GameStatus::Started {
                    if let Err(err) = game.announce_turn(hub).await {
                        warn!("lobby: could not announce the next turn of {id}: {err}");
                    }
                }
            }
        }
        Ok(removal)
    }

    /// Look up `player`'s table, releasing the registry before returning.
    async fn table_of(&self, player: PlayerId) -> Result<(GameId, Arc<Mutex<Game>>), GameError> {
        self.state.lock().await.table_of(player)
    }

    /// Every open table.
    pub async fn games(&self) -> Vec<GameSummary> {
        let tables: Vec<_> = {
            let state = self.state.lock().await;
            state.games.values().cloned().collect()
        };
        let mut summaries = Vec::with_capacity(tables.len());
        for table in tables {
            let game = table.lock().await;
            summaries.push(GameSummary {
                id: game.id,
                status: game.status,
                owner: game.owner(),
                players: game.player_ids(),
            });
        }
        summaries.sort_by_key(|s| s.id);
        summaries
    }

    /// The table `player` sits at.
    pub async fn game_of(&self, player: PlayerId) -> Option<Arc<Mutex<Game>>> {
        self.table_of(player).await.ok().map(|(_, table)| table)
    }
}
