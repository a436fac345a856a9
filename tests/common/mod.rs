//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use villainous::core::{GameConfig, HubError, PlayerId};
use villainous::game::{Game, GameId};
use villainous::hub::{Answer, Bot, Broadcast, GameHub, Question};
use villainous::player::Zone;
use villainous::villains::VillainRegistry;
use villainous::EntityId;

pub const ALICE: PlayerId = PlayerId::new(1);
pub const BOB: PlayerId = PlayerId::new(2);
pub const CAROL: PlayerId = PlayerId::new(3);

/// Answers from a script first, then like the reference bot. Records every
/// question label and broadcast.
#[derive(Default)]
pub struct ScriptedHub {
    answers: Mutex<VecDeque<Answer>>,
    asked: Mutex<Vec<(PlayerId, &'static str)>>,
    broadcasts: Mutex<Vec<Broadcast>>,
}

impl ScriptedHub {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn asked(&self) -> Vec<&'static str> {
        self.asked.lock().unwrap().iter().map(|(_, label)| *label).collect()
    }

    pub fn asked_players(&self) -> Vec<PlayerId> {
        self.asked.lock().unwrap().iter().map(|(player, _)| *player).collect()
    }

    pub fn broadcasts(&self) -> Vec<Broadcast> {
        self.broadcasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GameHub for ScriptedHub {
    async fn ask(&self, player: PlayerId, question: Question) -> Result<Answer, HubError> {
        self.asked.lock().unwrap().push((player, question.label()));
        let scripted = self.answers.lock().unwrap().pop_front();
        Ok(scripted.unwrap_or_else(|| Bot::answer(&question)))
    }

    async fn notify(&self, _players: &[PlayerId], message: Broadcast) {
        self.broadcasts.lock().unwrap().push(message);
    }
}

/// A hub whose players never answer.
pub struct Disconnected;

#[async_trait]
impl GameHub for Disconnected {
    async fn ask(&self, _player: PlayerId, _question: Question) -> Result<Answer, HubError> {
        Err(HubError::Disconnected)
    }

    async fn notify(&self, _players: &[PlayerId], _message: Broadcast) {}
}

/// A created table with every player seated and on Maleficent.
pub fn table(seed: u64, players: &[PlayerId]) -> Game {
    let mut game = Game::new(
        GameId::new(1),
        players[0],
        GameConfig::default().with_seed(seed),
        Arc::new(VillainRegistry::with_defaults()),
    );
    for &player in &players[1..] {
        game.join(player).unwrap();
    }
    for &player in players {
        game.choose_villain(player, "Maleficent").unwrap();
    }
    game
}

/// A started two-player game.
pub async fn started(seed: u64) -> Game {
    started_with(seed, &[ALICE, BOB]).await
}

pub async fn started_with(seed: u64, players: &[PlayerId]) -> Game {
    let mut game = table(seed, players);
    game.start(&ScriptedHub::default()).await.unwrap();
    game
}

/// The current player and the next one.
pub fn seats(game: &Game) -> (PlayerId, PlayerId) {
    let current = game.current_player_id().unwrap();
    let other = game.player_ids().into_iter().find(|&p| p != current).unwrap();
    (current, other)
}

/// Take a card named `name` out of whatever zone holds it. The card is left
/// in no zone.
pub fn pull(game: &mut Game, player: PlayerId, name: &str) -> EntityId {
    for zone in Zone::ALL {
        if let Some(card) = game.find_card(player, zone, name) {
            game.player_mut(player).unwrap().take(zone, card);
            return card;
        }
    }
    panic!("{player} has no {name} left in any zone");
}

/// Make sure a card named `name` is in `player`'s hand.
pub fn to_hand(game: &mut Game, player: PlayerId, name: &str) -> EntityId {
    if let Some(card) = game.find_card(player, Zone::Hand, name) {
        return card;
    }
    let card = pull(game, player, name);
    game.player_mut(player).unwrap().hand.push(card);
    card
}

/// Put a card named `name` straight onto a board, without triggering it.
pub fn place(game: &mut Game, player: PlayerId, name: &str, location: usize) -> EntityId {
    use villainous::board::PlayTarget;

    let card = pull(game, player, name);
    let side = game.card(card).unwrap().category().side();
    game.place_card(player, card, PlayTarget::new(location, side))
        .unwrap();
    card
}
