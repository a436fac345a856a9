//! Whole tables driven through the lobby.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use common::{ScriptedHub, ALICE, BOB, CAROL};
use villainous::core::{GameConfig, GameError, HubError, PlayerId};
use villainous::game::{GameStatus, Removal, TurnOutcome};
use villainous::hub::{Answer, Bot, BotHub, Broadcast, GameHub, Question};
use villainous::lobby::{Command, Lobby, Reply};
use villainous::villains::VillainRegistry;

fn lobby(auto_start: bool) -> Lobby {
    Lobby::new(
        GameConfig::default().with_seed(17).with_auto_start(auto_start),
        Arc::new(VillainRegistry::with_defaults()),
    )
}

/// Answers like the bot, but only once the gate has a permit.
struct GatedHub {
    gate: Semaphore,
    entered: Notify,
}

impl GatedHub {
    fn closed() -> Self {
        Self {
            gate: Semaphore::new(0),
            entered: Notify::new(),
        }
    }
}

#[async_trait]
impl GameHub for GatedHub {
    async fn ask(&self, _player: PlayerId, question: Question) -> Result<Answer, HubError> {
        self.entered.notify_one();
        let _permit = self.gate.acquire().await.map_err(|_| HubError::Disconnected)?;
        Ok(Bot::answer(&question))
    }

    async fn notify(&self, _players: &[PlayerId], _message: Broadcast) {}
}

fn maleficent() -> Command {
    Command::ChooseVillain {
        villain: "Maleficent".into(),
    }
}

#[tokio::test]
async fn test_table_lifecycle_broadcasts() {
    let hub = ScriptedHub::default();
    let lobby = lobby(false);

    let Reply::Created(id) = lobby.dispatch(&hub, ALICE, Command::CreateGame).await.unwrap() else {
        panic!("expected a new table");
    };
    lobby.dispatch(&hub, BOB, Command::JoinGame { game: id }).await.unwrap();
    lobby.dispatch(&hub, ALICE, maleficent()).await.unwrap();
    assert_eq!(
        lobby.dispatch(&hub, BOB, maleficent()).await,
        Ok(Reply::VillainChosen { started: false })
    );
    assert_eq!(lobby.dispatch(&hub, ALICE, Command::StartGame).await, Ok(Reply::Started));

    let broadcasts = hub.broadcasts();
    assert!(matches!(broadcasts[0], Broadcast::GameCreated { owner: ALICE, .. }));
    assert!(matches!(broadcasts[1], Broadcast::PlayerJoined { player: BOB, .. }));
    assert!(matches!(broadcasts[2], Broadcast::VillainChosen { player: ALICE, .. }));
    assert!(matches!(broadcasts[3], Broadcast::VillainChosen { player: BOB, .. }));
    assert!(matches!(broadcasts[4], Broadcast::GameReadyToStart { game } if game == id));
    assert!(matches!(broadcasts[5], Broadcast::GameStarted { .. }));
    assert!(broadcasts[6..]
        .iter()
        .all(|b| matches!(b, Broadcast::TurnStarted { round: 0, .. })));
}

#[tokio::test]
async fn test_turns_through_the_lobby() {
    let lobby = lobby(true);
    let id = lobby.create_game(&BotHub, ALICE).await.unwrap();
    lobby.join_game(&BotHub, BOB, id).await.unwrap();
    lobby.choose_villain(&BotHub, ALICE, "Maleficent").await.unwrap();
    assert!(lobby.choose_villain(&BotHub, BOB, "Maleficent").await.unwrap());

    let table = lobby.game_of(ALICE).await.unwrap();
    let (first, second) = {
        let game = table.lock().await;
        let order = game.player_ids();
        (order[game.current], order[(game.current + 1) % order.len()])
    };

    assert_eq!(
        lobby.play_turn(&BotHub, second).await,
        Err(GameError::NotYourTurn(second))
    );
    assert_eq!(
        lobby.dispatch(&BotHub, first, Command::PlayTurn).await,
        Ok(Reply::Turn(TurnOutcome::Passed { next: second }))
    );
    assert_eq!(table.lock().await.current_player_id().unwrap(), second);
}

#[tokio::test]
async fn test_leaving_mid_game_hands_the_turn_on() {
    let hub = ScriptedHub::default();
    let lobby = lobby(true);
    let id = lobby.create_game(&hub, ALICE).await.unwrap();
    lobby.join_game(&hub, BOB, id).await.unwrap();
    lobby.join_game(&hub, CAROL, id).await.unwrap();
    for player in [ALICE, BOB, CAROL] {
        lobby.choose_villain(&hub, player, "Maleficent").await.unwrap();
    }

    let table = lobby.game_of(BOB).await.unwrap();
    let current = table.lock().await.current_player_id().unwrap();
    let seen = hub.broadcasts().len();

    let Ok(Reply::Left(Removal::Removed { skipped_turn, .. })) =
        lobby.dispatch(&hub, current, Command::LeaveGame).await
    else {
        panic!("two players are still seated");
    };
    assert!(skipped_turn);

    let after = hub.broadcasts();
    assert!(matches!(after[seen], Broadcast::PlayerLeft { player, .. } if player == current));
    assert!(after[seen + 1..]
        .iter()
        .any(|b| matches!(b, Broadcast::TurnStarted { .. })));

    let game = table.lock().await;
    assert_eq!(game.status, GameStatus::Started);
    assert_eq!(game.player_ids().len(), 2);
    assert!(lobby.game_of(current).await.is_none());
}

#[tokio::test]
async fn test_join_requires_a_free_player_and_an_open_table() {
    let lobby = lobby(true);
    let id = lobby.create_game(&BotHub, ALICE).await.unwrap();
    assert_eq!(
        lobby.join_game(&BotHub, ALICE, id).await,
        Err(GameError::AlreadyJoined(ALICE))
    );

    lobby.join_game(&BotHub, BOB, id).await.unwrap();
    lobby.choose_villain(&BotHub, ALICE, "Maleficent").await.unwrap();
    lobby.choose_villain(&BotHub, BOB, "Maleficent").await.unwrap();
    assert!(matches!(
        lobby.join_game(&BotHub, CAROL, id).await,
        Err(GameError::WrongStatus { .. })
    ));
    assert!(lobby.game_of(CAROL).await.is_none());
}

#[tokio::test]
async fn test_lobby_serves_others_while_a_turn_waits() {
    let lobby = lobby(true);
    let id = lobby.create_game(&BotHub, ALICE).await.unwrap();
    lobby.join_game(&BotHub, BOB, id).await.unwrap();
    lobby.choose_villain(&BotHub, ALICE, "Maleficent").await.unwrap();
    lobby.choose_villain(&BotHub, BOB, "Maleficent").await.unwrap();
    let table = lobby.game_of(ALICE).await.unwrap();
    let current = table.lock().await.current_player_id().unwrap();

    // The turn holds its table while it waits for the first answer.
    let gated = GatedHub::closed();
    let turn = lobby.play_turn(&gated, current);
    tokio::pin!(turn);
    tokio::select! {
        biased;
        _ = &mut turn => panic!("the turn ended without an answer"),
        () = gated.entered.notified() => {}
    }

    // A join for the busy table queues behind the turn.
    let join = lobby.join_game(&BotHub, CAROL, id);
    tokio::pin!(join);
    tokio::select! {
        biased;
        _ = &mut join => panic!("joined a table in the middle of a turn"),
        () = tokio::task::yield_now() => {}
    }

    // Nobody else waits for either of them.
    let dave = PlayerId::new(4);
    let created = tokio::select! {
        biased;
        created = lobby.create_game(&BotHub, dave) => Some(created),
        () = async {
            for _ in 0..100 {
                tokio::task::yield_now().await;
            }
        } => None,
    };
    assert!(matches!(created, Some(Ok(_))), "create_game stalled: {created:?}");
    assert!(lobby.game_of(dave).await.is_some());

    gated.gate.add_permits(1);
    let (turn, join) = tokio::join!(turn, join);
    assert!(matches!(turn, Ok(TurnOutcome::Passed { .. })));
    assert!(matches!(join, Err(GameError::WrongStatus { .. })));
    assert!(lobby.game_of(CAROL).await.is_none());
}
