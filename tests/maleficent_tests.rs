//! Maleficent's cards, exercised on a started two-player game.

mod common;

use common::{place, pull, seats, started, to_hand, ScriptedHub};
use villainous::cards::{Activation, Moment, Side};
use villainous::core::{ActionKind, ActionTemplate, ErrorKind, GameError};
use villainous::effects::{Duration, Notification, NotificationKind};
use villainous::game::{Game, TurnOutcome};
use villainous::hub::{Answer, BotHub};
use villainous::player::Zone;
use villainous::{EntityId, PlayerId};

fn strength(game: &Game, card: EntityId) -> i32 {
    game.card_strength(card).unwrap().unwrap()
}

fn rich(game: &mut Game, player: PlayerId) {
    game.player_mut(player).unwrap().power = 20;
}

/// Put a fate card from `owner`'s fate deck on top of it.
fn on_top(game: &mut Game, owner: PlayerId, name: &str) -> EntityId {
    let card = pull(game, owner, name);
    game.player_mut(owner).unwrap().fate_deck.push(card);
    card
}

#[tokio::test]
async fn test_goon_strengths() {
    let mut game = started(21).await;
    let (me, _) = seats(&game);

    let cackling = place(&mut game, me, "Cackling Goon", 0);
    let sinister = place(&mut game, me, "Sinister Goon", 1);
    assert_eq!(strength(&game, cackling), 1);
    assert_eq!(strength(&game, sinister), 3);

    place(&mut game, me, "Guards", 0);
    place(&mut game, me, "Aurora", 0);
    place(&mut game, me, "Green Fire", 1);
    assert_eq!(strength(&game, cackling), 3);
    assert_eq!(strength(&game, sinister), 4);
}

#[tokio::test]
async fn test_dreamless_sleep_weakens_heroes_until_an_ally_arrives() {
    let mut game = started(22).await;
    let (me, _) = seats(&game);
    rich(&mut game, me);
    let guards = place(&mut game, me, "Guards", 2);

    let sleep = to_hand(&mut game, me, "Dreamless Sleep");
    let target = villainous::board::PlayTarget::new(2, Side::Ally);
    game.play_card(&BotHub, me, sleep, Some(target)).await.unwrap();
    assert_eq!(strength(&game, guards), 1);
    assert_eq!(game.player(me).unwrap().power, 17);

    let goon = to_hand(&mut game, me, "Savage Goon");
    game.play_card(&BotHub, me, goon, Some(target)).await.unwrap();
    assert!(game.player(me).unwrap().villain_discard.contains(&sleep));
    assert_eq!(game.bus.subscriptions_of(sleep), 0);
    assert_eq!(strength(&game, guards), 3);
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_staff_discounts_at_villain_location() {
    let mut game = started(23).await;
    let (me, _) = seats(&game);
    rich(&mut game, me);
    let forest = to_hand(&mut game, me, "Forest of Thorns");
    let dragon = to_hand(&mut game, me, "Dragon Form");
    assert_eq!(game.card_cost(forest, Some(0)).unwrap(), Some(3));

    let staff = to_hand(&mut game, me, "Staff");
    let target = villainous::board::PlayTarget::new(0, Side::Ally);
    game.play_card(&BotHub, me, staff, Some(target)).await.unwrap();

    assert_eq!(game.card_cost(forest, Some(0)).unwrap(), Some(2));
    assert_eq!(game.card_cost(forest, Some(1)).unwrap(), Some(3));
    assert_eq!(game.card_cost(dragon, None).unwrap(), Some(0));

    game.player_mut(me).unwrap().location_index = 1;
    assert_eq!(game.card_cost(forest, Some(0)).unwrap(), Some(3));
}

#[tokio::test]
async fn test_sword_of_truth() {
    let mut game = started(24).await;
    let (me, other) = seats(&game);
    let guards = place(&mut game, me, "Guards", 1);
    let curse = to_hand(&mut game, me, "Green Fire");

    let sword = pull(&mut game, me, "Sword of Truth");
    game.play_fate_card(&BotHub, other, me, sword, &[]).await.unwrap();

    let holder = game.card(guards).unwrap();
    assert_eq!(holder.attachments.as_slice(), &[sword]);
    assert_eq!(strength(&game, guards), 5);
    assert_eq!(game.card_cost(curse, Some(1)).unwrap(), Some(5));
    assert_eq!(game.card_cost(curse, Some(2)).unwrap(), Some(3));
    assert_eq!(game.turn.fated_player, Some(me));

    // The hero already carries an item.
    let second = pull(&mut game, me, "Sword of Truth");
    game.activate(&BotHub, Activation::new(me, second, Moment::OnReceive))
        .await
        .unwrap();
    assert!(game.fate_locations(me, second).is_empty());
    game.player_mut(me).unwrap().fate_deck.push(second);
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_guards_need_two_allies() {
    let mut game = started(25).await;
    let (me, other) = seats(&game);
    let guards = pull(&mut game, me, "Guards");
    game.play_fate_card(&BotHub, other, me, guards, &[]).await.unwrap();
    assert_eq!(game.card(guards).unwrap().location(), Some(0));
    let flora = place(&mut game, me, "Flora", 3);

    assert_eq!(game.required_ally_count(me, guards), 2);
    assert_eq!(game.required_ally_count(me, flora), 1);

    let goon = place(&mut game, me, "Savage Goon", 0);
    assert_eq!(
        game.check_vanquish(me, guards, &[goon]),
        Err(GameError::NotEnoughAllies {
            required: 2,
            provided: 1
        })
    );
    assert!(game.defeatable_heroes(me).is_empty());

    let second = place(&mut game, me, "Cackling Goon", 0);
    assert_eq!(game.check_vanquish(me, guards, &[goon, second]), Ok(()));
}

#[tokio::test]
async fn test_vanquish_with_spinning_wheel() {
    let mut game = started(26).await;
    let (me, _) = seats(&game);
    rich(&mut game, me);
    let stefan = place(&mut game, me, "King Stefan", 3);
    let savage = place(&mut game, me, "Savage Goon", 3);
    let cackling = place(&mut game, me, "Cackling Goon", 3);

    let wheel = to_hand(&mut game, me, "Spinning Wheel");
    let target = villainous::board::PlayTarget::new(3, Side::Ally);
    game.play_card(&BotHub, me, wheel, Some(target)).await.unwrap();
    assert_eq!(game.player(me).unwrap().power, 19);

    let hub = ScriptedHub::default();
    game.vanquish_hero(&hub, me, stefan).await.unwrap();

    let p = game.player(me).unwrap();
    assert!(p.fate_discard.contains(&stefan));
    assert!(p.villain_discard.contains(&savage));
    assert!(!p.villain_discard.contains(&cackling));
    assert_eq!(p.power, 22);
    assert_eq!(hub.asked(), vec!["allies for vanquish"]);
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_too_weak_allies_are_rejected() {
    let mut game = started(27).await;
    let (me, _) = seats(&game);
    let phillip = place(&mut game, me, "Prince Phillip", 1);
    let goon = place(&mut game, me, "Sinister Goon", 1);

    let hub = ScriptedHub::new([Answer::Indices(vec![0])]);
    let err = game.vanquish_hero(&hub, me, phillip).await.unwrap_err();
    assert_eq!(
        err,
        GameError::AlliesTooWeak {
            strength: 3,
            hero_strength: 5
        }
    );
    assert_eq!(game.card(goon).unwrap().location(), Some(1));
    assert_eq!(game.card(phillip).unwrap().location(), Some(1));
}

#[tokio::test]
async fn test_green_fire() {
    let mut game = started(28).await;
    let (me, _) = seats(&game);
    rich(&mut game, me);
    let fire = to_hand(&mut game, me, "Green Fire");
    let target = villainous::board::PlayTarget::new(1, Side::Ally);
    game.play_card(&BotHub, me, fire, Some(target)).await.unwrap();

    let guards = game.find_card(me, Zone::FateDeck, "Guards").unwrap();
    assert_eq!(game.fate_locations(me, guards), vec![0, 2, 3]);

    game.move_villain(&BotHub, me, me, true).await.unwrap();
    assert_eq!(game.player(me).unwrap().location_index, 1);
    assert!(game.player(me).unwrap().villain_discard.contains(&fire));
    assert_eq!(game.fate_locations(me, guards), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_forest_of_thorns_and_merryweather() {
    let mut game = started(29).await;
    let (me, other) = seats(&game);
    rich(&mut game, me);
    let forest = to_hand(&mut game, me, "Forest of Thorns");
    let target = villainous::board::PlayTarget::new(2, Side::Ally);
    game.play_card(&BotHub, me, forest, Some(target)).await.unwrap();

    let guards = game.find_card(me, Zone::FateDeck, "Guards").unwrap();
    assert_eq!(game.fate_locations(me, guards), vec![0, 1, 3]);

    let merryweather = pull(&mut game, me, "Merryweather");
    assert_eq!(game.fate_locations(me, merryweather), vec![0, 1, 2, 3]);
    let hub = ScriptedHub::new([Answer::Index(2)]);
    game.play_fate_card(&hub, other, me, merryweather, &[])
        .await
        .unwrap();
    assert_eq!(game.card(merryweather).unwrap().location(), Some(2));
    assert!(game.player(me).unwrap().villain_discard.contains(&forest));

    let fire = to_hand(&mut game, me, "Green Fire");
    assert!(!game.location_accepts(me, fire, 2));
    assert!(game.location_accepts(me, fire, 1));
}

#[tokio::test]
async fn test_tyranny_interrupts_once_per_turn() {
    let mut game = started(30).await;
    let (me, other) = seats(&game);
    for location in 0..3 {
        place(&mut game, me, "Savage Goon", location);
    }
    let tyranny = to_hand(&mut game, other, "Tyranny");
    let before = game.player(other).unwrap().hand.len();

    let hub = ScriptedHub::default();
    game.check_conditions(&hub).await.unwrap();
    let p = game.player(other).unwrap();
    assert!(p.villain_discard.contains(&tyranny));
    assert_eq!(p.hand.len(), before - 1);
    assert_eq!(p.villain_discard.len(), 4);
    assert_eq!(hub.asked(), vec!["activate condition", "cards to discard"]);
    assert_eq!(hub.asked_players(), vec![other, other]);

    game.check_conditions(&hub).await.unwrap();
    assert_eq!(hub.asked().len(), 2);
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_tyranny_needs_three_allies() {
    let mut game = started(30).await;
    let (me, other) = seats(&game);
    place(&mut game, me, "Savage Goon", 0);
    place(&mut game, me, "Savage Goon", 1);
    let tyranny = to_hand(&mut game, other, "Tyranny");

    let hub = ScriptedHub::default();
    game.check_conditions(&hub).await.unwrap();
    assert!(hub.asked().is_empty());
    assert!(game.player(other).unwrap().hand.contains(&tyranny));
}

#[tokio::test]
async fn test_malice_answers_a_strong_defeat() {
    let mut game = started(31).await;
    let (me, other) = seats(&game);
    let theirs = place(&mut game, other, "Guards", 0);
    let malice = to_hand(&mut game, other, "Malice");
    game.activate(&BotHub, Activation::new(other, malice, Moment::OnReceive))
        .await
        .unwrap();

    let stefan = place(&mut game, me, "King Stefan", 3);
    let goon = place(&mut game, me, "Savage Goon", 3);
    game.defeat_hero(&BotHub, me, stefan, &[goon]).await.unwrap();

    let p = game.player(other).unwrap();
    assert!(p.fate_discard.contains(&theirs));
    assert!(p.villain_discard.contains(&malice));
    assert!(!p.hand.contains(&malice));
    assert_eq!(game.bus.subscriptions_of(malice), 0);
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_malice_ignores_weak_defeats() {
    let mut game = started(31).await;
    let (me, other) = seats(&game);
    place(&mut game, other, "Guards", 0);
    let malice = to_hand(&mut game, other, "Malice");
    game.activate(&BotHub, Activation::new(other, malice, Moment::OnReceive))
        .await
        .unwrap();

    let flora = place(&mut game, me, "Flora", 3);
    let goon = place(&mut game, me, "Savage Goon", 3);
    let hub = ScriptedHub::default();
    game.defeat_hero(&hub, me, flora, &[goon]).await.unwrap();

    assert!(hub.asked().is_empty());
    assert!(game.player(other).unwrap().hand.contains(&malice));
}

#[tokio::test]
async fn test_dragon_form() {
    let mut game = started(32).await;
    let (me, _) = seats(&game);
    rich(&mut game, me);
    let dragon = to_hand(&mut game, me, "Dragon Form");
    assert!(!game.can_play_card(me, dragon));

    let fauna = place(&mut game, me, "Fauna", 2);
    assert!(game.can_play_card(me, dragon));
    game.play_card(&BotHub, me, dragon, None).await.unwrap();
    assert!(game.player(me).unwrap().fate_discard.contains(&fauna));
    assert_eq!(game.bus.notification_handlers(NotificationKind::Fated, me).len(), 1);

    let power = game.player(me).unwrap().power;
    game.publish(&BotHub, me, Notification::Fated { card: fauna })
        .await
        .unwrap();
    assert_eq!(game.player(me).unwrap().power, power + 3);

    game.bus.duration_ended_for(me, Duration::UntilStartOfNextTurn);
    assert_eq!(game.bus.subscriptions_of(dragon), 0);
}

#[tokio::test]
async fn test_rejected_dragon_form_goes_back_to_the_hand() {
    let mut game = started(32).await;
    let (me, _) = seats(&game);
    rich(&mut game, me);
    let dragon = to_hand(&mut game, me, "Dragon Form");
    let fauna = place(&mut game, me, "Fauna", 2);
    let hand = game.player(me).unwrap().hand.len();

    let hub = ScriptedHub::new([Answer::Index(99)]);
    let err = game.play_card(&hub, me, dragon, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalAction);

    let p = game.player(me).unwrap();
    assert!(p.hand.contains(&dragon));
    assert_eq!(p.hand.len(), hand);
    assert!(!p.villain_discard.contains(&dragon));
    assert_eq!(p.power, 20);
    assert_eq!(game.card(fauna).unwrap().location(), Some(2));
    assert_eq!(game.bus.subscriptions_of(dragon), 0);
    game.verify_all().unwrap();

    let outcome = game.play_turn(&BotHub, me).await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Passed { .. }));
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_failed_fate_effect_still_lands_in_the_discard() {
    let mut game = started(34).await;
    let (me, other) = seats(&game);
    place(&mut game, other, "Guards", 1);
    place(&mut game, other, "Forest of Thorns", 1);
    let dream = pull(&mut game, other, "Once Upon a Dream");

    let hub = ScriptedHub::new([Answer::Index(99)]);
    let err = game
        .play_fate_card(&hub, me, other, dream, &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalAction);
    assert!(game.player(other).unwrap().fate_discard.contains(&dream));
    assert_eq!(hub.asked(), vec!["special location"]);
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_raven_acts_before_the_move() {
    let mut game = started(33).await;
    let (me, _) = seats(&game);
    let raven = place(&mut game, me, "Raven", 0);

    let pick = game
        .location_actions(me, 2)
        .unwrap()
        .into_iter()
        .filter(|a| a.is_available() && a.template.kind != ActionKind::Fate)
        .position(|a| a.template == ActionTemplate::gain_power(3))
        .unwrap();
    let power = game.player(me).unwrap().power;

    let hub = ScriptedHub::new([Answer::YesNo(true), Answer::Index(1), Answer::Index(pick)]);
    let activated = game
        .activate(&hub, Activation::new(me, raven, Moment::BeforeVillainMove))
        .await
        .unwrap();
    assert!(activated);
    assert_eq!(game.card(raven).unwrap().location(), Some(2));
    assert_eq!(game.player(me).unwrap().power, power + 3);
    assert_eq!(game.player(me).unwrap().location_index, 0);
    assert_eq!(
        hub.asked(),
        vec!["perform special", "special location", "special action"]
    );
}

#[tokio::test]
async fn test_raven_may_stay_put() {
    let mut game = started(33).await;
    let (me, _) = seats(&game);
    let raven = place(&mut game, me, "Raven", 0);
    let hub = ScriptedHub::new([Answer::YesNo(false)]);
    game.activate(&hub, Activation::new(me, raven, Moment::BeforeVillainMove))
        .await
        .unwrap();
    assert_eq!(game.card(raven).unwrap().location(), Some(0));
}

#[tokio::test]
async fn test_once_upon_a_dream() {
    let mut game = started(34).await;
    let (me, other) = seats(&game);
    place(&mut game, me, "Flora", 1);
    let curse = place(&mut game, me, "Green Fire", 1);
    let unguarded = place(&mut game, me, "Green Fire", 3);

    let dream = pull(&mut game, me, "Once Upon a Dream");
    game.play_fate_card(&BotHub, other, me, dream, &[]).await.unwrap();

    let p = game.player(me).unwrap();
    assert!(p.villain_discard.contains(&curse));
    assert!(!p.villain_discard.contains(&unguarded));
    assert!(p.fate_discard.contains(&dream));
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_aurora_plays_the_next_hero() {
    let mut game = started(35).await;
    let (me, other) = seats(&game);
    let aurora = pull(&mut game, me, "Aurora");
    let guards = on_top(&mut game, me, "Guards");
    let deck = game.player(me).unwrap().fate_deck.len();

    game.play_fate_card(&BotHub, other, me, aurora, &[]).await.unwrap();

    assert_eq!(game.card(aurora).unwrap().location(), Some(0));
    assert_eq!(game.card(guards).unwrap().location(), Some(0));
    assert_eq!(game.player(me).unwrap().fate_deck.len(), deck - 1);
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_aurora_returns_anything_else() {
    let mut game = started(35).await;
    let (me, other) = seats(&game);
    let aurora = pull(&mut game, me, "Aurora");
    let dream = on_top(&mut game, me, "Once Upon a Dream");

    game.play_fate_card(&BotHub, other, me, aurora, &[]).await.unwrap();

    assert_eq!(game.player(me).unwrap().fate_deck.last(), Some(&dream));
    assert_eq!(game.card(dream).unwrap().location(), None);
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_fauna_wakes_the_location() {
    let mut game = started(36).await;
    let (me, other) = seats(&game);
    let sleep = place(&mut game, me, "Dreamless Sleep", 0);

    let fauna = pull(&mut game, me, "Fauna");
    let hub = ScriptedHub::default();
    game.play_fate_card(&hub, other, me, fauna, &[]).await.unwrap();

    assert!(game.player(me).unwrap().villain_discard.contains(&sleep));
    assert_eq!(hub.asked_players().last(), Some(&game.current_player_id().unwrap()));
}

#[tokio::test]
async fn test_flora_reveals_the_hand() {
    let mut game = started(37).await;
    let (me, other) = seats(&game);
    assert!(game.opponent_view(me).unwrap().hand.is_none());

    let flora = pull(&mut game, me, "Flora");
    game.play_fate_card(&BotHub, other, me, flora, &[]).await.unwrap();
    assert!(game.cards_revealed(me));
    let view = game.game_view(other).unwrap();
    let revealed = view.opponents[0].hand.as_ref().unwrap();
    assert_eq!(revealed.len(), game.player(me).unwrap().hand.len());

    game.discard_from_board(flora).unwrap();
    assert!(!game.cards_revealed(me));
}

#[tokio::test]
async fn test_king_hubert_gathers_neighbours() {
    let mut game = started(38).await;
    let (me, other) = seats(&game);
    let left = place(&mut game, me, "Savage Goon", 0);
    let right = place(&mut game, me, "Sinister Goon", 2);
    let far = place(&mut game, me, "Cackling Goon", 3);

    let hubert = pull(&mut game, me, "King Hubert");
    let hub = ScriptedHub::new([Answer::Index(1)]);
    game.play_fate_card(&hub, other, me, hubert, &[]).await.unwrap();

    assert_eq!(game.card(hubert).unwrap().location(), Some(1));
    assert_eq!(game.card(left).unwrap().location(), Some(1));
    assert_eq!(game.card(right).unwrap().location(), Some(1));
    assert_eq!(game.card(far).unwrap().location(), Some(3));
    game.verify_all().unwrap();
}

#[tokio::test]
async fn test_king_stefan_moves_the_villain() {
    let mut game = started(39).await;
    let (me, other) = seats(&game);
    let stefan = pull(&mut game, me, "King Stefan");
    let hub = ScriptedHub::default();
    game.play_fate_card(&hub, other, me, stefan, &[]).await.unwrap();

    assert_eq!(game.player(me).unwrap().location_index, 1);
    assert_eq!(
        hub.asked(),
        vec!["fate location", "move villain"]
    );
}

#[tokio::test]
async fn test_prince_phillip_clears_allies() {
    let mut game = started(40).await;
    let (me, other) = seats(&game);
    let a = place(&mut game, me, "Savage Goon", 0);
    let b = place(&mut game, me, "Raven", 0);
    let elsewhere = place(&mut game, me, "Sinister Goon", 1);

    let phillip = pull(&mut game, me, "Prince Phillip");
    game.play_fate_card(&BotHub, other, me, phillip, &[]).await.unwrap();

    let p = game.player(me).unwrap();
    assert!(p.villain_discard.contains(&a));
    assert!(p.villain_discard.contains(&b));
    assert!(!p.villain_discard.contains(&elsewhere));
    game.verify_all().unwrap();
}
