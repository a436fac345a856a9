//! Defeating heroes.
//!
//! A Vanquish action picks a hero whose location holds enough allies, then
//! the player commits a group of those allies. The hero and every committed
//! ally go to their discard piles and `HeroVanquished` is published.

use log::info;

use crate::core::{EntityId, GameError, PlayerId};
use crate::effects::Notification;
use crate::game::Game;
use crate::hub::ask::choose_many;
use crate::hub::{GameHub, Question};

/// Pick the cheapest group of allies that defeats a hero.
///
/// Returns indices into `strengths`, ascending. Among the groups with at
/// least `min_count` members (and at least one) whose total reaches
/// `target`, the smallest total wins, then the smallest group, then the
/// group found first when every ally is tried included before excluded.
///
/// ```
/// use villainous::rules::select_allies;
///
/// assert_eq!(select_allies(&[1, 1, 3, 4], 4, 1), Some(vec![3]));
/// assert_eq!(select_allies(&[1, 1, 3, 4], 4, 2), Some(vec![0, 2]));
/// assert_eq!(select_allies(&[1, 2], 5, 1), None);
/// ```
#[must_use]
pub fn select_allies(strengths: &[i32], target: i32, min_count: usize) -> Option<Vec<usize>> {
    let mut best = None;
    let mut chosen = Vec::with_capacity(strengths.len());
    search(strengths, target, min_count.max(1), 0, 0, &mut chosen, &mut best);
    best.map(|(_, _, group)| group)
}

fn search(
    strengths: &[i32],
    target: i32,
    min_count: usize,
    index: usize,
    sum: i32,
    chosen: &mut Vec<usize>,
    best: &mut Option<(i32, usize, Vec<usize>)>,
) {
    if index == strengths.len() {
        if chosen.len() >= min_count && sum >= target {
            let better = best
                .as_ref()
                .map_or(true, |(s, n, _)| (sum, chosen.len()) < (*s, *n));
            if better {
                *best = Some((sum, chosen.len(), chosen.clone()));
            }
        }
        return;
    }

    chosen.push(index);
    search(strengths, target, min_count, index + 1, sum + strengths[index], chosen, best);
    chosen.pop();
    search(strengths, target, min_count, index + 1, sum, chosen, best);
}

impl Game {
    /// Ask `player` which allies attack `hero`, then defeat it.
    pub async fn vanquish_hero(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
        hero: EntityId,
    ) -> Result<(), GameError> {
        let required = self.required_ally_count(player, hero);
        let allies = self.attacking_allies(player, hero)?;
        let question = Question::ChooseAlliesForVanquish {
            hero: self.card_view(hero)?,
            allies: self.card_views(&allies)?,
            required,
        };
        let picked = choose_many(hub, player, question, allies.len(), 0, allies.len()).await?;
        let committed: Vec<EntityId> = picked.into_iter().map(|i| allies[i]).collect();
        self.defeat_hero(hub, player, hero, &committed).await
    }

    /// Defeat `hero` with `allies` already chosen.
    pub async fn defeat_hero(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
        hero: EntityId,
        allies: &[EntityId],
    ) -> Result<(), GameError> {
        let attackers = self.attacking_allies(player, hero)?;
        if let Some(stranger) = allies.iter().find(|a| !attackers.contains(a)) {
            return Err(GameError::protocol(
                player,
                format!("{stranger} is not an ally at the hero's location"),
            ));
        }
        self.check_vanquish(player, hero, allies)?;

        let (strength, location) = self.defeat_target(hero)?;
        self.discard_from_board(hero)?;
        for ally in allies {
            self.discard_from_board(*ally)?;
        }
        info!(
            "turn: {player} vanquished {hero} (strength {strength}) with {} allies",
            allies.len()
        );
        self.publish(
            hub,
            player,
            Notification::HeroVanquished {
                hero,
                strength,
                location,
            },
        )
        .await
    }

    /// Defeat `hero` by a card ability, without committing allies.
    pub async fn defeat_hero_directly(
        &mut self,
        hub: &dyn GameHub,
        player: PlayerId,
        hero: EntityId,
    ) -> Result<(), GameError> {
        let (strength, location) = self.defeat_target(hero)?;
        self.discard_from_board(hero)?;
        info!("turn: {player} defeated {hero} (strength {strength}) by an ability");
        self.publish(
            hub,
            player,
            Notification::HeroVanquished {
                hero,
                strength,
                location,
            },
        )
        .await
    }

    fn defeat_target(&self, hero: EntityId) -> Result<(i32, usize), GameError> {
        let strength = self.card_strength(hero)?.unwrap_or(0);
        let location = self
            .cards
            .card(hero)?
            .location()
            .ok_or_else(|| GameError::InvariantViolation(format!("{hero} is not on the board")))?;
        Ok((strength, location))
    }
}
