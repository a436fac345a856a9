//! What a player gets to see.
//!
//! Views are plain serializable snapshots built from a [`Game`]. A player's
//! own view shows everything; an opponent's view hides the hand unless one of
//! that opponent's cards answers the `CardsRevealed` query with `true`.

use serde::{Deserialize, Serialize};

use crate::cards::{CardCategory, Placement, Side};
use crate::core::{Action, EntityId, GameError, PlayerId};
use crate::effects::Query;
use crate::game::{Game, GameId};

/// A card as shown to players, strength and cost already computed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: EntityId,
    pub name: String,
    pub category: CardCategory,
    pub cost: Option<i32>,
    pub strength: Option<i32>,
    pub description: String,
    pub placement: Option<Placement>,
    pub attachments: Vec<CardView>,
}

/// A location as shown to players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationView {
    pub index: usize,
    pub name: String,
    pub locked: bool,
    pub hero_cards: Vec<CardView>,
    pub ally_cards: Vec<CardView>,
    pub actions: Vec<Action>,
}

/// A player's own board and hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub villain: Option<String>,
    pub power: i32,
    pub location: usize,
    pub hand: Vec<CardView>,
    pub locations: Vec<LocationView>,
    pub villain_deck: usize,
    pub villain_discard: Vec<CardView>,
    pub fate_deck: usize,
    pub fate_discard: Vec<CardView>,
}

/// Another player's board; the hand is only listed when revealed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentView {
    pub id: PlayerId,
    pub villain: Option<String>,
    pub power: i32,
    pub location: usize,
    pub hand_size: usize,
    pub hand: Option<Vec<CardView>>,
    pub locations: Vec<LocationView>,
}

/// Everything one player may see at once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub game: GameId,
    pub round: u32,
    pub current: Option<PlayerId>,
    pub me: PlayerView,
    pub opponents: Vec<OpponentView>,
}

impl Game {
    /// Snapshot one card (and its attachments).
    pub fn card_view(&self, id: EntityId) -> Result<CardView, GameError> {
        let card = self.cards.card(id)?;
        let attachments = card
            .attachments
            .iter()
            .map(|sub| self.card_view(*sub))
            .collect::<Result<_, _>>()?;
        Ok(CardView {
            id,
            name: card.name().to_owned(),
            category: card.category(),
            cost: self.card_cost(id, None)?,
            strength: self.card_strength(id)?,
            description: card.definition.description.clone(),
            placement: card.placement,
            attachments,
        })
    }

    /// Snapshot several cards.
    pub fn card_views(&self, ids: &[EntityId]) -> Result<Vec<CardView>, GameError> {
        ids.iter().map(|id| self.card_view(*id)).collect()
    }

    /// Snapshot one of `player`'s locations, actions computed for `player`.
    pub fn location_view(&self, player: PlayerId, index: usize) -> Result<LocationView, GameError> {
        let location = self.player(player)?.location(index)?;
        Ok(LocationView {
            index,
            name: location.name.clone(),
            locked: location.locked,
            hero_cards: self.card_views(location.stack(Side::Hero))?,
            ally_cards: self.card_views(location.stack(Side::Ally))?,
            actions: self.location_actions(player, index)?,
        })
    }

    /// Snapshot several locations.
    pub fn location_views(
        &self,
        player: PlayerId,
        indices: &[usize],
    ) -> Result<Vec<LocationView>, GameError> {
        indices
            .iter()
            .map(|index| self.location_view(player, *index))
            .collect()
    }

    /// `player`'s complete view of its own state.
    pub fn player_view(&self, player: PlayerId) -> Result<PlayerView, GameError> {
        let p = self.player(player)?;
        Ok(PlayerView {
            id: player,
            villain: p.villain_name(),
            power: p.power,
            location: p.location_index,
            hand: self.card_views(&p.hand)?,
            locations: self.location_views(player, &(0..p.locations.len()).collect::<Vec<_>>())?,
            villain_deck: p.villain_deck.len(),
            villain_discard: self.card_views(&p.villain_discard)?,
            fate_deck: p.fate_deck.len(),
            fate_discard: self.card_views(&p.fate_discard)?,
        })
    }

    /// Is `player`'s hand visible to everyone?
    #[must_use]
    pub fn cards_revealed(&self, player: PlayerId) -> bool {
        self.query_any(player, Query::CardsRevealed)
    }

    /// What opponents see of `player`.
    pub fn opponent_view(&self, player: PlayerId) -> Result<OpponentView, GameError> {
        let p = self.player(player)?;
        let hand = if self.cards_revealed(player) {
            Some(self.card_views(&p.hand)?)
        } else {
            None
        };
        Ok(OpponentView {
            id: player,
            villain: p.villain_name(),
            power: p.power,
            location: p.location_index,
            hand_size: p.hand.len(),
            hand,
            locations: self.location_views(player, &(0..p.locations.len()).collect::<Vec<_>>())?,
        })
    }

    /// Everything `viewer` may see.
    pub fn game_view(&self, viewer: PlayerId) -> Result<GameView, GameError> {
        let opponents = self
            .players
            .iter()
            .filter(|p| p.id != viewer)
            .map(|p| self.opponent_view(p.id))
            .collect::<Result<_, _>>()?;
        Ok(GameView {
            game: self.id,
            round: self.round,
            current: self.current_player_id().ok(),
            me: self.player_view(viewer)?,
            opponents,
        })
    }
}
