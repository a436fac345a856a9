//! Bus event types.
//!
//! Two families of events flow through the [`EffectBus`](super::EffectBus):
//!
//! - [`Notification`]s say that something happened. Handlers react and
//!   return nothing.
//! - [`Query`]s ask every subscribed card for its opinion on a calculation
//!   (a cost, a strength, whether something is allowed). The caller folds
//!   the answers with [`sum`], [`max`], [`all`] or [`any`].
//!
//! Both are closed enums; the handler tables are keyed by their `*Kind`
//! discriminants.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// Discriminant of a [`Notification`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    VillainMoved,
    CardPlayed,
    HeroVanquished,
    Fated,
}

/// Something that happened on a player's board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// The villain moved to `location`.
    VillainMoved { location: usize },
    /// A card was played from hand.
    CardPlayed { card: EntityId },
    /// A hero was defeated. The hero is already discarded.
    HeroVanquished {
        hero: EntityId,
        strength: i32,
        location: usize,
    },
    /// A card was played against its owner by a Fate action.
    Fated { card: EntityId },
}

impl Notification {
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Notification::VillainMoved { .. } => NotificationKind::VillainMoved,
            Notification::CardPlayed { .. } => NotificationKind::CardPlayed,
            Notification::HeroVanquished { .. } => NotificationKind::HeroVanquished,
            Notification::Fated { .. } => NotificationKind::Fated,
        }
    }
}

/// Discriminant of a [`Query`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKind {
    CardsRevealed,
    NeedsToMove,
    StrengthBonus,
    CostBonus,
    CanPlayCard,
    RequiredAllyCount,
    CanFate,
}

/// A calculation the engine asks subscribed cards about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Query {
    /// Is the player's hand visible to opponents?
    CardsRevealed,
    /// Must the villain leave its current location this turn?
    NeedsToMove,
    /// Modifier to a card's strength.
    StrengthBonus { card: EntityId },
    /// Modifier to a card's cost when played to `location`.
    CostBonus {
        card: EntityId,
        location: Option<usize>,
    },
    /// May `card` be played to `location`?
    CanPlayCard { card: EntityId, location: usize },
    /// How many allies a Vanquish against `hero` needs.
    RequiredAllyCount { hero: EntityId },
    /// May the fate card `card` be played to `location`?
    CanFate { card: EntityId, location: usize },
}

impl Query {
    #[must_use]
    pub const fn kind(&self) -> QueryKind {
        match self {
            Query::CardsRevealed => QueryKind::CardsRevealed,
            Query::NeedsToMove => QueryKind::NeedsToMove,
            Query::StrengthBonus { .. } => QueryKind::StrengthBonus,
            Query::CostBonus { .. } => QueryKind::CostBonus,
            Query::CanPlayCard { .. } => QueryKind::CanPlayCard,
            Query::RequiredAllyCount { .. } => QueryKind::RequiredAllyCount,
            Query::CanFate { .. } => QueryKind::CanFate,
        }
    }
}

/// One handler's answer to a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryValue {
    Bool(bool),
    Int(i32),
}

impl QueryValue {
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            QueryValue::Bool(b) => Some(b),
            QueryValue::Int(_) => None,
        }
    }

    #[must_use]
    pub const fn as_int(self) -> Option<i32> {
        match self {
            QueryValue::Int(n) => Some(n),
            QueryValue::Bool(_) => None,
        }
    }
}

/// Sum the numeric answers. `None` when nobody had an opinion.
pub fn sum(answers: impl IntoIterator<Item = Option<QueryValue>>) -> Option<i32> {
    answers
        .into_iter()
        .filter_map(|a| a.and_then(QueryValue::as_int))
        .fold(None, |acc, n| Some(acc.unwrap_or(0) + n))
}

/// Largest numeric answer. `None` when nobody had an opinion.
pub fn max(answers: impl IntoIterator<Item = Option<QueryValue>>) -> Option<i32> {
    answers
        .into_iter()
        .filter_map(|a| a.and_then(QueryValue::as_int))
        .max()
}

/// `true` unless somebody vetoed.
pub fn all(answers: impl IntoIterator<Item = Option<QueryValue>>) -> bool {
    answers
        .into_iter()
        .filter_map(|a| a.and_then(QueryValue::as_bool))
        .all(|b| b)
}

/// `true` if somebody agreed.
pub fn any(answers: impl IntoIterator<Item = Option<QueryValue>>) -> bool {
    answers
        .into_iter()
        .filter_map(|a| a.and_then(QueryValue::as_bool))
        .any(|b| b)
}

/// Add two optional numbers. Only two missing values stay missing.
///
/// ```
/// use villainous::effects::add_optional;
///
/// assert_eq!(add_optional(Some(2), None), Some(2));
/// assert_eq!(add_optional(Some(2), Some(-3)), Some(-1));
/// assert_eq!(add_optional(None, None), None);
/// ```
#[must_use]
pub fn add_optional(a: Option<i32>, b: Option<i32>) -> Option<i32> {
    match (a, b) {
        (None, None) => None,
        _ => Some(a.unwrap_or(0) + b.unwrap_or(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use QueryValue::{Bool, Int};

    fn none() -> Vec<Option<QueryValue>> {
        Vec::new()
    }

    #[test]
    fn test_sum_ignores_no_opinion() {
        assert_eq!(sum([Some(Int(2)), None, Some(Int(3))]), Some(5));
        assert_eq!(sum([None, None]), None);
        assert_eq!(sum(none()), None);
        assert_eq!(sum([Some(Int(0))]), Some(0));
    }

    #[test]
    fn test_all_is_a_veto() {
        assert!(!all([Some(Bool(true)), Some(Bool(false))]));
        assert!(all([Some(Bool(true)), None]));
        assert!(all(none()));
    }

    #[test]
    fn test_any() {
        assert!(any([Some(Bool(false)), Some(Bool(true))]));
        assert!(!any([None, Some(Bool(false))]));
        assert!(!any(none()));
    }

    #[test]
    fn test_max() {
        assert_eq!(max([Some(Int(2)), Some(Int(1)), None]), Some(2));
        assert_eq!(max(none()), None);
    }

    #[test]
    fn test_query_kind() {
        assert_eq!(
            Query::CostBonus {
                card: EntityId::new(1),
                location: None
            }
            .kind(),
            QueryKind::CostBonus
        );
    }

    #[test]
    fn test_notification_kind() {
        let event = Notification::HeroVanquished {
            hero: EntityId::new(3),
            strength: 4,
            location: 1,
        };
        assert_eq!(event.kind(), NotificationKind::HeroVanquished);
    }
}
