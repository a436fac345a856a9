//! Table configuration.
//!
//! `GameConfig` carries the numbers a table is created with: hand limit,
//! starting power by seat, how many fate cards a Fate action reveals, player
//! bounds and an optional RNG seed. Defaults follow the board game rules; a
//! server can load overrides from JSON.
//!
//! ```
//! use villainous::core::GameConfig;
//!
//! let config = GameConfig::default().with_seed(7).with_hand_limit(5);
//! assert_eq!(config.hand_limit, 5);
//! assert_eq!(config.starting_power_for(0), 0);
//! assert_eq!(config.starting_power_for(3), 2);
//! assert_eq!(config.starting_power_for(5), 3);
//! ```

use serde::{Deserialize, Serialize};

/// Table configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cards a player draws back up to at the end of each turn.
    pub hand_limit: usize,

    /// Fate cards revealed by a Fate action.
    pub fate_draw_count: usize,

    /// Starting power per seat. Seats past the end use the last entry.
    pub starting_power: Vec<i32>,

    /// Players needed before the table may start.
    pub min_players: usize,

    /// Seats at the table.
    pub max_players: usize,

    /// Start as soon as every seated player has chosen a villain.
    pub auto_start: bool,

    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_limit: 4,
            fate_draw_count: 2,
            starting_power: vec![0, 1, 2, 2, 3],
            min_players: 2,
            max_players: 6,
            auto_start: true,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hand limit (builder pattern).
    #[must_use]
    pub fn with_hand_limit(mut self, hand_limit: usize) -> Self {
        self.hand_limit = hand_limit;
        self
    }

    /// Set the number of fate cards revealed per Fate action (builder pattern).
    #[must_use]
    pub fn with_fate_draw_count(mut self, count: usize) -> Self {
        self.fate_draw_count = count;
        self
    }

    /// Set the player bounds (builder pattern).
    #[must_use]
    pub fn with_players(mut self, min: usize, max: usize) -> Self {
        self.min_players = min;
        self.max_players = max;
        self
    }

    /// Enable or disable auto start (builder pattern).
    #[must_use]
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Fix the RNG seed (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Starting power for the player in the given seat.
    #[must_use]
    pub fn starting_power_for(&self, seat: usize) -> i32 {
        self.starting_power
            .get(seat)
            .or_else(|| self.starting_power.last())
            .copied()
            .unwrap_or(0)
    }
}
