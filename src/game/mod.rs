//! Pure gameplay logic: tile generation, drag/match resolution, scoring and
//! the session state machine. Nothing in this module touches the browser;
//! every time-dependent operation takes an explicit `now_ms` so the logic is
//! testable under plain `cargo test`. The `dom` module adapts pointer/touch
//! events and timer intervals onto these calls.

mod geometry;
mod rng;
mod session;
mod tile;

pub use geometry::{BoardBounds, Point};
pub use rng::Prng;
pub use session::{format_elapsed, GameEvent, GameSession, Phase};
pub use tile::{find_match, generate_tiles, nearby_candidates, shuffle, Tile, TileId};

// --- Difficulty & tuning ------------------------------------------------------

/// Difficulty levels; each maps to a pair count and a time-bonus base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Number of tile pairs spawned at this level.
    pub fn pairs(self) -> usize {
        match self {
            Self::Easy => 6,
            Self::Medium => 8,
            Self::Hard => 12,
        }
    }

    /// Base time bonus; decays by 1 per 10 elapsed seconds when scoring a match.
    pub fn time_bonus(self) -> u32 {
        match self {
            Self::Easy => 10,
            Self::Medium => 15,
            Self::Hard => 20,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Parse a difficulty-select value. Unknown values fall through to `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Scoring and match tuning shared by every difficulty.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    /// Max distance (px) between tile origins for a release to count as a pairing.
    pub match_distance: f64,
    pub points_per_match: u32,
    pub time_bonus_multiplier: u32,
    /// Completion bonus window (s); finishing later than this yields no bonus.
    pub final_bonus_window_secs: f64,
    /// Completion bonus points per unused second of the window.
    pub final_bonus_per_sec: f64,
    /// Tiles are placed at least this far (px) from the board edge.
    pub edge_inset: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            match_distance: 60.0,
            points_per_match: 100,
            time_bonus_multiplier: 2,
            final_bonus_window_secs: 300.0,
            final_bonus_per_sec: 5.0,
            edge_inset: 20.0,
        }
    }
}
