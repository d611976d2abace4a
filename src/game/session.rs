//! Session state machine, scoring and the event stream the presentation
//! layer consumes.

use super::geometry::{BoardBounds, Point};
use super::rng::Prng;
use super::tile::{find_match, generate_tiles, nearby_candidates, Tile, TileId};
use super::{Difficulty, GameConfig};

// --- Phases & events ----------------------------------------------------------

/// Session lifecycle: NotStarted → Playing ⇄ Paused → Ended. Ended returns to
/// Playing only through an explicit reset + start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Playing,
    Paused,
    Ended,
}

/// Notifications emitted by session transitions. The DOM adapter subscribes
/// to these for animation, popups, sound and HUD updates; the core never
/// calls into presentation directly.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Started {
        difficulty: Difficulty,
        total_pairs: usize,
    },
    MatchFound {
        a: TileId,
        b: TileId,
        points: u32,
        score: u32,
        matched_pairs: usize,
        remaining: usize,
    },
    Completed {
        final_bonus: u32,
        score: u32,
        elapsed_secs: u64,
    },
    TimerTick {
        elapsed_secs: u64,
    },
    PauseToggled {
        paused: bool,
    },
    Reset,
}

/// Format whole elapsed seconds as `minutes:seconds`, seconds zero-padded.
pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

// --- Session ------------------------------------------------------------------

/// One play-through: owns the tiles, the score/timer bookkeeping and the
/// active drag. All clock reads are injected as `now_ms` (board-agnostic
/// milliseconds, e.g. `performance.now()`), so scoring is testable without a
/// wall clock.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    bounds: BoardBounds,
    difficulty: Difficulty,
    tiles: Vec<Tile>,
    total_pairs: usize,
    matched_pairs: usize,
    score: u32,
    start_ms: f64,
    phase: Phase,
    dragging: Option<TileId>,
}

impl GameSession {
    pub fn new(config: GameConfig, bounds: BoardBounds) -> Self {
        Self {
            config,
            bounds,
            difficulty: Difficulty::Medium,
            tiles: Vec::new(),
            total_pairs: 0,
            matched_pairs: 0,
            score: 0,
            start_ms: 0.0,
            phase: Phase::NotStarted,
            dragging: None,
        }
    }

    // --- Accessors ---

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn remaining_pairs(&self) -> usize {
        self.total_pairs - self.matched_pairs
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn dragging(&self) -> Option<TileId> {
        self.dragging
    }

    pub fn bounds(&self) -> BoardBounds {
        self.bounds
    }

    /// Wall-clock seconds since session start.
    pub fn elapsed_secs(&self, now_ms: f64) -> f64 {
        ((now_ms - self.start_ms) / 1000.0).max(0.0)
    }

    // --- Lifecycle ---

    /// Start a fresh board with factory-generated tiles. A no-op while the
    /// session is Playing or Paused; restart is the explicit path to a new
    /// board mid-game.
    pub fn start(
        &mut self,
        difficulty: Difficulty,
        roster_len: usize,
        now_ms: f64,
        rng: &mut Prng,
    ) -> Vec<GameEvent> {
        if matches!(self.phase, Phase::Playing | Phase::Paused) {
            return Vec::new();
        }
        let tiles = generate_tiles(
            difficulty.pairs(),
            roster_len,
            self.bounds,
            self.config.edge_inset,
            rng,
        );
        self.start_with_board(difficulty, tiles, now_ms)
    }

    /// Start with a caller-provided board layout. `total_pairs` derives from
    /// the tile set, which must hold exactly two tiles per group.
    pub fn start_with_board(
        &mut self,
        difficulty: Difficulty,
        tiles: Vec<Tile>,
        now_ms: f64,
    ) -> Vec<GameEvent> {
        if matches!(self.phase, Phase::Playing | Phase::Paused) {
            return Vec::new();
        }
        let mut events = Vec::new();
        if self.phase == Phase::Ended {
            // Ended re-enters Playing only through NotStarted.
            events.extend(self.reset());
        }
        debug_assert!(tiles.len() % 2 == 0);
        self.difficulty = difficulty;
        self.total_pairs = tiles.len() / 2;
        self.tiles = tiles;
        self.matched_pairs = 0;
        self.score = 0;
        self.start_ms = now_ms;
        self.phase = Phase::Playing;
        self.dragging = None;
        events.push(GameEvent::Started {
            difficulty,
            total_pairs: self.total_pairs,
        });
        events
    }

    /// Return to NotStarted, clearing the board, score and match count.
    /// Idempotent; safe in any phase.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.tiles.clear();
        self.total_pairs = 0;
        self.matched_pairs = 0;
        self.score = 0;
        self.start_ms = 0.0;
        self.phase = Phase::NotStarted;
        self.dragging = None;
        vec![GameEvent::Reset]
    }

    /// Playing ⇄ Paused. Ignored in any other phase.
    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        match self.phase {
            Phase::Playing => self.phase = Phase::Paused,
            Phase::Paused => self.phase = Phase::Playing,
            _ => return None,
        }
        Some(GameEvent::PauseToggled {
            paused: self.phase == Phase::Paused,
        })
    }

    // --- Drag controller ---

    /// Idle → Dragging for `id`. Only while Playing, only for an unmatched
    /// tile, and only when no other drag is active.
    pub fn begin_drag(&mut self, id: TileId) -> bool {
        if self.phase != Phase::Playing || self.dragging.is_some() {
            return false;
        }
        match self.tile(id) {
            Some(t) if !t.matched => {
                self.dragging = Some(id);
                true
            }
            _ => false,
        }
    }

    /// Move the dragged tile to `pos` (clamped to the board). Returns the
    /// same-group unmatched tiles now within match range, for highlighting.
    pub fn drag_to(&mut self, pos: Point) -> Vec<TileId> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        let Some(id) = self.dragging else {
            return Vec::new();
        };
        let clamped = self.bounds.clamp(pos);
        if let Some(t) = self.tiles.iter_mut().find(|t| t.id == id) {
            t.pos = clamped;
        }
        nearby_candidates(&self.tiles, id, clamped, self.config.match_distance)
    }

    /// Dragging → Idle. While Playing, the release position is evaluated for
    /// a match; in any other phase the drag is simply dropped.
    pub fn end_drag(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let Some(id) = self.dragging.take() else {
            return Vec::new();
        };
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        let Some(pos) = self.tile(id).map(|t| t.pos) else {
            return Vec::new();
        };
        match find_match(&self.tiles, id, pos, self.config.match_distance) {
            Some(partner) => self.award_match(id, partner, now_ms),
            None => Vec::new(),
        }
    }

    // --- Timer ---

    /// Periodic tick; yields a display event only while Playing (not Paused,
    /// not Ended). The caller owns the tick cadence.
    pub fn tick(&self, now_ms: f64) -> Option<GameEvent> {
        if self.phase != Phase::Playing {
            return None;
        }
        Some(GameEvent::TimerTick {
            elapsed_secs: self.elapsed_secs(now_ms).floor() as u64,
        })
    }

    /// Adopt new board bounds (e.g. after a window resize) and pull every
    /// unmatched tile back inside them.
    pub fn set_bounds(&mut self, bounds: BoardBounds) {
        self.bounds = bounds;
        for t in self.tiles.iter_mut().filter(|t| !t.matched) {
            t.pos = bounds.clamp(t.pos);
        }
    }

    // --- Scoring ---

    fn match_points(&self, now_ms: f64) -> u32 {
        let elapsed = self.elapsed_secs(now_ms);
        let decay = (elapsed / 10.0).floor() as i64;
        let bonus = (self.difficulty.time_bonus() as i64 - decay).max(0) as u32;
        self.config.points_per_match + bonus * self.config.time_bonus_multiplier
    }

    fn final_bonus(&self, now_ms: f64) -> u32 {
        let elapsed = self.elapsed_secs(now_ms);
        ((self.config.final_bonus_window_secs - elapsed).max(0.0) * self.config.final_bonus_per_sec)
            .floor() as u32
    }

    fn award_match(&mut self, a: TileId, b: TileId, now_ms: f64) -> Vec<GameEvent> {
        for t in self.tiles.iter_mut().filter(|t| t.id == a || t.id == b) {
            t.matched = true;
        }
        self.matched_pairs += 1;
        let points = self.match_points(now_ms);
        self.score += points;

        let mut events = vec![GameEvent::MatchFound {
            a,
            b,
            points,
            score: self.score,
            matched_pairs: self.matched_pairs,
            remaining: self.remaining_pairs(),
        }];
        if self.matched_pairs == self.total_pairs {
            let final_bonus = self.final_bonus(now_ms);
            self.score += final_bonus;
            self.phase = Phase::Ended;
            events.push(GameEvent::Completed {
                final_bonus,
                score: self.score,
                elapsed_secs: self.elapsed_secs(now_ms).floor() as u64,
            });
        }
        events
    }
}
