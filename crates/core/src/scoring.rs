//! Scoring module - per-match points and the decaying combo multiplier
//!
//! Every score event bumps the multiplier first, then adds
//! `points x multiplier`. The multiplier survives only as long as score events
//! keep arriving inside the decay window, and the window shrinks as the
//! multiplier grows:
//!
//! ```text
//! window_ms = max(base_ms - ln(multiplier) / 2 * 1000, min_ms)
//! ```
//!
//! A match that destroys `n` tiles is worth `n²` base points.

use crate::config::EngineConfig;
use crate::types::{COMBO_BASE_WINDOW_MS, COMBO_MIN_WINDOW_MS};

/// Base points for destroying `count` tiles at once
pub fn match_points(count: usize) -> u64 {
    let n = count as u64;
    n.saturating_mul(n)
}

/// Decay window for a given multiplier
///
/// # Examples
///
/// ```
/// use tui_match3_core::scoring::decay_window_ms;
///
/// assert_eq!(decay_window_ms(2000, 250, 1), 2000);
/// assert_eq!(decay_window_ms(2000, 250, 2), 1653);
/// assert_eq!(decay_window_ms(2000, 250, 1_000_000), 250);
/// ```
pub fn decay_window_ms(base_ms: u32, min_ms: u32, multiplier: u32) -> u32 {
    if multiplier <= 1 {
        return base_ms.max(min_ms);
    }
    let shrink = (multiplier as f64).ln() / 2.0 * 1000.0;
    let window = (base_ms as f64 - shrink).max(min_ms as f64);
    window as u32
}

/// Running score and combo state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEngine {
    score: u64,
    multiplier: u32,
    elapsed_ms: u32,
    decaying: bool,
    base_window_ms: u32,
    min_window_ms: u32,
}

impl ScoreEngine {
    pub fn new(base_window_ms: u32, min_window_ms: u32) -> Self {
        Self {
            score: 0,
            multiplier: 0,
            elapsed_ms: 0,
            decaying: false,
            base_window_ms,
            min_window_ms,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.combo_base_window_ms, config.combo_min_window_ms)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Time spent in the current decay window
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn is_decaying(&self) -> bool {
        self.decaying
    }

    /// Current decay window
    pub fn window_ms(&self) -> u32 {
        decay_window_ms(self.base_window_ms, self.min_window_ms, self.multiplier)
    }

    /// Record a score event; returns the points actually added
    pub fn add_score(&mut self, base_points: u64) -> u64 {
        self.multiplier = self.multiplier.saturating_add(1);
        let points = base_points.saturating_mul(self.multiplier as u64);
        self.score = self.score.saturating_add(points);
        // A new event restarts the timer with the new, shorter window.
        self.elapsed_ms = 0;
        self.decaying = true;
        points
    }

    /// Advance the decay timer; returns true when the multiplier just reset
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.decaying {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms < self.window_ms() {
            return false;
        }
        self.multiplier = 0;
        self.elapsed_ms = 0;
        self.decaying = false;
        true
    }

    /// Hard reset: score, multiplier and timer back to zero
    pub fn reset(&mut self) {
        self.score = 0;
        self.multiplier = 0;
        self.elapsed_ms = 0;
        self.decaying = false;
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(COMBO_BASE_WINDOW_MS, COMBO_MIN_WINDOW_MS)
    }
}
