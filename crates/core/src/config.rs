//! Engine configuration
//!
//! Read once at startup. Environment variables override the defaults, and
//! anything missing or unparsable silently keeps its default:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MATCH3_WIDTH` / `MATCH3_HEIGHT` | board size |
//! | `MATCH3_KINDS` | number of tile colors |
//! | `MATCH3_SEED` | RNG seed |
//! | `MATCH3_TIME_LIMIT_SECS` | level countdown, `0` for none |
//! | `MATCH3_HINT_DELAY_MS` | idle time before a hint shows |
//! | `MATCH3_REFILL_MATCHES` | `true`/`false`, whether refills may spawn matches |

use std::env;

use crate::error::EngineError;
use crate::types::{
    COMBO_BASE_WINDOW_MS, COMBO_MIN_WINDOW_MS, DEFAULT_HEIGHT, DEFAULT_KINDS, DEFAULT_WIDTH,
    HINT_DELAY_MS, MAX_CASCADE_PASSES, MAX_DIMENSION, MAX_KINDS, MIN_DIMENSION, MIN_KINDS,
    POOL_FACTOR,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    pub kinds: u8,
    pub seed: u32,
    /// Cascade refills may drop in tiles that match immediately
    pub refill_allows_matches: bool,
    pub combo_base_window_ms: u32,
    pub combo_min_window_ms: u32,
    /// Passes before refill is forced to be match-free
    pub max_cascade_passes: u32,
    pub hint_delay_ms: u32,
    /// Level countdown; `None` plays forever
    pub time_limit_ms: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            kinds: DEFAULT_KINDS,
            seed: 1,
            refill_allows_matches: true,
            combo_base_window_ms: COMBO_BASE_WINDOW_MS,
            combo_min_window_ms: COMBO_MIN_WINDOW_MS,
            max_cascade_passes: MAX_CASCADE_PASSES,
            hint_delay_ms: HINT_DELAY_MS,
            time_limit_ms: None,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let time_limit_ms = match parsed::<u32>("MATCH3_TIME_LIMIT_SECS") {
            Some(0) => None,
            Some(secs) => Some(secs.saturating_mul(1000)),
            None => defaults.time_limit_ms,
        };

        Self {
            width: parsed("MATCH3_WIDTH").unwrap_or(defaults.width),
            height: parsed("MATCH3_HEIGHT").unwrap_or(defaults.height),
            kinds: parsed("MATCH3_KINDS").unwrap_or(defaults.kinds),
            seed: parsed("MATCH3_SEED").unwrap_or(defaults.seed),
            refill_allows_matches: parsed("MATCH3_REFILL_MATCHES")
                .unwrap_or(defaults.refill_allows_matches),
            hint_delay_ms: parsed("MATCH3_HINT_DELAY_MS").unwrap_or(defaults.hint_delay_ms),
            time_limit_ms,
            ..defaults
        }
    }

    /// Board size and color count the engine can actually play
    pub fn validate(&self) -> Result<(), EngineError> {
        let dims = MIN_DIMENSION..=MAX_DIMENSION;
        if !dims.contains(&self.width) || !dims.contains(&self.height) {
            return Err(EngineError::Config(format!(
                "board {}x{} outside {}..={}",
                self.width, self.height, MIN_DIMENSION, MAX_DIMENSION
            )));
        }
        if !(MIN_KINDS..=MAX_KINDS).contains(&self.kinds) {
            return Err(EngineError::Config(format!(
                "{} kinds outside {}..={}",
                self.kinds, MIN_KINDS, MAX_KINDS
            )));
        }
        if self.combo_min_window_ms > self.combo_base_window_ms {
            return Err(EngineError::Config(
                "combo minimum window exceeds the base window".to_string(),
            ));
        }
        Ok(())
    }

    /// Worst case is every tile on the board matching at once
    pub fn pool_capacity(&self) -> usize {
        self.width as usize * self.height as usize * POOL_FACTOR
    }

    pub fn with_size(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
}
