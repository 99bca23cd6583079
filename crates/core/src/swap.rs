//! Swap handling - validate, exchange, then keep or roll back
//!
//! A swap runs in two halves so an animator can show the tiles trading places
//! before the outcome is decided:
//!
//! 1. [`Board::swap_tiles`] exchanges the tiles after [`Board::validate_swap`]
//! 2. [`Board::settle_swap`] resolves what the swap made, or swaps back
//!
//! [`Board::try_swap`] runs both halves and the cascade in one call.

use tracing::debug;

use crate::board::Board;
use crate::cascade::Cascade;
use crate::error::EngineError;
use crate::events::BoardEvent;
use crate::supply::TileSupply;
use crate::types::Pos;

/// Why a swap request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapRejection {
    OutOfBounds,
    /// Diagonal or further apart than one cell
    NotAdjacent,
    SameCell,
    EmptyCell,
    /// A tile is mid-animation
    Busy,
}

/// What a swap did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Nothing changed
    Rejected(SwapRejection),
    /// No match: the tiles were swapped back. `rescanned` counts matches the
    /// follow-up board scan still found.
    Reverted { rescanned: usize },
    Matched { matches: usize, destroyed: usize },
    /// A gem cleared every tile of `color`
    ColorClear { color: u8, destroyed: usize },
    /// Two gems cleared the whole board
    FullClear { destroyed: usize },
}

impl SwapOutcome {
    pub fn needs_cascade(&self) -> bool {
        match *self {
            SwapOutcome::Rejected(_) => false,
            SwapOutcome::Reverted { rescanned } => rescanned > 0,
            SwapOutcome::Matched { .. }
            | SwapOutcome::ColorClear { .. }
            | SwapOutcome::FullClear { .. } => true,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SwapOutcome::Rejected(_))
    }
}

impl<S: TileSupply> Board<S> {
    /// Check a swap request without touching the board
    pub fn validate_swap(&self, a: Pos, b: Pos) -> Result<(), SwapRejection> {
        let grid = self.grid();
        if !grid.check_bounds(a) || !grid.check_bounds(b) {
            return Err(SwapRejection::OutOfBounds);
        }
        if a == b {
            return Err(SwapRejection::SameCell);
        }
        if !a.is_adjacent(b) {
            return Err(SwapRejection::NotAdjacent);
        }
        let (Some(ta), Some(tb)) = (grid.get(a), grid.get(b)) else {
            return Err(SwapRejection::EmptyCell);
        };
        if !ta.is_idle() || !tb.is_idle() {
            return Err(SwapRejection::Busy);
        }
        Ok(())
    }

    /// Exchange two validated cells and record the swap
    pub fn swap_tiles(&mut self, a: Pos, b: Pos) -> Result<(), EngineError> {
        self.grid_mut().swap(a, b)?;
        self.push_event(BoardEvent::Swapped { a, b });
        Ok(())
    }

    /// Decide a swap that [`Board::swap_tiles`] already made
    ///
    /// `a` and `b` are the cells as passed to `swap_tiles`. Does not run the
    /// cascade; check [`SwapOutcome::needs_cascade`].
    pub fn settle_swap(&mut self, a: Pos, b: Pos) -> Result<SwapOutcome, EngineError> {
        let (gem_a, gem_b, color_a, color_b) = {
            let grid = self.grid();
            let (Some(ta), Some(tb)) = (grid.get(a), grid.get(b)) else {
                return Err(EngineError::Empty(if grid.is_empty(a) { a } else { b }));
            };
            (ta.is_gem(), tb.is_gem(), ta.color(), tb.color())
        };

        let outcome = match (gem_a, gem_b) {
            (true, true) => SwapOutcome::FullClear {
                destroyed: self.match_everything()?,
            },
            (true, false) => SwapOutcome::ColorClear {
                color: color_b,
                destroyed: self.match_color(a, color_b)?,
            },
            (false, true) => SwapOutcome::ColorClear {
                color: color_a,
                destroyed: self.match_color(b, color_a)?,
            },
            (false, false) => self.settle_plain(a, b)?,
        };
        debug!(%a, %b, ?outcome, "swap settled");
        Ok(outcome)
    }

    fn settle_plain(&mut self, a: Pos, b: Pos) -> Result<SwapOutcome, EngineError> {
        // Both matches are found before either is resolved.
        let found = [self.find_match(a), self.find_match(b)];
        if found.iter().all(Option::is_none) {
            self.swap_tiles(a, b)?;
            let rescanned = self.rescan()?;
            return Ok(SwapOutcome::Reverted { rescanned });
        }

        let mut matches = 0;
        let mut destroyed = 0;
        for m in found.into_iter().flatten() {
            matches += 1;
            destroyed += self.resolve_match(m, None)?;
        }
        Ok(SwapOutcome::Matched { matches, destroyed })
    }

    /// Validate, swap, settle and cascade in one synchronous call
    pub fn try_swap(&mut self, a: Pos, b: Pos) -> Result<SwapOutcome, EngineError> {
        if let Err(reason) = self.validate_swap(a, b) {
            return Ok(SwapOutcome::Rejected(reason));
        }
        self.swap_tiles(a, b)?;
        let outcome = self.settle_swap(a, b)?;
        if outcome.needs_cascade() {
            Cascade::new(self.config().max_cascade_passes).run(self)?;
        }
        Ok(outcome)
    }
}
