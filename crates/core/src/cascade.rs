//! Cascade - collapse, refill and rescan until the board is stable
//!
//! The cascade is an explicit state machine so the async session can await
//! an animation between steps. One pass is `Collapse -> Refill -> Rescan`; a
//! pass whose rescan resolved nothing ends the cascade.
//!
//! Refills follow [`EngineConfig::refill_allows_matches`] for the first
//! `max_passes` passes and are match-free after that, which starves the chain
//! of new matches. A hard ceiling of `HARD_LIMIT_FACTOR * max_passes` passes
//! stops a cascade that still refuses to settle: the holes its last rescan
//! left are collapsed and refilled once more without a rescan, so the board
//! is always full when the cascade turns stable.
//!
//! [`EngineConfig::refill_allows_matches`]: crate::config::EngineConfig::refill_allows_matches

use tracing::{debug, warn};

use crate::board::Board;
use crate::error::EngineError;
use crate::supply::TileSupply;

const HARD_LIMIT_FACTOR: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadePhase {
    Collapse,
    Refill,
    Rescan,
    Stable,
}

/// What a single [`Cascade::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    /// Tiles moved down
    Collapsed(usize),
    /// Tiles spawned
    Refilled(usize),
    /// Matches resolved
    Rescanned(usize),
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeReport {
    pub passes: u32,
    pub matches_resolved: usize,
}

#[derive(Debug, Clone)]
pub struct Cascade {
    phase: CascadePhase,
    max_passes: u32,
    report: CascadeReport,
    finishing: bool,
}

impl Cascade {
    pub fn new(max_passes: u32) -> Self {
        Self {
            phase: CascadePhase::Collapse,
            max_passes: max_passes.max(1),
            report: CascadeReport::default(),
            finishing: false,
        }
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    pub fn is_stable(&self) -> bool {
        self.phase == CascadePhase::Stable
    }

    pub fn report(&self) -> CascadeReport {
        self.report
    }

    /// Run the next phase against the board
    pub fn step<S: TileSupply>(&mut self, board: &mut Board<S>) -> Result<CascadeStep, EngineError> {
        match self.phase {
            CascadePhase::Collapse => {
                let moved = board.collapse()?;
                self.phase = CascadePhase::Refill;
                Ok(CascadeStep::Collapsed(moved))
            }
            CascadePhase::Refill if self.finishing => {
                let spawned = board.refill(false)?;
                self.phase = CascadePhase::Stable;
                Ok(CascadeStep::Refilled(spawned))
            }
            CascadePhase::Refill => {
                let passes = self.report.passes;
                let configured = board.config().refill_allows_matches;
                if configured && passes == self.max_passes {
                    warn!(passes, "cascade still running, refilling without matches");
                }
                let spawned = board.refill(configured && passes < self.max_passes)?;
                self.phase = CascadePhase::Rescan;
                Ok(CascadeStep::Refilled(spawned))
            }
            CascadePhase::Rescan => {
                let resolved = board.rescan()?;
                self.report.passes += 1;
                self.report.matches_resolved += resolved;
                debug!(pass = self.report.passes, resolved, "cascade pass");

                self.phase = if resolved == 0 {
                    CascadePhase::Stable
                } else if self.report.passes >= self.max_passes * HARD_LIMIT_FACTOR {
                    warn!(passes = self.report.passes, "cascade stopped at pass limit");
                    self.finishing = true;
                    CascadePhase::Collapse
                } else {
                    CascadePhase::Collapse
                };
                Ok(CascadeStep::Rescanned(resolved))
            }
            CascadePhase::Stable => Ok(CascadeStep::Stable),
        }
    }

    /// Step until stable
    pub fn run<S: TileSupply>(mut self, board: &mut Board<S>) -> Result<CascadeReport, EngineError> {
        while !self.is_stable() {
            self.step(board)?;
        }
        Ok(self.report)
    }
}

impl<S: TileSupply> Board<S> {
    /// Run a full cascade with the configured pass guard
    pub fn cascade(&mut self) -> Result<CascadeReport, EngineError> {
        Cascade::new(self.config().max_cascade_passes).run(self)
    }
}
