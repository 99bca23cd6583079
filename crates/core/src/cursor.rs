//! Cursor - keyboard focus and the two-step selection that produces swaps
//!
//! The first select remembers a tile, the second one asks for a swap with it.
//! The second select always clears the selection, whether or not it produced
//! a request, so selecting the same tile twice deselects it.

use crate::grid::Grid;
use crate::types::{Direction, Pos};

/// Two cells the player asked to swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapRequest {
    pub first: Pos,
    pub second: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    focus: Pos,
    selected: Option<Pos>,
    enabled: bool,
    width: u8,
    height: u8,
}

impl Cursor {
    /// Cursor focused on the middle of the board
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            focus: Pos::new((width / 2) as i8, (height / 2) as i8),
            selected: None,
            enabled: true,
            width,
            height,
        }
    }

    pub fn focus(&self) -> Pos {
        self.focus
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Input is ignored while disabled; disabling drops the selection
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.selected = None;
        }
    }

    /// Move focus one cell, staying on the board
    pub fn move_by(&mut self, dir: Direction) {
        let next = self.focus.step(dir);
        if next.x >= 0 && next.y >= 0 && (next.x as u8) < self.width && (next.y as u8) < self.height {
            self.focus = next;
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Remember an idle tile as the first half of a swap
    pub fn select_first(&mut self, grid: &Grid, pos: Pos) -> bool {
        if !self.enabled || !grid.get(pos).is_some_and(|t| t.is_idle()) {
            return false;
        }
        self.selected = Some(pos);
        true
    }

    /// Pair `pos` with the remembered tile
    ///
    /// Yields a request only when both tiles are idle, distinct and
    /// 4-adjacent.
    pub fn select_second(&mut self, grid: &Grid, pos: Pos) -> Option<SwapRequest> {
        let first = self.selected.take()?;
        if !self.enabled || first == pos || !first.is_adjacent(pos) {
            return None;
        }
        let idle = |p: Pos| grid.get(p).is_some_and(|t| t.is_idle());
        if !idle(first) || !idle(pos) {
            return None;
        }
        Some(SwapRequest { first, second: pos })
    }

    /// Select at the focus: first or second half depending on state
    pub fn select_focused(&mut self, grid: &Grid) -> Option<SwapRequest> {
        if self.selected.is_some() {
            self.select_second(grid, self.focus)
        } else {
            self.select_first(grid, self.focus);
            None
        }
    }
}
