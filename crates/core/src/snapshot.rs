//! Snapshot module - a render-only copy of the game
//!
//! The term view and the session animator read this instead of the board.

use crate::tile::Tile;
use crate::types::{Pos, PowerUp};

/// What the view needs to draw one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileView {
    pub color: u8,
    pub power: Option<PowerUp>,
    /// False while the tile is mid-animation
    pub idle: bool,
}

impl From<&Tile> for TileView {
    fn from(tile: &Tile) -> Self {
        Self {
            color: tile.color(),
            power: tile.power(),
            idle: tile.is_idle(),
        }
    }
}

/// Read-only copy of a game for rendering
///
/// Cells are row-major from the bottom row, like the grid. Reuse one value
/// with `Game::snapshot_into` to keep the cell buffer between frames.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<Option<TileView>>,
    pub score: u64,
    pub multiplier: u32,
    pub combo_window_ms: u32,
    pub combo_elapsed_ms: u32,
    pub cursor: Pos,
    pub selected: Option<Pos>,
    pub hint: Option<(Pos, Pos)>,
    pub time_left_ms: Option<u32>,
    pub input_enabled: bool,
    pub paused: bool,
    pub game_over: bool,
    pub episode_id: u32,
}

impl GameSnapshot {
    pub fn cell(&self, pos: Pos) -> Option<TileView> {
        if pos.x < 0 || pos.y < 0 || pos.x as u8 >= self.width || pos.y as u8 >= self.height {
            return None;
        }
        let idx = pos.y as usize * self.width as usize + pos.x as usize;
        self.cells.get(idx).copied().flatten()
    }

    /// Part of the combo window still left, in `0.0..=1.0`
    pub fn combo_fraction(&self) -> f32 {
        if self.multiplier == 0 || self.combo_window_ms == 0 {
            return 0.0;
        }
        let left = self.combo_window_ms.saturating_sub(self.combo_elapsed_ms);
        left as f32 / self.combo_window_ms as f32
    }
}
