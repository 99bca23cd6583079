//! Error types for the engine.
//!
//! Gameplay rejections (bad swaps, busy tiles) are not errors; see
//! [`crate::swap::SwapRejection`]. What ends up here is either a supply failure
//! the caller has to handle or a broken grid invariant that must stop the game.

use thiserror::Error;

use crate::tile::TileId;
use crate::types::Pos;

/// Failure to hand out a tile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupplyError {
    #[error("tile pool exhausted ({in_use} of {capacity} tiles in use)")]
    Exhausted { capacity: usize, in_use: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("position {0} is outside the grid")]
    OutOfBounds(Pos),

    #[error("cell {0} is already occupied")]
    Occupied(Pos),

    #[error("cell {0} is empty")]
    Empty(Pos),

    /// The cell and the tile it holds disagree about where the tile is.
    #[error("grid desync: cell {cell} holds tile {tile} which records position {recorded}")]
    Desync {
        cell: Pos,
        tile: TileId,
        recorded: Pos,
    },

    #[error(transparent)]
    Supply(#[from] SupplyError),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("invalid layout: {0}")]
    Layout(String),
}

impl EngineError {
    /// True for errors that mean the board can no longer be trusted
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, EngineError::Desync { .. })
    }
}
