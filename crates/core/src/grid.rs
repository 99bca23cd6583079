//! Grid module - bounded cell storage for tiles
//!
//! The grid is a `width x height` array where each cell is empty or holds one
//! tile. Uses a flat vector for cache locality, row-major from the bottom row:
//! `index = y * width + x`, with `y = 0` at the bottom.
//!
//! Every mutation (put, remove, swap, move) updates the moved tile's recorded
//! position in the same call and refuses to act on a tile whose recorded
//! position disagrees with its cell. Nothing else in the crate writes tile
//! positions.

use tracing::trace;

use crate::error::EngineError;
use crate::tile::{Tile, TileId, TileType};
use crate::types::Pos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u8, height: u8) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![None; len],
        }
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as u8 >= self.width || pos.y as u8 >= self.height {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    fn index_or_err(&self, pos: Pos) -> Result<usize, EngineError> {
        self.index(pos).ok_or(EngineError::OutOfBounds(pos))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn check_bounds(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// In bounds and holding no tile
    pub fn is_empty(&self, pos: Pos) -> bool {
        matches!(self.index(pos).map(|i| &self.cells[i]), Some(None))
    }

    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    /// Mutable access for idle/type/power changes; the position stays grid-owned
    pub(crate) fn get_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        self.index(pos).and_then(|i| self.cells[i].as_mut())
    }

    pub fn tile_type_at(&self, pos: Pos) -> Option<TileType> {
        self.get(pos).map(Tile::tile_type)
    }

    /// Place a tile into an empty cell and record the position on the tile
    pub fn put(&mut self, mut tile: Tile, pos: Pos) -> Result<(), EngineError> {
        let idx = self.index_or_err(pos)?;
        if self.cells[idx].is_some() {
            return Err(EngineError::Occupied(pos));
        }
        tile.set_pos(pos);
        self.cells[idx] = Some(tile);
        Ok(())
    }

    /// Take the tile out of a cell
    pub fn remove(&mut self, pos: Pos) -> Result<Tile, EngineError> {
        let idx = self.index_or_err(pos)?;
        self.check_cell(idx, pos)?;
        self.cells[idx].take().ok_or(EngineError::Empty(pos))
    }

    /// Exchange the contents of two cells (either may be empty)
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), EngineError> {
        let ia = self.index_or_err(a)?;
        let ib = self.index_or_err(b)?;
        self.check_cell(ia, a)?;
        self.check_cell(ib, b)?;
        self.cells.swap(ia, ib);
        if let Some(t) = self.cells[ia].as_mut() {
            t.set_pos(a);
        }
        if let Some(t) = self.cells[ib].as_mut() {
            t.set_pos(b);
        }
        trace!(%a, %b, "grid swap");
        Ok(())
    }

    /// Move a tile into an empty cell
    pub fn move_to(&mut self, from: Pos, to: Pos) -> Result<(), EngineError> {
        let ifrom = self.index_or_err(from)?;
        let ito = self.index_or_err(to)?;
        self.check_cell(ifrom, from)?;
        if self.cells[ito].is_some() {
            return Err(EngineError::Occupied(to));
        }
        let mut tile = self.cells[ifrom].take().ok_or(EngineError::Empty(from))?;
        tile.set_pos(to);
        self.cells[ito] = Some(tile);
        Ok(())
    }

    /// Fails fast if the tile stored at `idx` records a different position
    fn check_cell(&self, idx: usize, pos: Pos) -> Result<(), EngineError> {
        match &self.cells[idx] {
            Some(t) if t.pos() != pos => Err(EngineError::Desync {
                cell: pos,
                tile: t.id(),
                recorded: t.pos(),
            }),
            _ => Ok(()),
        }
    }

    /// Check every cell against the position its tile records
    pub fn verify(&self) -> Result<(), EngineError> {
        for pos in self.positions() {
            if let Some(idx) = self.index(pos) {
                self.check_cell(idx, pos)?;
            }
        }
        Ok(())
    }

    /// All positions, bottom row first, left to right
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width as i8, self.height as i8);
        (0..h).flat_map(move |y| (0..w).map(move |x| Pos::new(x, y)))
    }

    /// Occupied cells in `positions()` order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().filter_map(Option::as_ref)
    }

    pub fn occupied(&self) -> usize {
        self.tiles().count()
    }

    /// Where a tile currently sits
    pub fn find(&self, id: TileId) -> Option<Pos> {
        self.tiles().find(|t| t.id() == id).map(Tile::pos)
    }

    /// Take every tile out, leaving the grid empty
    pub fn drain(&mut self) -> Vec<Tile> {
        self.cells.iter_mut().filter_map(Option::take).collect()
    }
}
