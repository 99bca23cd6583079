//! Supply module - where tiles come from and go back to
//!
//! The engine never constructs tiles itself. It asks a [`TileSupply`] for new
//! ones during population and refill, asks it to cycle a tile's type when a
//! spawn would form a match, to upgrade a tile into a power-up, and hands every
//! destroyed tile back.
//!
//! Two implementations ship with the crate:
//! - [`TilePool`]: capacity-bounded pool with id reuse and seeded random colors
//! - [`SequenceSupply`]: scripted colors for reproducible tests and replays

use crate::error::SupplyError;
use crate::rng::SimpleRng;
use crate::tile::{Tile, TileId};
use crate::types::PowerUp;

pub trait TileSupply {
    /// Number of distinct colors handed out
    fn kinds(&self) -> u8;

    /// A fresh idle tile with a color chosen by the supply
    fn get_random_tile(&mut self) -> Result<Tile, SupplyError>;

    /// Advance the tile's color cyclically, returning the new color
    fn next_type(&mut self, tile: &mut Tile) -> u8 {
        let next = (tile.color() + 1) % self.kinds().max(1);
        tile.set_color(next);
        next
    }

    /// Turn the tile into a power-up in place
    fn upgrade(&mut self, tile: &mut Tile, power: PowerUp) {
        tile.set_power(Some(power));
    }

    /// Take back a destroyed tile
    fn return_to_pool(&mut self, tile: Tile);
}

/// Id bookkeeping shared by the bundled supplies
#[derive(Debug, Clone, Default)]
struct IdLedger {
    capacity: usize,
    in_use: usize,
    next_id: u32,
    free: Vec<TileId>,
}

impl IdLedger {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn acquire(&mut self) -> Result<TileId, SupplyError> {
        if self.in_use >= self.capacity {
            return Err(SupplyError::Exhausted {
                capacity: self.capacity,
                in_use: self.in_use,
            });
        }
        self.in_use += 1;
        Ok(self.free.pop().unwrap_or_else(|| {
            let id = TileId(self.next_id);
            self.next_id += 1;
            id
        }))
    }

    fn release(&mut self, id: TileId) {
        self.in_use = self.in_use.saturating_sub(1);
        self.free.push(id);
    }
}

/// Capacity-bounded pool of tiles with seeded random colors
#[derive(Debug, Clone)]
pub struct TilePool {
    kinds: u8,
    ids: IdLedger,
    rng: SimpleRng,
}

impl TilePool {
    pub fn new(kinds: u8, capacity: usize, seed: u32) -> Self {
        Self {
            kinds: kinds.max(1),
            ids: IdLedger::new(capacity),
            rng: SimpleRng::new(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.ids.capacity
    }

    /// Tiles currently handed out
    pub fn in_use(&self) -> usize {
        self.ids.in_use
    }

    /// Force a tile's color, for scripted setups
    pub fn change_type(&mut self, tile: &mut Tile, color: u8) {
        tile.set_color(color % self.kinds);
    }
}

impl TileSupply for TilePool {
    fn kinds(&self) -> u8 {
        self.kinds
    }

    fn get_random_tile(&mut self) -> Result<Tile, SupplyError> {
        let id = self.ids.acquire()?;
        let color = self.rng.next_range(self.kinds as u32) as u8;
        Ok(Tile::new(id, color))
    }

    fn return_to_pool(&mut self, mut tile: Tile) {
        tile.set_power(None);
        tile.set_idle(true);
        self.ids.release(tile.id());
    }
}

/// Supply that hands out colors from a fixed, repeating script
#[derive(Debug, Clone)]
pub struct SequenceSupply {
    kinds: u8,
    colors: Vec<u8>,
    cursor: usize,
    ids: IdLedger,
}

impl SequenceSupply {
    /// Unbounded supply cycling through `colors`
    pub fn new(kinds: u8, colors: &[u8]) -> Self {
        Self::with_capacity(kinds, colors, usize::MAX)
    }

    pub fn with_capacity(kinds: u8, colors: &[u8], capacity: usize) -> Self {
        Self {
            kinds: kinds.max(1),
            colors: colors.to_vec(),
            cursor: 0,
            ids: IdLedger::new(capacity.min(1 << 16)),
        }
    }

    pub fn in_use(&self) -> usize {
        self.ids.in_use
    }
}

impl TileSupply for SequenceSupply {
    fn kinds(&self) -> u8 {
        self.kinds
    }

    fn get_random_tile(&mut self) -> Result<Tile, SupplyError> {
        let id = self.ids.acquire()?;
        let color = match self.colors.len() {
            0 => 0,
            n => self.colors[self.cursor % n] % self.kinds,
        };
        self.cursor = self.cursor.wrapping_add(1);
        Ok(Tile::new(id, color))
    }

    fn return_to_pool(&mut self, tile: Tile) {
        self.ids.release(tile.id());
    }
}
