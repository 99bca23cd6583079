//! Tile module - the atomic matchable piece
//!
//! A tile keeps its own grid position. Only [`crate::grid::Grid`] writes that
//! field, so the cell that holds a tile and the position the tile records can
//! never drift apart without the grid noticing.

use std::fmt;

use crate::types::{Pos, PowerUp};

/// Stable identity of a tile while it is out of the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a tile matches against
///
/// Gems are `Wild`: they never join a color run, they are only resolved by a
/// swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileType {
    Color(u8),
    Wild,
}

impl TileType {
    /// Two types extend the same run
    pub fn matches(self, other: TileType) -> bool {
        matches!((self, other), (TileType::Color(a), TileType::Color(b)) if a == b)
    }

    pub fn color(self) -> Option<u8> {
        match self {
            TileType::Color(c) => Some(c),
            TileType::Wild => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    color: u8,
    power: Option<PowerUp>,
    idle: bool,
    pos: Pos,
}

impl Tile {
    /// A fresh idle tile that has not been placed yet
    pub fn new(id: TileId, color: u8) -> Self {
        Self {
            id,
            color,
            power: None,
            idle: true,
            pos: Pos::default(),
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    /// Raw color class; for gems this is the color they were formed from
    pub fn color(&self) -> u8 {
        self.color
    }

    pub fn power(&self) -> Option<PowerUp> {
        self.power
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn is_gem(&self) -> bool {
        self.power == Some(PowerUp::Gem)
    }

    pub fn tile_type(&self) -> TileType {
        if self.is_gem() {
            TileType::Wild
        } else {
            TileType::Color(self.color)
        }
    }

    pub fn set_color(&mut self, color: u8) {
        self.color = color;
    }

    pub fn set_power(&mut self, power: Option<PowerUp>) {
        self.power = power;
    }

    pub fn set_idle(&mut self, idle: bool) {
        self.idle = idle;
    }

    pub(crate) fn set_pos(&mut self, pos: Pos) {
        self.pos = pos;
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.power {
            Some(p) => write!(f, "{} {} c{} at {}", self.id, p.as_str(), self.color, self.pos),
            None => write!(f, "{} c{} at {}", self.id, self.color, self.pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gem_is_wild_and_never_matches() {
        let mut t = Tile::new(TileId(1), 3);
        assert_eq!(t.tile_type(), TileType::Color(3));

        t.set_power(Some(PowerUp::Gem));
        assert!(t.is_gem());
        assert_eq!(t.tile_type(), TileType::Wild);
        assert!(!TileType::Wild.matches(TileType::Wild));
        assert!(!TileType::Wild.matches(TileType::Color(3)));
        // The original color is kept for display.
        assert_eq!(t.color(), 3);
    }

    #[test]
    fn test_other_power_ups_keep_their_color_type() {
        let mut t = Tile::new(TileId(2), 1);
        t.set_power(Some(PowerUp::Cross));
        assert!(t.tile_type().matches(TileType::Color(1)));
        assert!(!t.tile_type().matches(TileType::Color(2)));
    }
}
