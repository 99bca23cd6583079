//! Power-up rules - what a match forms and what a power-up destroys
//!
//! Formation (checked in this order, for matches not produced by a power-up):
//!
//! | Match | Power-up |
//! |-------|----------|
//! | runs on both axes (T, L, plus) | [`PowerUp::Cross`] |
//! | 5 or more tiles | [`PowerUp::Gem`] |
//! | exactly 4 tiles | [`PowerUp::AreaBlast`] |
//!
//! Activation areas only take idle tiles and never include the power-up's own
//! cell. Gems have no area: they only act through a swap.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::matcher::{Match, Orientation};
use crate::types::{Pos, PowerUp};

/// The 8 cells around a tile
const NEIGHBOUR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Power-up a freshly found match earns, if any
pub fn formation(m: &Match) -> Option<PowerUp> {
    if m.orientation() == Some(Orientation::Both) {
        Some(PowerUp::Cross)
    } else if m.count() >= 5 {
        Some(PowerUp::Gem)
    } else if m.count() == 4 {
        Some(PowerUp::AreaBlast)
    } else {
        None
    }
}

/// In-bounds cells around `pos`, bottom row first
pub fn neighbours(grid: &Grid, pos: Pos) -> ArrayVec<Pos, 8> {
    NEIGHBOUR_OFFSETS
        .iter()
        .map(|&(dx, dy)| pos.offset(dx, dy))
        .filter(|&p| grid.check_bounds(p))
        .collect()
}

/// Tiles destroyed when the power-up at `pos` goes off
pub fn activation_area(grid: &Grid, pos: Pos, power: PowerUp) -> Match {
    let mut area = Match::new();
    let mut take = |p: Pos| {
        if let Some(t) = grid.get(p).filter(|t| t.is_idle()) {
            area.push(t);
        }
    };

    match power {
        PowerUp::AreaBlast => neighbours(grid, pos).into_iter().for_each(&mut take),
        PowerUp::Cross => {
            for x in 0..grid.width() as i8 {
                if x != pos.x {
                    take(Pos::new(x, pos.y));
                }
            }
            for y in 0..grid.height() as i8 {
                if y != pos.y {
                    take(Pos::new(pos.x, y));
                }
            }
        }
        PowerUp::Gem => {}
    }
    area
}
