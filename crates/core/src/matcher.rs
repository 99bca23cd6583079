//! Match finding - runs, branches and possible moves
//!
//! A match grows from a seed tile. The finder scans left then right for a
//! horizontal run, then up then down for a vertical run. A run qualifies when
//! it holds at least two tiles besides the tile it was scanned from. Every
//! tile of a qualifying run is then scanned along the perpendicular axis, and
//! qualifying branches are merged depth-first, which is how T, L and plus
//! shapes become a single match.
//!
//! Only idle tiles extend a run. Gems are [`TileType::Wild`] and never extend
//! one, not even another gem.

use crate::grid::Grid;
use crate::tile::{Tile, TileId, TileType};
use crate::types::{Axis, Direction, Pos};

/// Which axes a match spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Runs along both axes were merged (T, L or plus)
    Both,
}

impl Orientation {
    fn combine(self, other: Orientation) -> Orientation {
        if self == other {
            self
        } else {
            Orientation::Both
        }
    }
}

impl From<Axis> for Orientation {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Orientation::Horizontal,
            Axis::Vertical => Orientation::Vertical,
        }
    }
}

/// A set of tiles resolved together
///
/// Tiles are recorded as `(id, position)` at the time the match was built; the
/// board re-checks both before destroying anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Match {
    tiles: Vec<(TileId, Pos)>,
    orientation: Option<Orientation>,
    unlisted: usize,
    candidate: Option<TileId>,
}

impl Match {
    /// Empty match without orientation, used for power-up areas and clears
    pub fn new() -> Self {
        Self::default()
    }

    /// Match holding only its seed, which is also the upgrade candidate
    pub fn from_seed(seed: &Tile) -> Self {
        let mut m = Self::new();
        m.tiles.push((seed.id(), seed.pos()));
        m.candidate = Some(seed.id());
        m
    }

    /// Listed tiles plus tiles counted but owned elsewhere in the same match
    pub fn count(&self) -> usize {
        self.tiles.len() + self.unlisted
    }

    pub fn tiles(&self) -> &[(TileId, Pos)] {
        &self.tiles
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    pub fn unlisted(&self) -> usize {
        self.unlisted
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.iter().any(|(t, _)| *t == id)
    }

    /// Add a tile unless it is already listed
    pub fn push(&mut self, tile: &Tile) {
        if !self.contains(tile.id()) {
            self.tiles.push((tile.id(), tile.pos()));
        }
    }

    pub fn add_unlisted(&mut self) {
        self.unlisted += 1;
    }

    /// Add the other match's listed tiles and fold in its orientation
    pub fn merge(&mut self, other: &Match) {
        for &(id, pos) in &other.tiles {
            if !self.contains(id) {
                self.tiles.push((id, pos));
            }
        }
        self.orientation = match (self.orientation, other.orientation) {
            (Some(a), Some(b)) => Some(a.combine(b)),
            (a, b) => a.or(b),
        };
    }

    /// Tile that becomes the power-up: the seed, else the first listed tile
    pub fn candidate(&self) -> Option<(TileId, Pos)> {
        match self.candidate {
            Some(id) => self.tiles.iter().copied().find(|(t, _)| *t == id),
            None => self.tiles.first().copied(),
        }
    }

    /// Builder-style orientation tag
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }
}

/// Build the match grown from the tile at `seed`, if any
pub fn find_match(grid: &Grid, seed: Pos) -> Option<Match> {
    let tile = grid.get(seed)?;
    let ty = tile.tile_type();
    if ty == TileType::Wild {
        return None;
    }

    let mut tree = Match::from_seed(tile);
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let run = scan_axis(grid, &tree, seed, ty, axis);
        if run.count() > 1 {
            tree.merge(&run);
            branch(grid, &mut tree, &run, axis.perpendicular(), ty);
        }
    }

    if tree.count() == 1 {
        None
    } else {
        Some(tree)
    }
}

/// Scan both directions of `axis` from `from`, tallying tiles the tree owns
fn scan_axis(grid: &Grid, tree: &Match, from: Pos, ty: TileType, axis: Axis) -> Match {
    let mut run = Match::new().with_orientation(axis.into());
    for dir in axis.directions() {
        let mut pos = from.step(dir);
        while let Some(next) = grid.get(pos) {
            if !next.is_idle() || !next.tile_type().matches(ty) {
                break;
            }
            if tree.contains(next.id()) {
                run.add_unlisted();
            } else {
                run.push(next);
            }
            pos = pos.step(dir);
        }
    }
    run
}

// Recursion depth is bounded by the tile count: every qualifying branch that
// recurses has listed at least one tile the tree did not hold.
fn branch(grid: &Grid, tree: &mut Match, source: &Match, axis: Axis, ty: TileType) {
    for &(_, pos) in source.tiles() {
        let run = scan_axis(grid, tree, pos, ty, axis);
        if run.count() > 1 {
            tree.merge(&run);
            branch(grid, tree, &run, axis.perpendicular(), ty);
        }
    }
}

/// Count same-type tiles walking away from `pos` in one direction
fn count_run<F>(lookup: &F, pos: Pos, ty: TileType, dir: Direction) -> usize
where
    F: Fn(Pos) -> Option<TileType>,
{
    let mut n = 0;
    let mut p = pos.step(dir);
    while let Some(t) = lookup(p) {
        if !t.matches(ty) {
            break;
        }
        n += 1;
        p = p.step(dir);
    }
    n
}

/// Would a tile of type `ty` at `pos` complete a line of three?
///
/// `lookup` answers what occupies a cell, which lets callers ask about boards
/// that do not exist yet (a spawn before placement, a swap before it happens).
pub fn forms_line<F>(lookup: F, pos: Pos, ty: TileType) -> bool
where
    F: Fn(Pos) -> Option<TileType>,
{
    [Axis::Horizontal, Axis::Vertical].into_iter().any(|axis| {
        axis.directions()
            .into_iter()
            .map(|dir| count_run(&lookup, pos, ty, dir))
            .sum::<usize>()
            > 1
    })
}

/// The tile at `pos` sits in a line of three or more
pub fn is_part_of_match(grid: &Grid, pos: Pos) -> bool {
    match grid.tile_type_at(pos) {
        Some(ty) => forms_line(|p| grid.tile_type_at(p), pos, ty),
        None => false,
    }
}

/// Would swapping `a` and `b` resolve anything?
///
/// A gem swapped with any tile always resolves.
pub fn would_swap_match(grid: &Grid, a: Pos, b: Pos) -> bool {
    let (Some(ta), Some(tb)) = (grid.get(a), grid.get(b)) else {
        return false;
    };
    if ta.is_gem() || tb.is_gem() {
        return true;
    }
    let swapped = |p: Pos| {
        if p == a {
            grid.tile_type_at(b)
        } else if p == b {
            grid.tile_type_at(a)
        } else {
            grid.tile_type_at(p)
        }
    };
    forms_line(swapped, a, tb.tile_type()) || forms_line(swapped, b, ta.tile_type())
}

/// First swap, bottom-up and left to right, that would resolve something
pub fn find_hint(grid: &Grid) -> Option<(Pos, Pos)> {
    grid.positions().find_map(|pos| {
        [Direction::Right, Direction::Up]
            .into_iter()
            .map(|dir| pos.step(dir))
            .find(|&other| would_swap_match(grid, pos, other))
            .map(|other| (pos, other))
    })
}
