//! Board module - grid, supply and score wired together
//!
//! The board owns every mutable piece of a match-3 round and exposes the
//! primitive steps the swap and cascade logic is built from:
//!
//! - [`Board::populate`]: fill empty cells from the supply
//! - [`Board::resolve_match`]: destroy, score, form and activate power-ups
//! - [`Board::collapse`]: let tiles fall into empty cells below them
//! - [`Board::rescan`]: resolve every match currently on the board
//!
//! Each step records [`BoardEvent`]s for whoever renders the board.
//!
//! # Layouts
//!
//! Boards can be written as text for tests and demos, top row first:
//!
//! | Char | Tile |
//! |------|------|
//! | `a`-`h` | plain tile of color 0-7 |
//! | `A`-`H` | area-blast of color 0-7 |
//! | `1`-`8` | cross of color 0-7 |
//! | `*` | gem |
//! | `.` | empty cell |

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::BoardEvent;
use crate::grid::Grid;
use crate::matcher::{self, forms_line, Match};
use crate::powerup::{activation_area, formation};
use crate::scoring::{match_points, ScoreEngine};
use crate::supply::TileSupply;
use crate::tile::{Tile, TileId, TileType};
use crate::types::{Pos, PowerUp};

/// A match waiting to be resolved, and the power-up that produced it
type Pending = (Match, Option<PowerUp>);

#[derive(Debug, Clone)]
pub struct Board<S: TileSupply> {
    config: EngineConfig,
    grid: Grid,
    supply: S,
    score: ScoreEngine,
    events: Vec<BoardEvent>,
}

impl<S: TileSupply> Board<S> {
    /// Empty board sized by the config
    pub fn new(config: EngineConfig, supply: S) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(config.width, config.height),
            score: ScoreEngine::from_config(&config),
            config,
            supply,
            events: Vec::new(),
        })
    }

    /// Board built from a text layout; the layout decides the size
    pub fn from_layout(
        config: EngineConfig,
        supply: S,
        rows: &[&str],
    ) -> Result<Self, EngineError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(EngineError::Layout("rows differ in length".to_string()));
        }
        let config = config.with_size(width as u8, height as u8);
        let mut board = Self::new(config, supply)?;

        for (row, line) in rows.iter().enumerate() {
            let y = (height - 1 - row) as i8;
            for (x, ch) in line.chars().enumerate() {
                let Some((color, power)) = decode_cell(ch)? else {
                    continue;
                };
                let mut tile = board.supply.get_random_tile()?;
                tile.set_color(color);
                if let Some(power) = power {
                    board.supply.upgrade(&mut tile, power);
                }
                board.grid.put(tile, Pos::new(x as i8, y))?;
            }
        }
        Ok(board)
    }

    /// Text layout of the current grid, top row first
    pub fn to_layout(&self) -> Vec<String> {
        (0..self.grid.height() as i8)
            .rev()
            .map(|y| {
                (0..self.grid.width() as i8)
                    .map(|x| self.grid.get(Pos::new(x, y)).map_or('.', encode_tile))
                    .collect()
            })
            .collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn supply(&self) -> &S {
        &self.supply
    }

    pub fn supply_mut(&mut self) -> &mut S {
        &mut self.supply
    }

    pub fn score(&self) -> &ScoreEngine {
        &self.score
    }

    pub fn width(&self) -> u8 {
        self.grid.width()
    }

    pub fn height(&self) -> u8 {
        self.grid.height()
    }

    /// Events recorded since the last [`Board::take_events`]
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Flag tiles in the given cells as mid-animation (or done)
    pub fn set_busy<I>(&mut self, cells: I, busy: bool)
    where
        I: IntoIterator<Item = Pos>,
    {
        for pos in cells {
            if let Some(tile) = self.grid.get_mut(pos) {
                tile.set_idle(!busy);
            }
        }
    }

    /// Every tile idle
    pub fn is_settled(&self) -> bool {
        self.grid.tiles().all(Tile::is_idle)
    }

    /// Advance the combo decay timer; true when the multiplier reset
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.score.tick(elapsed_ms)
    }

    /// Fill every empty cell, bottom row first
    ///
    /// With `allow_matches` off, a new tile's color is cycled until it no
    /// longer completes a line, at most `kinds` times. If every color does,
    /// the line is kept and a warning logged.
    pub fn populate(&mut self, allow_matches: bool) -> Result<usize, EngineError> {
        let empty: Vec<Pos> = self
            .grid
            .positions()
            .filter(|&p| self.grid.is_empty(p))
            .collect();
        let kinds = self.supply.kinds().max(1);

        for &pos in &empty {
            let mut tile = self.supply.get_random_tile()?;
            let initial = tile.color();
            let mut tried = 1;
            let grid = &self.grid;
            while !allow_matches && forms_line(|p| grid.tile_type_at(p), pos, tile.tile_type()) {
                if self.supply.next_type(&mut tile) == initial || tried >= kinds {
                    warn!(%pos, color = initial, "no color avoids a spawn match, keeping it");
                    break;
                }
                tried += 1;
            }
            let (id, color) = (tile.id(), tile.color());
            self.grid.put(tile, pos)?;
            self.events.push(BoardEvent::Spawned { tile: id, pos, color });
        }
        Ok(empty.len())
    }

    /// Cascade refill; same as [`Board::populate`]
    pub fn refill(&mut self, allow_matches: bool) -> Result<usize, EngineError> {
        self.populate(allow_matches)
    }

    pub fn find_match(&self, seed: Pos) -> Option<Match> {
        matcher::find_match(&self.grid, seed)
    }

    /// Destroy a match and everything its power-ups set off
    ///
    /// `trigger` is the power-up that produced the match, or `None` for a
    /// match found by the finder. Only finder matches form power-ups, and
    /// gems are spared unless a gem is the trigger. Returns the number of
    /// tiles destroyed.
    pub fn resolve_match(
        &mut self,
        m: Match,
        trigger: Option<PowerUp>,
    ) -> Result<usize, EngineError> {
        let mut queue: VecDeque<Pending> = VecDeque::new();
        queue.push_back((m, trigger));

        let mut destroyed = 0;
        while let Some((m, trigger)) = queue.pop_front() {
            destroyed += self.resolve_one(&m, trigger, &mut queue)?;
        }
        Ok(destroyed)
    }

    fn resolve_one(
        &mut self,
        m: &Match,
        trigger: Option<PowerUp>,
        queue: &mut VecDeque<Pending>,
    ) -> Result<usize, EngineError> {
        let formed = match trigger {
            None => formation(m),
            Some(_) => None,
        };
        let keep = formed.and_then(|_| m.candidate());

        let mut destroyed = 0;
        let mut went_off: Vec<(TileId, Pos, PowerUp)> = Vec::new();
        for &(id, pos) in m.tiles() {
            if keep.map(|(k, _)| k) == Some(id) {
                continue;
            }
            // Overlapping matches: the tile may already be gone.
            let Some(tile) = self.grid.get(pos).filter(|t| t.id() == id) else {
                continue;
            };
            if tile.is_gem() && trigger != Some(PowerUp::Gem) {
                continue;
            }

            let tile = self.grid.remove(pos)?;
            self.events.push(BoardEvent::Destroyed { tile: id, pos });
            destroyed += 1;
            if let Some(power) = tile.power().filter(|p| *p != PowerUp::Gem) {
                went_off.push((id, pos, power));
            }
            self.supply.return_to_pool(tile);
        }

        if destroyed > 0 {
            let points = self.score.add_score(match_points(destroyed));
            self.events.push(BoardEvent::Scored {
                points,
                multiplier: self.score.multiplier(),
            });
        }

        for (id, pos, power) in went_off {
            self.activate(id, pos, power, queue);
        }

        if let (Some(power), Some((id, pos))) = (formed, keep) {
            if self.grid.get(pos).is_some_and(|t| t.id() == id) {
                self.upgrade_at(pos, power, queue);
            }
        }
        Ok(destroyed)
    }

    /// Queue the area of a power-up that just went off
    fn activate(
        &mut self,
        tile: TileId,
        pos: Pos,
        power: PowerUp,
        queue: &mut VecDeque<Pending>,
    ) {
        self.events.push(BoardEvent::Activated { tile, pos, power });
        let area = activation_area(&self.grid, pos, power);
        debug!(%pos, power = power.as_str(), tiles = area.count(), "power-up activated");
        if area.count() > 0 {
            queue.push_back((area, Some(power)));
        }
    }

    /// Turn the tile at `pos` into `power`, setting off what it held before
    fn upgrade_at(&mut self, pos: Pos, power: PowerUp, queue: &mut VecDeque<Pending>) {
        let Some((id, previous)) = self.grid.get(pos).map(|t| (t.id(), t.power())) else {
            return;
        };
        if let Some(old) = previous.filter(|p| *p != PowerUp::Gem) {
            self.activate(id, pos, old, queue);
        }
        if let Some(tile) = self.grid.get_mut(pos) {
            self.supply.upgrade(tile, power);
        }
        self.events.push(BoardEvent::Upgraded { tile: id, pos, power });
    }

    /// Let idle tiles fall into empty cells, column by column
    pub fn collapse(&mut self) -> Result<usize, EngineError> {
        let (w, h) = (self.grid.width() as i8, self.grid.height() as i8);
        let mut moved = 0;
        for x in 0..w {
            for y_empty in 0..h - 1 {
                let target = Pos::new(x, y_empty);
                if !self.grid.is_empty(target) {
                    continue;
                }
                let source = (y_empty + 1..h)
                    .map(|y| Pos::new(x, y))
                    .find_map(|p| self.grid.get(p).filter(|t| t.is_idle()).map(|t| (p, t.id())));
                if let Some((from, tile)) = source {
                    self.grid.move_to(from, target)?;
                    self.events.push(BoardEvent::Moved { tile, from, to: target });
                    moved += 1;
                }
            }
        }
        Ok(moved)
    }

    /// Resolve every match among idle tiles; returns how many were resolved
    pub fn rescan(&mut self) -> Result<usize, EngineError> {
        let positions: Vec<Pos> = self.grid.positions().collect();
        let mut resolved = 0;
        for pos in positions {
            if !self.grid.get(pos).is_some_and(Tile::is_idle) {
                continue;
            }
            if let Some(m) = self.find_match(pos) {
                self.resolve_match(m, None)?;
                resolved += 1;
            }
        }
        Ok(resolved)
    }

    /// Destroy every idle tile on the board, gems included
    pub fn match_everything(&mut self) -> Result<usize, EngineError> {
        let mut all = Match::new();
        for tile in self.grid.tiles().filter(|t| t.is_idle()) {
            all.push(tile);
        }
        self.resolve_match(all, Some(PowerUp::Gem))
    }

    /// Destroy the gem at `gem` and every idle tile of `color`
    pub fn match_color(&mut self, gem: Pos, color: u8) -> Result<usize, EngineError> {
        let mut clear = Match::new();
        if let Some(t) = self.grid.get(gem) {
            clear.push(t);
        }
        let wanted = TileType::Color(color);
        for tile in self.grid.tiles().filter(|t| t.is_idle() && t.tile_type() == wanted) {
            clear.push(tile);
        }
        self.resolve_match(clear, Some(PowerUp::Gem))
    }

    /// Return every tile to the supply and hard-reset the score
    pub fn clear(&mut self) {
        for tile in self.grid.drain() {
            self.supply.return_to_pool(tile);
        }
        self.score.reset();
        self.events.clear();
    }

    pub(crate) fn reset_score(&mut self) {
        self.score.reset();
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub(crate) fn push_event(&mut self, event: BoardEvent) {
        self.events.push(event);
    }
}

fn decode_cell(ch: char) -> Result<Option<(u8, Option<PowerUp>)>, EngineError> {
    let cell = match ch {
        '.' => return Ok(None),
        'a'..='h' => (ch as u8 - b'a', None),
        'A'..='H' => (ch as u8 - b'A', Some(PowerUp::AreaBlast)),
        '1'..='8' => (ch as u8 - b'1', Some(PowerUp::Cross)),
        '*' => (0, Some(PowerUp::Gem)),
        _ => return Err(EngineError::Layout(format!("unknown cell {ch:?}"))),
    };
    Ok(Some(cell))
}

fn encode_tile(tile: &Tile) -> char {
    let c = tile.color().min(7);
    match tile.power() {
        None => (b'a' + c) as char,
        Some(PowerUp::AreaBlast) => (b'A' + c) as char,
        Some(PowerUp::Cross) => (b'1' + c) as char,
        Some(PowerUp::Gem) => '*',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SupplyError;
    use crate::supply::{SequenceSupply, TilePool};

    fn layout(rows: &[&str]) -> Board<SequenceSupply> {
        Board::from_layout(EngineConfig::default(), SequenceSupply::new(6, &[0]), rows).unwrap()
    }

    #[test]
    fn test_layout_round_trip() {
        let rows = ["ab*.", "A1cd", "fedc"];
        let board = layout(&rows);
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 3);
        assert_eq!(board.to_layout(), rows);
        assert_eq!(
            board.grid().get(Pos::new(1, 1)).unwrap().power(),
            Some(PowerUp::Cross)
        );
    }

    #[test]
    fn test_layout_rejects_unknown_cells() {
        let err = Board::from_layout(EngineConfig::default(), SequenceSupply::new(6, &[0]), &[
            "abc", "a?c", "abc",
        ])
        .unwrap_err();
        assert!(matches!(err, EngineError::Layout(_)));
    }

    #[test]
    fn test_populate_without_matches() {
        let config = EngineConfig::default().with_seed(7);
        let pool = TilePool::new(config.kinds, config.pool_capacity(), config.seed);
        let mut board = Board::new(config, pool).unwrap();
        assert_eq!(board.populate(false).unwrap(), 64);
        for pos in board.grid().positions() {
            assert!(board.find_match(pos).is_none(), "match at {pos}");
        }
        board.grid().verify().unwrap();
    }

    #[test]
    fn test_populate_surfaces_supply_exhaustion() {
        let config = EngineConfig::default();
        let pool = TilePool::new(config.kinds, 10, 1);
        let mut board = Board::new(config, pool).unwrap();
        let err = board.populate(true).unwrap_err();
        assert!(matches!(err, EngineError::Supply(_)));
    }

    #[test]
    fn test_anti_spawn_exhaustion_keeps_the_match() {
        // A single color can never avoid the line; the populate still finishes.
        let config = EngineConfig {
            kinds: 3,
            ..EngineConfig::default().with_size(3, 3)
        };
        let mut board = Board::new(config, SequenceSupply::new(1, &[0])).unwrap();
        assert_eq!(board.populate(false).unwrap(), 9);
        assert!(board.find_match(Pos::new(0, 0)).is_some());
    }

    /// Hands out a color past its own `kinds`, so cycling never returns to it
    struct StrayColor(SequenceSupply);

    impl TileSupply for StrayColor {
        fn kinds(&self) -> u8 {
            1
        }

        fn get_random_tile(&mut self) -> Result<Tile, SupplyError> {
            let mut tile = self.0.get_random_tile()?;
            tile.set_color(5);
            Ok(tile)
        }

        fn return_to_pool(&mut self, tile: Tile) {
            self.0.return_to_pool(tile);
        }
    }

    #[test]
    fn test_anti_spawn_stops_on_out_of_range_color() {
        let config = EngineConfig::default().with_size(3, 3);
        let mut board = Board::new(config, StrayColor(SequenceSupply::new(6, &[0]))).unwrap();
        assert_eq!(board.populate(false).unwrap(), 9);
        assert_eq!(board.grid().occupied(), 9);
    }

    #[test]
    fn test_collapse_keeps_column_order() {
        // Column 0 from the bottom: empty, b, empty, c.
        let mut board = layout(&["cde", ".ef", "bfd", ".de"]);
        let lower = board.grid().get(Pos::new(0, 1)).unwrap().id();
        let upper = board.grid().get(Pos::new(0, 3)).unwrap().id();

        assert_eq!(board.collapse().unwrap(), 2);
        assert_eq!(board.grid().get(Pos::new(0, 0)).unwrap().id(), lower);
        assert_eq!(board.grid().get(Pos::new(0, 1)).unwrap().id(), upper);
        assert!(board.grid().is_empty(Pos::new(0, 2)));
        assert!(board.grid().is_empty(Pos::new(0, 3)));
        board.grid().verify().unwrap();
    }

    #[test]
    fn test_collapse_skips_busy_tiles() {
        let mut board = layout(&["c..", "b..", "..."]);
        board.set_busy([Pos::new(0, 1)], true);
        board.collapse().unwrap();
        // The idle tile above falls past the busy one.
        assert_eq!(board.to_layout(), vec!["...", "b..", "c.."]);
    }

    #[test]
    fn test_resolve_plain_match_scores_square() {
        let mut board = layout(&["bcd", "cdb", "aaa"]);
        let m = board.find_match(Pos::new(0, 0)).unwrap();
        assert_eq!(board.resolve_match(m, None).unwrap(), 3);
        assert_eq!(board.score().score(), 9);
        assert_eq!(board.score().multiplier(), 1);
        assert_eq!(board.to_layout(), vec!["bcd", "cdb", "..."]);
    }

    #[test]
    fn test_match_of_four_forms_area_blast() {
        let mut board = layout(&["bcdb", "cdbc", "aaaa"]);
        let m = board.find_match(Pos::new(1, 0)).unwrap();
        assert_eq!(m.count(), 4);
        assert_eq!(board.resolve_match(m, None).unwrap(), 3);
        assert_eq!(board.score().score(), 9);
        assert_eq!(board.to_layout()[2], ".A..");
    }

    #[test]
    fn test_match_of_five_forms_gem() {
        let mut board = layout(&["bcdbc", "cdbcd", "aaaaa"]);
        let m = board.find_match(Pos::new(2, 0)).unwrap();
        assert_eq!(board.resolve_match(m, None).unwrap(), 4);
        assert_eq!(board.to_layout()[2], "..*..");
    }

    #[test]
    fn test_l_shape_forms_cross() {
        let mut board = layout(&["abc", "acb", "aaa"]);
        let m = board.find_match(Pos::new(0, 0)).unwrap();
        assert_eq!(m.count(), 5);
        assert_eq!(board.resolve_match(m, None).unwrap(), 4);
        assert_eq!(board.to_layout(), vec![".bc", ".cb", "1.."]);
    }

    #[test]
    fn test_destroyed_area_blast_clears_neighbours() {
        // The blast at (1, 1) is part of the vertical b run.
        let mut board = layout(&["cbd", "eBf", "dbe"]);
        let m = board.find_match(Pos::new(1, 0)).unwrap();
        board.resolve_match(m, None).unwrap();
        assert_eq!(board.grid().occupied(), 0);
        assert!(board
            .events()
            .iter()
            .any(|e| matches!(e, BoardEvent::Activated { power: PowerUp::AreaBlast, .. })));
    }

    #[test]
    fn test_power_up_activation_spares_gems_and_chains() {
        // The cross at (0, 0) clears row 0 and column 0. The blast at (2, 0)
        // chains into its neighbours, where the gem at (1, 1) survives.
        let mut board = layout(&["cdc", "d*e", "1bC"]);
        let mut m = Match::new();
        m.push(board.grid().get(Pos::new(0, 0)).unwrap());
        board.resolve_match(m, Some(PowerUp::Cross)).unwrap();
        assert_eq!(board.to_layout(), vec![".dc", ".*.", "..."]);
    }

    #[test]
    fn test_upgrading_a_power_up_sets_it_off_first() {
        // The seed at (1, 0) is already an area-blast and forms a new one.
        let mut board = layout(&["bcdb", "cdbc", "aAaa"]);
        let m = board.find_match(Pos::new(1, 0)).unwrap();
        assert_eq!(board.resolve_match(m, None).unwrap(), 6);
        assert_eq!(board.to_layout(), vec!["bcdb", "...c", ".A.."]);

        let events = board.events();
        let activated = events
            .iter()
            .position(|e| matches!(e, BoardEvent::Activated { .. }))
            .unwrap();
        let upgraded = events
            .iter()
            .position(|e| matches!(e, BoardEvent::Upgraded { .. }))
            .unwrap();
        assert!(activated < upgraded);
    }

    #[test]
    fn test_match_everything_includes_gems() {
        let mut board = layout(&["*ab", "ba*", "abc"]);
        assert_eq!(board.match_everything().unwrap(), 9);
        assert_eq!(board.grid().occupied(), 0);
    }

    #[test]
    fn test_match_color_clears_one_color() {
        let mut board = layout(&["aba", "b*c", "aca"]);
        assert_eq!(board.match_color(Pos::new(1, 1), 0).unwrap(), 5);
        assert_eq!(board.to_layout(), vec![".b.", "b.c", ".c."]);
    }

    #[test]
    fn test_rescan_resolves_all_matches() {
        let mut board = layout(&["ddd", "bcb", "aaa"]);
        assert_eq!(board.rescan().unwrap(), 2);
        assert_eq!(board.to_layout(), vec!["...", "bcb", "..."]);
        assert_eq!(board.score().multiplier(), 2);
    }

    #[test]
    fn test_clear_returns_tiles() {
        let mut board = layout(&["abc", "bca", "cab"]);
        assert_eq!(board.supply().in_use(), 9);
        board.clear();
        assert_eq!(board.supply().in_use(), 0);
        assert_eq!(board.grid().occupied(), 0);
        assert!(board.events().is_empty());
    }
}
