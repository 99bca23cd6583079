//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, async sequencing, terminal rendering).
//!
//! # Coordinates
//!
//! Boards are addressed with [`Pos`] where `x` grows to the right and `y` grows
//! **upwards**: row `y = 0` is the bottom row and tiles fall towards it.
//!
//! # Board Limits
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 8 | Columns on a default board |
//! | `DEFAULT_HEIGHT` | 8 | Rows on a default board |
//! | `DEFAULT_KINDS` | 6 | Distinct tile colors |
//! | `MIN_DIMENSION` / `MAX_DIMENSION` | 3 / 64 | Accepted width and height |
//! | `MIN_KINDS` / `MAX_KINDS` | 3 / 8 | Accepted color count |
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `COMBO_BASE_WINDOW_MS` | 2000 | Combo decay window at multiplier 1 |
//! | `COMBO_MIN_WINDOW_MS` | 250 | Floor for the shrinking decay window |
//! | `HINT_DELAY_MS` | 5000 | Idle time before a hint is revealed |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{Direction, GameAction, Pos, PowerUp};
//!
//! let a = Pos::new(2, 3);
//! assert_eq!(a.step(Direction::Up), Pos::new(2, 4));
//! assert!(a.is_adjacent(Pos::new(1, 3)));
//! assert!(!a.is_adjacent(Pos::new(3, 4)));
//!
//! assert_eq!(PowerUp::from_str("gem"), Some(PowerUp::Gem));
//! assert_eq!(GameAction::from_str("select"), Some(GameAction::Select));
//! ```

use std::fmt;

/// Default board width in cells
pub const DEFAULT_WIDTH: u8 = 8;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u8 = 8;

/// Default number of tile colors
pub const DEFAULT_KINDS: u8 = 6;

/// Smallest accepted width or height
pub const MIN_DIMENSION: u8 = 3;

/// Largest accepted width or height (coordinates are stored as `i8`)
pub const MAX_DIMENSION: u8 = 64;

/// Fewest colors a board can be played with
pub const MIN_KINDS: u8 = 3;

/// Most colors the renderer has a palette for
pub const MAX_KINDS: u8 = 8;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Combo decay window while the multiplier is 1
pub const COMBO_BASE_WINDOW_MS: u32 = 2000;

/// The decay window never shrinks below this
pub const COMBO_MIN_WINDOW_MS: u32 = 250;

/// Inactivity before the game reveals a possible move
pub const HINT_DELAY_MS: u32 = 5000;

/// Cascade passes allowed with match-friendly refill before refill turns match-free
pub const MAX_CASCADE_PASSES: u32 = 32;

/// Pool capacity as a multiple of the cell count (worst case: every tile matches at once)
pub const POOL_FACTOR: usize = 2;

/// A cell coordinate on the board
///
/// `x` counts columns from the left, `y` counts rows from the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Pos {
    pub x: i8,
    pub y: i8,
}

impl Pos {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Offset by a raw delta
    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The neighbouring cell in the given direction
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    /// True for the four orthogonal neighbours only
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = (self.x as i16 - other.x as i16).abs();
        let dy = (self.y as i16 - other.y as i16).abs();
        dx + dy == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal scan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Scan order used everywhere a deterministic order matters
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// `(dx, dy)` with `+y` pointing up
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }
}

/// Board axis a run lies along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The two scan directions of this axis, in scan order
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::Horizontal => [Direction::Left, Direction::Right],
            Axis::Vertical => [Direction::Up, Direction::Down],
        }
    }

    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Special ability a tile can carry instead of being plainly destroyed
///
/// - **AreaBlast**: formed from a 4-tile match; clears its 8 neighbours
/// - **Gem**: formed from a 5+ match; wild colored, clears a whole color when swapped
/// - **Cross**: formed from a T/L/plus match; clears its row and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUp {
    AreaBlast,
    Gem,
    Cross,
}

impl PowerUp {
    /// Parse power-up kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::PowerUp;
    ///
    /// assert_eq!(PowerUp::from_str("area-blast"), Some(PowerUp::AreaBlast));
    /// assert_eq!(PowerUp::from_str("CROSS"), Some(PowerUp::Cross));
    /// assert_eq!(PowerUp::from_str("bomb"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "area-blast" | "areablast" | "blast" => Some(PowerUp::AreaBlast),
            "gem" | "color-clear" => Some(PowerUp::Gem),
            "cross" | "row-column" => Some(PowerUp::Cross),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUp::AreaBlast => "area-blast",
            PowerUp::Gem => "gem",
            PowerUp::Cross => "cross",
        }
    }
}

/// Player actions applied to a running game
///
/// Cursor actions move the keyboard focus; `Select` feeds the input adapter's
/// first/second selection and may produce a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Select the focused tile (first press) or swap with it (second press)
    Select,
    /// Drop the current selection
    Deselect,
    /// Reveal a possible move now
    Hint,
    /// Toggle pause state
    Pause,
    /// Restart with a fresh board
    Restart,
}

impl GameAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("cursorLeft"), Some(GameAction::CursorLeft));
    /// assert_eq!(GameAction::from_str("HINT"), Some(GameAction::Hint));
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorleft" => Some(GameAction::CursorLeft),
            "cursorright" => Some(GameAction::CursorRight),
            "cursorup" => Some(GameAction::CursorUp),
            "cursordown" => Some(GameAction::CursorDown),
            "select" => Some(GameAction::Select),
            "deselect" => Some(GameAction::Deselect),
            "hint" => Some(GameAction::Hint),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::CursorLeft => "cursorLeft",
            GameAction::CursorRight => "cursorRight",
            GameAction::CursorUp => "cursorUp",
            GameAction::CursorDown => "cursorDown",
            GameAction::Select => "select",
            GameAction::Deselect => "deselect",
            GameAction::Hint => "hint",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }

    /// Cursor direction for the four movement actions
    pub fn cursor_direction(&self) -> Option<Direction> {
        match self {
            GameAction::CursorLeft => Some(Direction::Left),
            GameAction::CursorRight => Some(Direction::Right),
            GameAction::CursorUp => Some(Direction::Up),
            GameAction::CursorDown => Some(Direction::Down),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_fits_limits() {
        assert!((MIN_DIMENSION..=MAX_DIMENSION).contains(&DEFAULT_WIDTH));
        assert!((MIN_DIMENSION..=MAX_DIMENSION).contains(&DEFAULT_HEIGHT));
        assert!((MIN_KINDS..=MAX_KINDS).contains(&DEFAULT_KINDS));
        assert!(COMBO_MIN_WINDOW_MS < COMBO_BASE_WINDOW_MS);
        assert!(MAX_DIMENSION as i32 <= i8::MAX as i32);
    }

    #[test]
    fn adjacency_excludes_diagonals_and_self() {
        let p = Pos::new(4, 4);
        for d in Direction::ALL {
            assert!(p.is_adjacent(p.step(d)));
        }
        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Pos::new(5, 5)));
        assert!(!p.is_adjacent(Pos::new(6, 4)));
    }

    #[test]
    fn axis_directions_are_ordered() {
        assert_eq!(
            Axis::Horizontal.directions(),
            [Direction::Left, Direction::Right]
        );
        assert_eq!(Axis::Vertical.directions(), [Direction::Up, Direction::Down]);
        assert_eq!(Axis::Horizontal.perpendicular(), Axis::Vertical);
    }
}
