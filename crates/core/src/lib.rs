//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules, board state and scoring. It has
//! **no dependencies** on terminals, async runtimes or I/O, making it:
//!
//! - **Deterministic**: Same seed and inputs produce identical boards
//! - **Testable**: Text layouts and scripted supplies pin down every rule
//! - **Portable**: Runs synchronously in tests and benches, or under the async session
//!
//! # Module Structure
//!
//! - [`grid`]: bounded cell storage that keeps tile positions in lock-step
//! - [`tile`]: tile identity, color class, power-up and idle flag
//! - [`supply`]: where tiles come from ([`TilePool`], [`SequenceSupply`])
//! - [`matcher`]: run and branch scanning, hint search
//! - [`powerup`]: formation and activation rules
//! - [`scoring`]: `count²` points and the decaying combo multiplier
//! - [`board`]: resolution, collapse, refill and rescan
//! - [`swap`]: swap validation, gem swaps and rollback
//! - [`cascade`]: the collapse/refill/rescan state machine
//! - [`cursor`]: two-step selection producing swap requests
//! - [`game`]: a playable round with timer, hints, pause and restart
//!
//! # Game Rules
//!
//! - **Matches**: three or more same-colored idle tiles in a line; crossing
//!   lines (T, L, plus) merge into one match
//! - **Swaps**: only 4-adjacent idle tiles; a swap that matches nothing is undone
//! - **Power-ups**: 4 in a line makes an area-blast, 5+ makes a gem, a crossing
//!   match makes a cross
//! - **Gems**: swapped with a tile they clear its whole color; two gems clear
//!   the board
//! - **Combo**: each scoring event raises the multiplier, which resets when no
//!   score arrives within a shrinking window
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{Board, EngineConfig, SequenceSupply, SwapOutcome};
//! use tui_match3_types::Pos;
//!
//! let mut board = Board::from_layout(
//!     EngineConfig::default(),
//!     SequenceSupply::new(6, &[3, 4, 5]),
//!     &["bcd", "dad", "aba"],
//! )
//! .unwrap();
//!
//! // Dropping the middle a into the bottom row lines up three a's.
//! let outcome = board.try_swap(Pos::new(1, 1), Pos::new(1, 0)).unwrap();
//! assert_eq!(outcome, SwapOutcome::Matched { matches: 1, destroyed: 3 });
//! assert_eq!(board.score().score(), 9);
//! ```

pub mod board;
pub mod cascade;
pub mod config;
pub mod cursor;
pub mod error;
pub mod events;
pub mod game;
pub mod grid;
pub mod matcher;
pub mod powerup;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod supply;
pub mod swap;
pub mod tile;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use cascade::{Cascade, CascadePhase, CascadeReport, CascadeStep};
pub use config::EngineConfig;
pub use cursor::{Cursor, SwapRequest};
pub use error::{EngineError, SupplyError};
pub use events::{BoardEvent, SoundCue};
pub use game::Game;
pub use grid::Grid;
pub use matcher::{find_hint, find_match, Match, Orientation};
pub use rng::SimpleRng;
pub use scoring::ScoreEngine;
pub use snapshot::{GameSnapshot, TileView};
pub use supply::{SequenceSupply, TilePool, TileSupply};
pub use swap::{SwapOutcome, SwapRejection};
pub use tile::{Tile, TileId, TileType};
