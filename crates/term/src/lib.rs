//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and instead renders into a framebuffer that is flushed to the
//! terminal row by row.
//!
//! - [`GameView`] is pure: snapshot in, framebuffer out
//! - [`TerminalRenderer`] owns the terminal and writes only changed rows

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tile_color, tile_glyph, AnchorY, GameView, Viewport, PALETTE};
pub use renderer::{encode_full_into, encode_rows_into, TerminalRenderer};
