//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Cursor keys
//! rely on the terminal's own key repeat, so no repeat handling lives here.

pub mod map;

pub use tui_match3_types as types;

pub use map::{handle_key_event, should_quit};
