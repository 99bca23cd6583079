//! TUI Match-3 (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, benches and
//! integration tests can use `tui_match3::{core,engine,input,term,types}`.

pub use tui_match3_core as core;
pub use tui_match3_engine as engine;
pub use tui_match3_input as input;
pub use tui_match3_term as term;
pub use tui_match3_types as types;
