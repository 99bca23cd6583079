//! Async game session
//!
//! Sequences the synchronous board from `tui-match3-core` with awaited
//! animation. The session owns the [`Game`](tui_match3_core::Game) and an
//! [`Animator`], reads [`SessionCommand`]s from a tokio channel and ticks the
//! game timers on a fixed interval.
//!
//! ```no_run
//! use tokio::sync::{mpsc, oneshot};
//! use tui_match3_core::{EngineConfig, Game};
//! use tui_match3_engine::{NullAnimator, Session, SessionCommand};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let game = Game::with_pool(EngineConfig::default())?;
//! let (tx, rx) = mpsc::channel(64);
//! let (_stop, shutdown) = oneshot::channel();
//! tx.send(SessionCommand::Quit).await?;
//! let session = Session::new(game, NullAnimator).run(rx, shutdown).await?;
//! println!("final score {}", session.game().score());
//! # Ok(())
//! # }
//! ```

pub mod animator;
pub mod session;

pub use animator::{Animator, NullAnimator};
pub use session::{Session, SessionCommand};
