//! Terminal match-3 runner (default binary).
//!
//! Keys are read on a plain thread and forwarded to the async session, which
//! plays every swap and cascade step through a terminal animator. Logging is
//! off unless `MATCH3_LOG_PATH` names a file; the terminal itself is the UI.

use std::fs::OpenOptions;
use std::future::Future;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, trace, warn};
use tracing_subscriber::EnvFilter;

use tui_match3::core::events::batch_cues;
use tui_match3::core::{BoardEvent, EngineConfig, Game, GameSnapshot};
use tui_match3::engine::{Animator, Session, SessionCommand};
use tui_match3::input::{handle_key_event, should_quit};
use tui_match3::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

/// How long each animated batch stays on screen
const ANIM_STEP_MS: u64 = 90;
const INPUT_POLL: Duration = Duration::from_millis(100);
const COMMAND_BUFFER: usize = 64;

fn main() -> Result<()> {
    init_logging()?;
    let mut config = EngineConfig::from_env();
    if std::env::var_os("MATCH3_SEED").is_none() {
        config.seed = clock_seed();
    }
    config.validate()?;
    info!(?config, "starting");

    let runtime = tokio::runtime::Runtime::new().context("creating tokio runtime")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let input = spawn_input(tx);
    let result = runtime.block_on(run(config, rx));

    // Always try to restore terminal state.
    let _ = term.exit();
    if input.join().is_err() {
        warn!("input thread panicked");
    }
    result
}

async fn run(config: EngineConfig, commands: mpsc::Receiver<SessionCommand>) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(());
            }
            Err(err) => {
                warn!(%err, "no interrupt handler, relying on the quit key");
                std::future::pending::<()>().await;
            }
        }
    });

    let game = Game::with_pool(config)?;
    let animator = TermAnimator::new(Duration::from_millis(ANIM_STEP_MS));
    let session = Session::new(game, animator).run(commands, shutdown_rx).await?;
    info!(
        score = session.game().score(),
        episode = session.game().episode_id(),
        "game finished"
    );
    Ok(())
}

/// Forward key presses until quit or until the session hangs up
fn spawn_input(tx: mpsc::Sender<SessionCommand>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !tx.is_closed() {
            let ready = match event::poll(INPUT_POLL) {
                Ok(ready) => ready,
                Err(err) => {
                    warn!(%err, "input poll failed");
                    let _ = tx.blocking_send(SessionCommand::Quit);
                    return;
                }
            };
            if !ready {
                continue;
            }

            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => key,
                Ok(_) => continue,
                Err(err) => {
                    warn!(%err, "input read failed");
                    let _ = tx.blocking_send(SessionCommand::Quit);
                    return;
                }
            };

            let command = if should_quit(key) {
                SessionCommand::Quit
            } else if let Some(action) = handle_key_event(key) {
                SessionCommand::Action(action)
            } else {
                continue;
            };
            if tx.blocking_send(command).is_err() || command == SessionCommand::Quit {
                return;
            }
        }
    })
}

/// A different board every run unless `MATCH3_SEED` pins one
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("MATCH3_LOG_PATH") else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.to_string_lossy()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Draws every batch and holds it on screen for one animation step
struct TermAnimator {
    renderer: TerminalRenderer,
    view: GameView,
    fb: FrameBuffer,
    step: Duration,
}

impl TermAnimator {
    fn new(step: Duration) -> Self {
        Self {
            renderer: TerminalRenderer::new(),
            view: GameView::default(),
            fb: FrameBuffer::new(0, 0),
            step,
        }
    }

    fn draw(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.view.render_into(snapshot, Viewport::new(w, h), &mut self.fb);
        self.renderer.draw_swap(&mut self.fb)?;
        Ok(())
    }
}

impl Animator for TermAnimator {
    fn play(
        &mut self,
        batch: &[BoardEvent],
        snapshot: &GameSnapshot,
    ) -> impl Future<Output = Result<()>> {
        let drawn = self.draw(snapshot);
        trace!(events = batch.len(), cues = ?batch_cues(batch), "animating batch");
        let step = self.step;
        async move {
            drawn?;
            tokio::time::sleep(step).await;
            Ok(())
        }
    }

    fn present(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        self.draw(snapshot)
    }
}
