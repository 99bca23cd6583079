//! Session - drives a game with awaited animation between board steps
//!
//! The board itself is synchronous. The session splits a swap into the steps
//! a player should see and awaits the [`Animator`] after each one:
//!
//! 1. swap the two tiles
//! 2. settle: resolve the matches or swap back
//! 3. every cascade step (collapse, refill, rescan) until stable
//! 4. deadlock clearing, if the board ran out of moves
//!
//! Input stays disabled from the first step to the last. Commands that
//! arrive meanwhile are discarded once the sequence ends, apart from `Quit`.
//! Game timers are frozen while a sequence plays.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use tui_match3_core::types::{GameAction, Pos, TICK_MS};
use tui_match3_core::{Cascade, Game, GameSnapshot, SwapOutcome, SwapRequest, TileSupply};

use crate::animator::Animator;

/// Message from the input side to a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Action(GameAction),
    Quit,
}

pub struct Session<S: TileSupply, A: Animator> {
    game: Game<S>,
    animator: A,
    snapshot: GameSnapshot,
    /// Animated cells of the batch in flight, reused between flushes
    busy: Vec<Pos>,
}

impl<S: TileSupply, A: Animator> Session<S, A> {
    pub fn new(game: Game<S>, animator: A) -> Self {
        Self {
            game,
            animator,
            snapshot: GameSnapshot::default(),
            busy: Vec::new(),
        }
    }

    pub fn game(&self) -> &Game<S> {
        &self.game
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn into_parts(self) -> (Game<S>, A) {
        (self.game, self.animator)
    }

    /// Populate the board and animate the tiles dropping in
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.game.start()?;
        self.flush().await?;
        self.present()
    }

    /// Apply one action, playing the swap it completes
    pub async fn handle(&mut self, action: GameAction) -> anyhow::Result<Option<SwapOutcome>> {
        let request = self.game.apply_action(action)?;
        // Restart leaves a freshly populated board behind.
        self.flush().await?;
        match request {
            Some(request) => self.play_swap(request).await.map(Some),
            None => {
                self.present()?;
                Ok(None)
            }
        }
    }

    /// Play a swap step by step with input disabled throughout
    pub async fn play_swap(&mut self, request: SwapRequest) -> anyhow::Result<SwapOutcome> {
        let SwapRequest { first, second } = request;
        if let Err(reason) = self.game.board().validate_swap(first, second) {
            debug!(%first, %second, ?reason, "swap rejected");
            return Ok(SwapOutcome::Rejected(reason));
        }

        self.game.cursor_mut().set_enabled(false);
        let played = self.sequence(first, second).await;
        self.game.cursor_mut().set_enabled(true);
        self.present()?;
        played
    }

    async fn sequence(&mut self, a: Pos, b: Pos) -> anyhow::Result<SwapOutcome> {
        self.game.board_mut().swap_tiles(a, b)?;
        self.flush().await?;

        let outcome = self.game.board_mut().settle_swap(a, b)?;
        self.flush().await?;

        if outcome.needs_cascade() {
            let mut cascade = Cascade::new(self.game.board().config().max_cascade_passes);
            while !cascade.is_stable() {
                let step = cascade.step(self.game.board_mut())?;
                trace!(?step, "cascade step");
                self.flush().await?;
            }
            debug!(report = ?cascade.report(), "cascade finished");
        }

        if self.game.after_settle()? {
            self.flush().await?;
        }
        Ok(outcome)
    }

    /// Hand the pending events to the animator and wait for it
    ///
    /// Tiles in animated cells are busy while the animator runs and are
    /// released even when it fails.
    async fn flush(&mut self) -> anyhow::Result<()> {
        let batch = self.game.board_mut().take_events();
        if batch.is_empty() {
            return Ok(());
        }

        self.busy.clear();
        self.busy.extend(batch.iter().flat_map(|e| e.animated_cells()));
        self.game.board_mut().set_busy(self.busy.iter().copied(), true);
        self.game.snapshot_into(&mut self.snapshot);

        let played = self.animator.play(&batch, &self.snapshot).await;
        self.game.board_mut().set_busy(self.busy.iter().copied(), false);
        played
    }

    fn present(&mut self) -> anyhow::Result<()> {
        self.game.snapshot_into(&mut self.snapshot);
        self.animator.present(&self.snapshot)
    }

    /// Advance game timers, redrawing when something visible changed
    pub fn tick(&mut self, elapsed_ms: u32) -> anyhow::Result<bool> {
        let changed = self.game.tick(elapsed_ms);
        if changed {
            self.present()?;
        }
        Ok(changed)
    }

    /// Run until `Quit`, a closed command channel, or the shutdown signal
    ///
    /// Shutdown is only observed between sequences; a cascade in flight always
    /// finishes. Dropping the shutdown sender stops the session as well.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> anyhow::Result<Self> {
        if !self.game.started() {
            self.start().await?;
        }

        let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MS as u64));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    debug!("session shutdown");
                    break;
                }
                command = commands.recv() => match command {
                    Some(SessionCommand::Action(action)) => {
                        let played = self.handle(action).await?;
                        if played.is_some_and(|o| !o.is_rejected()) {
                            if discard_queued(&mut commands) {
                                break;
                            }
                            last = Instant::now();
                        }
                    }
                    Some(SessionCommand::Quit) | None => break,
                },
                now = ticker.tick() => {
                    let elapsed = now.saturating_duration_since(last).as_millis();
                    last = now;
                    self.tick(elapsed.min(u32::MAX as u128) as u32)?;
                }
            }
        }

        debug!(
            score = self.game.score(),
            episode = self.game.episode_id(),
            "session ended"
        );
        Ok(self)
    }
}

/// Drop actions received during a sequence; true if a `Quit` was among them
fn discard_queued(commands: &mut mpsc::Receiver<SessionCommand>) -> bool {
    let mut dropped = 0usize;
    while let Ok(command) = commands.try_recv() {
        match command {
            SessionCommand::Quit => return true,
            SessionCommand::Action(_) => dropped += 1,
        }
    }
    if dropped > 0 {
        trace!(dropped, "input discarded after cascade");
    }
    false
}
