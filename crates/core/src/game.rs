//! Game module - a playable round around the board
//!
//! Adds what a player sees on top of the board rules: the cursor, the level
//! countdown, idle hints, pause and restart, and deadlock clearing when the
//! board runs out of moves.

use tracing::{debug, warn};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::cursor::{Cursor, SwapRequest};
use crate::error::EngineError;
use crate::matcher::find_hint;
use crate::snapshot::{GameSnapshot, TileView};
use crate::supply::{TilePool, TileSupply};
use crate::swap::SwapOutcome;
use crate::types::{GameAction, Pos};

/// Deadlock clears attempted in a row before giving up on finding a move
const MAX_DEADLOCK_CLEARS: u32 = 4;

#[derive(Debug, Clone)]
pub struct Game<S: TileSupply> {
    board: Board<S>,
    cursor: Cursor,
    time_left_ms: Option<u32>,
    /// Time since the last settle or selection, drives the hint
    idle_ms: u32,
    hint: Option<(Pos, Pos)>,
    paused: bool,
    game_over: bool,
    started: bool,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
}

impl Game<TilePool> {
    /// Game backed by a seeded pool sized for the config
    pub fn with_pool(config: EngineConfig) -> Result<Self, EngineError> {
        let pool = TilePool::new(config.kinds, config.pool_capacity(), config.seed);
        Ok(Self::new(Board::new(config, pool)?))
    }
}

impl<S: TileSupply> Game<S> {
    /// Wrap a board; tiles already on it are kept by [`Game::start`]
    pub fn new(board: Board<S>) -> Self {
        let cursor = Cursor::new(board.width(), board.height());
        Self {
            time_left_ms: board.config().time_limit_ms,
            board,
            cursor,
            idle_ms: 0,
            hint: None,
            paused: false,
            game_over: false,
            started: false,
            episode_id: 0,
        }
    }

    /// Fill the board without matches and begin the countdown
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.started {
            return Ok(());
        }
        self.board.populate(false)?;
        self.started = true;
        self.cursor.set_enabled(true);
        // A round opens at zero even when the first board had to be cleared.
        if self.after_settle()? {
            self.board.reset_score();
        }
        Ok(())
    }

    /// Fresh board, zero score, next episode
    pub fn restart(&mut self) -> Result<(), EngineError> {
        self.board.clear();
        self.cursor = Cursor::new(self.board.width(), self.board.height());
        self.time_left_ms = self.board.config().time_limit_ms;
        self.idle_ms = 0;
        self.hint = None;
        self.paused = false;
        self.game_over = false;
        self.started = false;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.start()
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u64 {
        self.board.score().score()
    }

    pub fn multiplier(&self) -> u32 {
        self.board.score().multiplier()
    }

    pub fn time_left_ms(&self) -> Option<u32> {
        self.time_left_ms
    }

    pub fn hint(&self) -> Option<(Pos, Pos)> {
        self.hint
    }

    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board<S> {
        &mut self.board
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// Accepts player input: started, running and not mid-cascade
    pub fn accepts_input(&self) -> bool {
        self.started && !self.paused && !self.game_over && self.cursor.is_enabled()
    }

    /// Apply one action; a completed selection comes back as a swap request
    ///
    /// The request is not played here. Callers either hand it to
    /// [`Game::play_swap`] or sequence it themselves with animation.
    pub fn apply_action(&mut self, action: GameAction) -> Result<Option<SwapRequest>, EngineError> {
        if !self.started {
            return Ok(None);
        }
        match action {
            GameAction::Restart => {
                self.restart()?;
                return Ok(None);
            }
            GameAction::Pause => {
                if !self.game_over {
                    self.paused = !self.paused;
                }
                return Ok(None);
            }
            _ if self.paused || self.game_over => return Ok(None),
            _ => {}
        }

        if let Some(dir) = action.cursor_direction() {
            self.cursor.move_by(dir);
            return Ok(None);
        }
        let request = match action {
            GameAction::Select => {
                self.idle_ms = 0;
                self.cursor.select_focused(self.board.grid())
            }
            GameAction::Deselect => {
                self.cursor.deselect();
                None
            }
            GameAction::Hint => {
                self.hint = find_hint(self.board.grid());
                None
            }
            _ => None,
        };
        Ok(request)
    }

    /// Play a swap synchronously, cascade included
    pub fn play_swap(&mut self, request: SwapRequest) -> Result<SwapOutcome, EngineError> {
        let outcome = self.board.try_swap(request.first, request.second)?;
        if !outcome.is_rejected() {
            self.after_settle()?;
        }
        Ok(outcome)
    }

    /// [`Game::apply_action`] followed by [`Game::play_swap`]
    pub fn handle(&mut self, action: GameAction) -> Result<Option<SwapOutcome>, EngineError> {
        match self.apply_action(action)? {
            Some(request) => self.play_swap(request).map(Some),
            None => Ok(None),
        }
    }

    /// Called once the board is stable after a swap
    ///
    /// Resets the hint timer and, when no move is left, clears the whole board
    /// and cascades until one appears. Returns true if a deadlock was cleared.
    pub fn after_settle(&mut self) -> Result<bool, EngineError> {
        self.hint = None;
        self.idle_ms = 0;

        let mut cleared = false;
        for attempt in 1..=MAX_DEADLOCK_CLEARS {
            if find_hint(self.board.grid()).is_some() {
                return Ok(cleared);
            }
            debug!(attempt, "no moves left, clearing board");
            self.board.match_everything()?;
            self.board.cascade()?;
            cleared = true;
        }
        if find_hint(self.board.grid()).is_none() {
            warn!(clears = MAX_DEADLOCK_CLEARS, "board still has no moves");
        }
        Ok(cleared)
    }

    /// Advance timers; returns true when something visible changed
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.started || self.paused || self.game_over {
            return false;
        }
        let mut changed = self.board.tick(elapsed_ms);

        if let Some(left) = self.time_left_ms {
            let now = left.saturating_sub(elapsed_ms);
            self.time_left_ms = Some(now);
            changed |= now / 1000 != left / 1000;
            if now == 0 {
                debug!(episode = self.episode_id, score = self.score(), "time up");
                self.game_over = true;
                self.cursor.set_enabled(false);
                changed = true;
            }
        }

        // The idle clock only runs while the player can act.
        if self.cursor.is_enabled() {
            self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
            if self.hint.is_none() && self.idle_ms >= self.board.config().hint_delay_ms {
                self.hint = find_hint(self.board.grid());
                changed |= self.hint.is_some();
            }
        }
        changed |= self.board.score().is_decaying();
        changed
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let grid = self.board.grid();
        let score = self.board.score();

        out.width = grid.width();
        out.height = grid.height();
        out.cells.clear();
        out.cells
            .extend(grid.positions().map(|p| grid.get(p).map(TileView::from)));
        out.score = score.score();
        out.multiplier = score.multiplier();
        out.combo_window_ms = score.window_ms();
        out.combo_elapsed_ms = score.elapsed_ms();
        out.cursor = self.cursor.focus();
        out.selected = self.cursor.selected();
        out.hint = self.hint;
        out.time_left_ms = self.time_left_ms;
        out.input_enabled = self.accepts_input();
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.episode_id = self.episode_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::BoardEvent;

    fn game() -> Game<TilePool> {
        let mut g = Game::with_pool(EngineConfig::default().with_seed(3)).unwrap();
        g.start().unwrap();
        g
    }

    #[test]
    fn test_start_populates_match_free() {
        let g = game();
        assert_eq!(g.board().grid().occupied(), 64);
        assert_eq!(g.score(), 0);
        assert!(find_hint(g.board().grid()).is_some());
    }

    #[test]
    fn test_actions_ignored_before_start() {
        let mut g = Game::with_pool(EngineConfig::default()).unwrap();
        assert_eq!(g.apply_action(GameAction::Select).unwrap(), None);
        assert!(!g.tick(100));
    }

    #[test]
    fn test_pause_freezes_input_and_timers() {
        let config = EngineConfig {
            time_limit_ms: Some(10_000),
            ..EngineConfig::default()
        };
        let mut g = Game::with_pool(config).unwrap();
        g.start().unwrap();

        g.apply_action(GameAction::Pause).unwrap();
        assert!(g.paused());
        let focus = g.cursor().focus();
        g.apply_action(GameAction::CursorLeft).unwrap();
        assert_eq!(g.cursor().focus(), focus);
        assert!(!g.tick(5_000));
        assert_eq!(g.time_left_ms(), Some(10_000));

        g.apply_action(GameAction::Pause).unwrap();
        g.tick(5_000);
        assert_eq!(g.time_left_ms(), Some(5_000));
    }

    #[test]
    fn test_timer_ends_game_and_restart_recovers() {
        let config = EngineConfig {
            time_limit_ms: Some(1_000),
            ..EngineConfig::default()
        };
        let mut g = Game::with_pool(config).unwrap();
        g.start().unwrap();
        assert!(g.tick(1_000));
        assert!(g.game_over());
        assert!(!g.accepts_input());
        assert_eq!(g.apply_action(GameAction::Select).unwrap(), None);

        g.apply_action(GameAction::Restart).unwrap();
        assert!(!g.game_over());
        assert_eq!(g.episode_id(), 1);
        assert_eq!(g.time_left_ms(), Some(1_000));
        assert_eq!(g.board().supply().in_use(), 64);
    }

    #[test]
    fn test_hint_after_idle_delay() {
        let mut g = game();
        let delay = g.board().config().hint_delay_ms;
        g.tick(delay - 1);
        assert_eq!(g.hint(), None);
        g.tick(1);
        let (a, b) = g.hint().unwrap();
        assert!(a.is_adjacent(b));
    }

    #[test]
    fn test_hint_action_and_swap_play() {
        let mut g = game();
        g.apply_action(GameAction::Hint).unwrap();
        let (a, b) = g.hint().unwrap();

        let outcome = g.play_swap(SwapRequest { first: a, second: b }).unwrap();
        assert!(matches!(outcome, SwapOutcome::Matched { .. } | SwapOutcome::ColorClear { .. }));
        assert!(g.score() > 0);
        assert_eq!(g.hint(), None);
        assert_eq!(g.board().grid().occupied(), 64);
        g.board().grid().verify().unwrap();
    }

    #[test]
    fn test_deadlock_is_cleared() {
        let board = Board::from_layout(
            EngineConfig::default(),
            TilePool::new(6, 128, 5),
            &["cdc", "aba", "dcd"],
        )
        .unwrap();
        let mut g = Game::new(board);
        g.start().unwrap();
        assert!(g
            .board()
            .events()
            .iter()
            .any(|e| matches!(e, BoardEvent::Destroyed { .. })));
        assert_eq!(g.score(), 0);
        assert_eq!(g.board().grid().occupied(), 9);
    }

    #[test]
    fn test_snapshot_mirrors_game() {
        let mut g = game();
        g.apply_action(GameAction::Select).unwrap();
        let snap = g.snapshot();
        assert_eq!(snap.width, 8);
        assert_eq!(snap.cells.len(), 64);
        assert_eq!(snap.selected, Some(g.cursor().focus()));
        assert!(snap.input_enabled);
        let origin = g.board().grid().get(Pos::new(0, 0)).unwrap();
        assert_eq!(snap.cell(Pos::new(0, 0)).unwrap().color, origin.color());
    }
}
