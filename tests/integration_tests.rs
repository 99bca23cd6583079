//! Integration tests for a full game round

use tui_match3::core::matcher::is_part_of_match;
use tui_match3::core::{
    Board, BoardEvent, EngineConfig, EngineError, Game, ScoreEngine, SequenceSupply, SupplyError,
    SwapOutcome, TilePool, TileSupply,
};
use tui_match3::types::{GameAction, Pos};

fn started(config: EngineConfig) -> Game<TilePool> {
    let mut game = Game::with_pool(config).unwrap();
    game.start().unwrap();
    game
}

/// Walk the cursor to `target` with movement actions
fn focus<S: TileSupply>(game: &mut Game<S>, target: Pos) {
    while game.cursor().focus() != target {
        let at = game.cursor().focus();
        let action = if at.x < target.x {
            GameAction::CursorRight
        } else if at.x > target.x {
            GameAction::CursorLeft
        } else if at.y < target.y {
            GameAction::CursorUp
        } else {
            GameAction::CursorDown
        };
        game.apply_action(action).unwrap();
    }
}

#[test]
fn test_game_lifecycle() {
    let mut game = Game::with_pool(EngineConfig::default().with_seed(12345)).unwrap();
    assert!(!game.started());
    // Input before start is ignored.
    assert_eq!(game.apply_action(GameAction::Select).unwrap(), None);

    game.start().unwrap();
    assert!(game.started());
    assert!(game.accepts_input());
    assert!(!game.paused());
    assert!(!game.game_over());
    assert_eq!(game.board().grid().occupied(), 64);
    assert_eq!(game.score(), 0);
}

#[test]
fn test_start_board_has_no_matches_and_a_move() {
    for seed in [1, 2, 3, 99, 12345] {
        let game = started(EngineConfig::default().with_seed(seed));
        let grid = game.board().grid();
        for pos in grid.positions() {
            assert!(!is_part_of_match(grid, pos), "seed {seed}: match at {pos}");
        }
        assert!(tui_match3::core::find_hint(grid).is_some(), "seed {seed}");
    }
}

#[test]
fn test_hinted_swap_through_the_cursor() {
    let mut game = started(EngineConfig::default().with_seed(12345));
    game.apply_action(GameAction::Hint).unwrap();
    let (a, b) = game.hint().unwrap();

    focus(&mut game, a);
    assert_eq!(game.handle(GameAction::Select).unwrap(), None);
    assert_eq!(game.cursor().selected(), Some(a));

    focus(&mut game, b);
    let outcome = game.handle(GameAction::Select).unwrap().unwrap();
    assert!(matches!(
        outcome,
        SwapOutcome::Matched { .. } | SwapOutcome::ColorClear { .. } | SwapOutcome::FullClear { .. }
    ));
    assert!(game.score() > 0);
    assert_eq!(game.cursor().selected(), None);
    assert_eq!(game.board().grid().occupied(), 64);
    // The settle clears the hint.
    assert_eq!(game.hint(), None);
}

#[test]
fn test_selecting_same_tile_twice_deselects() {
    let mut game = started(EngineConfig::default());
    game.apply_action(GameAction::Select).unwrap();
    assert!(game.cursor().selected().is_some());
    assert_eq!(game.apply_action(GameAction::Select).unwrap(), None);
    assert_eq!(game.cursor().selected(), None);
}

#[test]
fn test_game_pause() {
    let config = EngineConfig {
        time_limit_ms: Some(10_000),
        ..EngineConfig::default()
    };
    let mut game = started(config);
    let focus_before = game.cursor().focus();

    game.apply_action(GameAction::Pause).unwrap();
    assert!(game.paused());
    assert!(!game.accepts_input());

    // Frozen while paused.
    assert!(!game.tick(5_000));
    assert_eq!(game.time_left_ms(), Some(10_000));
    game.apply_action(GameAction::CursorLeft).unwrap();
    assert_eq!(game.cursor().focus(), focus_before);
    assert!(game.snapshot().paused);

    game.apply_action(GameAction::Pause).unwrap();
    assert!(!game.paused());
    assert!(game.tick(1_000));
    assert_eq!(game.time_left_ms(), Some(9_000));
}

#[test]
fn test_time_up_ends_the_round_until_restart() {
    let config = EngineConfig {
        time_limit_ms: Some(3_000),
        ..EngineConfig::default()
    };
    let mut game = started(config);

    assert!(game.tick(3_000));
    assert!(game.game_over());
    assert!(!game.accepts_input());
    assert_eq!(game.apply_action(GameAction::Select).unwrap(), None);
    // Pause does nothing once the round is over.
    game.apply_action(GameAction::Pause).unwrap();
    assert!(!game.paused());

    game.apply_action(GameAction::Restart).unwrap();
    assert!(!game.game_over());
    assert!(game.accepts_input());
    assert_eq!(game.episode_id(), 1);
    assert_eq!(game.time_left_ms(), Some(3_000));
    assert_eq!(game.score(), 0);
}

#[test]
fn test_restart_returns_tiles_to_the_pool() {
    let mut game = started(EngineConfig::default().with_seed(5));
    let capacity = game.board().supply().capacity();

    for _ in 0..3 {
        game.restart().unwrap();
        assert_eq!(game.board().supply().in_use(), 64);
    }
    assert_eq!(game.board().supply().capacity(), capacity);
    assert_eq!(game.episode_id(), 3);
}

#[test]
fn test_hint_appears_after_idle_delay() {
    let mut game = started(EngineConfig::default());
    let delay = game.board().config().hint_delay_ms;

    game.tick(delay - 1);
    assert_eq!(game.hint(), None);
    assert!(game.tick(1));
    assert!(game.hint().is_some());
    assert_eq!(game.snapshot().hint, game.hint());
}

#[test]
fn test_combo_multiplier_decays() {
    let mut score = ScoreEngine::default();

    assert_eq!(score.add_score(9), 9);
    assert_eq!(score.multiplier(), 1);
    assert_eq!(score.add_score(9), 18);
    assert_eq!(score.multiplier(), 2);
    assert_eq!(score.score(), 27);

    let window = score.window_ms();
    assert!(window < 2_000);
    assert!(!score.tick(window - 1));
    assert_eq!(score.multiplier(), 2);
    assert!(score.tick(1));
    assert_eq!(score.multiplier(), 0);
    // The score itself never decays.
    assert_eq!(score.score(), 27);
}

#[test]
fn test_deadlocked_board_is_cleared_on_start() {
    // After one clear the refill lays out "aab / cda / dcd" bottom-up, which has a move.
    let supply = SequenceSupply::new(6, &[0, 0, 1, 2, 3, 0, 3, 2, 3]);
    let board = Board::from_layout(EngineConfig::default(), supply, &["cdc", "aba", "dcd"]).unwrap();
    let mut game = Game::new(board);

    game.start().unwrap();
    let destroyed = game
        .board()
        .events()
        .iter()
        .filter(|e| matches!(e, BoardEvent::Destroyed { .. }))
        .count();
    assert_eq!(destroyed, 9);
    assert_eq!(game.board().to_layout(), vec!["dcd", "cda", "aab"]);
    // The clear does not count toward the round.
    assert_eq!(game.score(), 0);
    assert_eq!(game.board().score().multiplier(), 0);
    assert!(tui_match3::core::find_hint(game.board().grid()).is_some());
}

#[test]
fn test_exhausted_pool_is_reported() {
    let config = EngineConfig::default();
    let pool = TilePool::new(config.kinds, 10, 1);
    let mut board = Board::new(config, pool).unwrap();

    assert_eq!(
        board.populate(false),
        Err(EngineError::Supply(SupplyError::Exhausted {
            capacity: 10,
            in_use: 10
        }))
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = EngineConfig::default().with_size(2, 8);
    assert!(matches!(Game::with_pool(config), Err(EngineError::Config(_))));

    let config = EngineConfig {
        kinds: 1,
        ..EngineConfig::default()
    };
    assert!(matches!(config.validate(), Err(EngineError::Config(_))));
}
