use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tui_match3::core::{find_hint, Board, EngineConfig, Game, TilePool};
use tui_match3::types::{GameAction, Pos};

fn seeded_board(seed: u32) -> Board<TilePool> {
    let config = EngineConfig::default().with_seed(seed);
    let pool = TilePool::new(config.kinds, config.pool_capacity(), seed);
    let mut board = Board::new(config, pool).expect("default config is valid");
    board.populate(false).expect("pool holds a full board");
    board.take_events();
    board
}

fn bench_find_match(c: &mut Criterion) {
    let board = seeded_board(12345);

    c.bench_function("find_match_every_cell", |b| {
        b.iter(|| {
            for pos in board.grid().positions() {
                black_box(board.find_match(black_box(pos)));
            }
        })
    });
}

fn bench_find_hint(c: &mut Criterion) {
    let board = seeded_board(12345);

    c.bench_function("find_hint", |b| b.iter(|| black_box(find_hint(board.grid()))));
}

fn bench_clear_and_cascade(c: &mut Criterion) {
    c.bench_function("match_everything_then_cascade", |b| {
        b.iter_batched(
            || seeded_board(777),
            |mut board| {
                board.match_everything().expect("clear");
                let report = board.cascade().expect("cascade");
                board.take_events();
                black_box(report)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_game_tick(c: &mut Criterion) {
    let mut game = Game::with_pool(EngineConfig::default().with_seed(12345)).expect("game");
    game.start().expect("start");

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            black_box(game.tick(black_box(16)));
        })
    });
}

fn bench_hint_swap(c: &mut Criterion) {
    c.bench_function("play_hinted_swap", |b| {
        b.iter_batched(
            || {
                let mut game = Game::with_pool(EngineConfig::default().with_seed(99)).expect("game");
                game.start().expect("start");
                game.board_mut().take_events();
                game
            },
            |mut game| {
                game.apply_action(GameAction::Hint).expect("hint");
                let (a, b) = game.hint().unwrap_or((Pos::new(0, 0), Pos::new(1, 0)));
                let request = tui_match3::core::SwapRequest { first: a, second: b };
                black_box(game.play_swap(request).expect("swap"))
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_find_match,
    bench_find_hint,
    bench_clear_and_cascade,
    bench_game_tick,
    bench_hint_swap
);
criterion_main!(benches);
