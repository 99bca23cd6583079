//! Match finder tests - runs, branches and boards without matches

use tui_match3::core::{find_hint, Board, EngineConfig, Orientation, SequenceSupply};
use tui_match3::types::Pos;

fn board(rows: &[&str]) -> Board<SequenceSupply> {
    Board::from_layout(EngineConfig::default(), SequenceSupply::new(6, &[4, 5]), rows).unwrap()
}

#[test]
fn test_row_of_three_from_middle() {
    let board = board(&["bcd", "cdb", "aaa"]);

    let m = board.find_match(Pos::new(1, 0)).unwrap();
    assert_eq!(m.count(), 3);
    assert_eq!(m.orientation(), Some(Orientation::Horizontal));
}

#[test]
fn test_column_of_three() {
    let board = board(&["abc", "adc", "abd"]);

    let m = board.find_match(Pos::new(0, 2)).unwrap();
    assert_eq!(m.count(), 3);
    assert_eq!(m.orientation(), Some(Orientation::Vertical));
}

#[test]
fn test_lone_differing_tile_has_no_match() {
    let board = board(&["aaa", "aba", "aaa"]);
    assert!(board.find_match(Pos::new(1, 1)).is_none());
}

#[test]
fn test_edges_without_lines_have_no_match() {
    let board = board(&["aba", "bab", "aba"]);
    for pos in board.grid().positions() {
        assert!(board.find_match(pos).is_none(), "unexpected match at {pos}");
    }
}

#[test]
fn test_t_shape_is_one_match() {
    let board = board(&["aaa", ".a.", ".a."]);

    for seed in [Pos::new(0, 2), Pos::new(1, 2), Pos::new(1, 0)] {
        let m = board.find_match(seed).unwrap();
        assert_eq!(m.count(), 5, "seed {seed}");
        assert_eq!(m.orientation(), Some(Orientation::Both));
    }
}

#[test]
fn test_run_of_five() {
    let board = board(&["bcbcb", "cbcbc", "aaaaa"]);
    let m = board.find_match(Pos::new(4, 0)).unwrap();
    assert_eq!(m.count(), 5);
    assert_eq!(m.orientation(), Some(Orientation::Horizontal));
}

#[test]
fn test_gem_is_never_a_seed() {
    let board = board(&["bcd", "cdb", "*aa"]);
    assert!(board.find_match(Pos::new(0, 0)).is_none());
    // Gems do not extend runs either.
    assert!(board.find_match(Pos::new(1, 0)).is_none());
}

#[test]
fn test_hint_points_at_a_real_move() {
    let board = board(&["bcd", "cab", "aba"]);
    let (a, b) = find_hint(board.grid()).unwrap();
    assert_eq!((a, b), (Pos::new(1, 0), Pos::new(1, 1)));

    let mut board = board;
    let outcome = board.try_swap(a, b).unwrap();
    assert!(!outcome.is_rejected());
    assert!(board.score().score() > 0);
}

#[test]
fn test_no_hint_on_dead_board() {
    let board = board(&["cdc", "aba", "dcd"]);
    assert_eq!(find_hint(board.grid()), None);
}
