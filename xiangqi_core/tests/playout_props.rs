use proptest::prelude::*;
use xiangqi_core::engine::zobrist::ZobristTable;
use xiangqi_core::logic::rules::is_in_check;
use xiangqi_core::{Board, Color, History, MoveGenerator, Position};

/// Plays up to `choices.len()` plies, picking moves by index, and returns
/// the position plus the side to move.
fn playout(choices: &[usize]) -> (Position, Color) {
    let generator = MoveGenerator::new();
    let mut pos = Position::new(Board::new(), History::new());
    let mut side = Color::Red;
    for &choice in choices {
        let moves = generator.legal_moves(pos.board(), side, pos.history());
        if moves.is_empty() {
            break;
        }
        pos.apply(moves[choice % moves.len()]);
        side = side.opposite();
    }
    (pos, side)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_undo_restores_start(choices in prop::collection::vec(any::<usize>(), 0..40)) {
        let (mut pos, _) = playout(&choices);
        while let Some(record) = pos.history().last().copied() {
            pos.undo(record);
        }
        prop_assert_eq!(pos.board(), &Board::new());
        prop_assert!(pos.history().is_empty());
    }

    #[test]
    fn prop_incremental_hash_matches_recompute(choices in prop::collection::vec(any::<usize>(), 0..40)) {
        let (pos, _) = playout(&choices);
        let board = pos.board();
        prop_assert_eq!(board.zobrist_hash(), ZobristTable::global().hash(board));

        let rebuilt = Board::from_tags(&board.to_tags()).unwrap();
        prop_assert_eq!(rebuilt.zobrist_hash(), board.zobrist_hash());
    }

    #[test]
    fn prop_legal_moves_never_expose_own_general(choices in prop::collection::vec(any::<usize>(), 0..30)) {
        let (pos, side) = playout(&choices);
        let mut board = pos.board().clone();
        for mv in MoveGenerator::new().legal_moves(pos.board(), side, pos.history()) {
            let captured = board.apply_move(&mv);
            prop_assert!(!is_in_check(&board, side), "{} leaves {:?} in check", mv, side);
            board.undo_move(&mv, captured);
        }
        prop_assert_eq!(&board, pos.board());
    }
}
