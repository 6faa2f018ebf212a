use xiangqi_core::engine::Move;
use xiangqi_core::logic::game::{GameState, GameStatus, WinReason};
use xiangqi_core::{Board, Color, History, MoveGenerator, PieceType, Position};

fn legal(board: &Board, side: Color, history: &History) -> Vec<Move> {
    MoveGenerator::new().legal_moves(board, side, history)
}

type Squares = (u8, u8, u8, u8);

// Every legal red move from the standard layout, sorted.
#[rustfmt::skip]
const RED_OPENING_MOVES: [Squares; 44] = [
    (0, 0, 1, 0), (0, 0, 2, 0),
    (0, 1, 2, 0), (0, 1, 2, 2),
    (0, 2, 2, 0), (0, 2, 2, 4),
    (0, 3, 1, 4),
    (0, 4, 1, 4),
    (0, 5, 1, 4),
    (0, 6, 2, 4), (0, 6, 2, 8),
    (0, 7, 2, 6), (0, 7, 2, 8),
    (0, 8, 1, 8), (0, 8, 2, 8),
    (2, 1, 1, 1), (2, 1, 2, 0), (2, 1, 2, 2), (2, 1, 2, 3), (2, 1, 2, 4), (2, 1, 2, 5),
    (2, 1, 2, 6), (2, 1, 3, 1), (2, 1, 4, 1), (2, 1, 5, 1), (2, 1, 6, 1), (2, 1, 9, 1),
    (2, 7, 1, 7), (2, 7, 2, 2), (2, 7, 2, 3), (2, 7, 2, 4), (2, 7, 2, 5), (2, 7, 2, 6),
    (2, 7, 2, 8), (2, 7, 3, 7), (2, 7, 4, 7), (2, 7, 5, 7), (2, 7, 6, 7), (2, 7, 9, 7),
    (3, 0, 4, 0), (3, 2, 4, 2), (3, 4, 4, 4), (3, 6, 4, 6), (3, 8, 4, 8),
];

fn sorted(moves: impl IntoIterator<Item = Squares>) -> Vec<Squares> {
    let mut out: Vec<Squares> = moves.into_iter().collect();
    out.sort_unstable();
    out
}

#[test]
fn test_start_position_move_sets() {
    let board = Board::new();
    let red = legal(&board, Color::Red, &History::new());
    assert_eq!(
        sorted(red.iter().map(|m| (m.from_row, m.from_col, m.to_row, m.to_col))),
        RED_OPENING_MOVES.to_vec()
    );

    // Black's moves are red's reflected across the river
    let black = legal(&board, Color::Black, &History::new());
    assert_eq!(
        sorted(black.iter().map(|m| (9 - m.from_row, m.from_col, 9 - m.to_row, m.to_col))),
        RED_OPENING_MOVES.to_vec()
    );

    let (from_fen, turn) =
        Board::from_fen("rheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RHEAKAEHR w").unwrap();
    assert_eq!(turn, Color::Red);
    assert_eq!(from_fen, board);
}

#[test]
fn test_legal_moves_do_not_touch_board() {
    let (board, _) = Board::from_fen("4k4/9/9/9/9/9/9/9/R8/3K4R w").unwrap();
    let before = board.clone();
    let first = legal(&board, Color::Red, &History::new());
    let second = legal(&board, Color::Red, &History::new());
    assert_eq!(board, before);
    assert_eq!(first, second);
}

fn chase_game() -> Position {
    let mut board = Board::empty();
    board.add_piece(0, 3, PieceType::General, Color::Red);
    board.add_piece(4, 1, PieceType::Chariot, Color::Red);
    board.add_piece(9, 4, PieceType::General, Color::Black);
    board.add_piece(6, 0, PieceType::Soldier, Color::Black);
    let mut pos = Position::new(board, History::new());
    for mv in [
        Move::new(6, 0, 5, 0),
        Move::new(4, 1, 4, 4),
        Move::new(9, 4, 9, 5),
        Move::new(4, 4, 4, 5),
        Move::new(9, 5, 9, 4),
        Move::new(4, 5, 4, 4),
        Move::new(9, 4, 9, 5),
    ] {
        pos.apply(mv);
    }
    pos
}

#[test]
fn test_repeated_check_is_excluded() {
    let pos = chase_game();
    let moves = legal(pos.board(), Color::Red, pos.history());
    assert!(!moves.contains(&Move::new(4, 4, 4, 5)));
    assert!(moves.contains(&Move::new(4, 4, 4, 3)));

    // Without the full lookback the same check is allowed
    let (board, history) = pos.into_parts();
    let short = History::from_records(history.iter().skip(1).copied().collect());
    assert!(legal(&board, Color::Red, &short).contains(&Move::new(4, 4, 4, 5)));
}

#[test]
fn test_checkmated_side_has_no_moves() {
    // Chariot on the back rank, the soldier blocks the only flight square
    let mut board = Board::empty();
    board.add_piece(0, 4, PieceType::General, Color::Red);
    board.add_piece(9, 4, PieceType::General, Color::Black);
    board.add_piece(9, 0, PieceType::Chariot, Color::Red);
    board.add_piece(8, 4, PieceType::Soldier, Color::Black);

    let generator = MoveGenerator::new();
    assert!(generator.is_in_check(&board, Color::Black));
    assert!(legal(&board, Color::Black, &History::new()).is_empty());

    let game = GameState::from_position(board, Color::Black, History::new());
    assert_eq!(
        game.status,
        GameStatus::Won {
            winner: Color::Red,
            reason: WinReason::NoLegalMoves
        }
    );
}

#[test]
fn test_missing_general_ends_game() {
    let mut board = Board::empty();
    board.add_piece(0, 4, PieceType::General, Color::Red);
    board.add_piece(5, 5, PieceType::Chariot, Color::Black);

    let generator = MoveGenerator::new();
    assert!(!generator.is_in_check(&board, Color::Black));
    assert!(legal(&board, Color::Black, &History::new()).is_empty());

    let game = GameState::from_position(board, Color::Red, History::new());
    assert_eq!(
        game.status,
        GameStatus::Won {
            winner: Color::Red,
            reason: WinReason::GeneralCaptured
        }
    );
}

#[test]
fn test_transposed_orders_share_hash() {
    let a = [Move::new(0, 0, 1, 0), Move::new(9, 8, 8, 8), Move::new(0, 8, 1, 8), Move::new(9, 0, 8, 0)];
    let b = [Move::new(0, 8, 1, 8), Move::new(9, 0, 8, 0), Move::new(0, 0, 1, 0), Move::new(9, 8, 8, 8)];

    let mut x = Board::new();
    let mut y = Board::new();
    for mv in &a {
        x.apply_move(mv);
    }
    for mv in &b {
        y.apply_move(mv);
    }
    assert_eq!(x, y);
    assert_eq!(x.zobrist_hash(), y.zobrist_hash());
}
