use std::sync::Arc;
use xiangqi_core::engine::config::EngineConfig;
use xiangqi_core::engine::eval::SimpleEvaluator;
use xiangqi_core::engine::search::WIN_SCORE;
use xiangqi_core::engine::{Evaluator, MoveSource, SearchLimit, Searcher};
use xiangqi_core::{AlphaBetaEngine, Board, Color, EngineError, History, MoveGenerator, PieceType, Position};

fn search_config() -> Arc<EngineConfig> {
    Arc::new(EngineConfig {
        book_max_plies: 0,
        rng_seed: Some(17),
        tt_size_mb: 1,
        ..EngineConfig::default()
    })
}

/// Plain full-width negamax with the same terminal rules as the engine.
fn minimax(pos: &mut Position, depth: u8, side: Color, eval: &SimpleEvaluator) -> i32 {
    let win = WIN_SCORE + i32::from(depth);
    if pos.board().king_square(side).is_none() {
        return -win;
    }
    if pos.board().king_square(side.opposite()).is_none() {
        return win;
    }
    if depth == 0 {
        return side.sign() * eval.evaluate(pos.board());
    }

    let moves = MoveGenerator::new().legal_moves(pos.board(), side, pos.history());
    if moves.is_empty() {
        return -win;
    }
    moves
        .into_iter()
        .map(|mv| {
            let mut child = pos.scoped(mv);
            -minimax(&mut child, depth - 1, side.opposite(), eval)
        })
        .max()
        .unwrap_or(-win)
}

fn positions() -> Vec<(Board, Color)> {
    let mut out = vec![(Board::new(), Color::Red)];
    for fen in [
        "4k4/9/9/9/9/9/9/9/R8/3K4R w",
        "3k5/4a4/4b4/2r6/9/2P3n2/9/4C4/4A4/4K4 b",
        "2bak4/4a4/4b4/p7p/2h1c4/4P4/P1C5P/4B4/4A4/2BAK1H2 w",
    ] {
        out.push(Board::from_fen(fen).unwrap());
    }
    out
}

#[test]
fn test_alpha_beta_matches_minimax() {
    let config = search_config();
    let eval = SimpleEvaluator::new(config.clone());

    for (board, side) in positions() {
        let max_depth = if board == Board::new() { 2 } else { 3 };
        for depth in 1..=max_depth {
            let mut pos = Position::new(board.clone(), History::new());
            let expected = side.sign() * minimax(&mut pos, depth, side, &eval);

            let mut engine = AlphaBetaEngine::new(config.clone());
            let outcome = engine
                .choose_move(&board, side, &History::new(), SearchLimit::Depth(depth))
                .unwrap();
            assert_eq!(
                outcome.value,
                expected,
                "{} at depth {depth}",
                board.to_fen_string(side)
            );
            assert_eq!(outcome.stats.depth, depth);
        }
    }
}

#[test]
fn test_chosen_moves_are_legal_over_a_game() {
    let mut engine = AlphaBetaEngine::new(search_config());
    let generator = MoveGenerator::new();
    let mut pos = Position::new(Board::new(), History::new());
    let mut side = Color::Red;

    for _ in 0..16 {
        let legal = generator.legal_moves(pos.board(), side, pos.history());
        if legal.is_empty() {
            break;
        }
        let outcome = engine
            .choose_move(pos.board(), side, pos.history(), SearchLimit::Depth(2))
            .unwrap();
        assert!(legal.contains(&outcome.mv), "{} not legal", outcome.mv);
        pos.apply(outcome.mv);
        side = side.opposite();
    }
}

#[test]
fn test_mate_in_two_needs_depth_four() {
    let (board, side) = Board::from_fen("4k4/9/9/9/9/9/9/9/R8/3K4R w").unwrap();

    let shallow = AlphaBetaEngine::new(search_config())
        .choose_move(&board, side, &History::new(), SearchLimit::Depth(3))
        .unwrap();
    assert!(shallow.value < WIN_SCORE);

    let deep = AlphaBetaEngine::new(search_config())
        .choose_move(&board, side, &History::new(), SearchLimit::Depth(4))
        .unwrap();
    assert!(deep.value >= WIN_SCORE, "value {}", deep.value);
}

#[test]
fn test_missing_enemy_general_is_a_win_at_any_depth() {
    let mut board = Board::empty();
    board.add_piece(0, 4, PieceType::General, Color::Red);
    board.add_piece(3, 3, PieceType::Horse, Color::Red);

    for depth in 1..=3 {
        let outcome = AlphaBetaEngine::new(search_config())
            .choose_move(&board, Color::Red, &History::new(), SearchLimit::Depth(depth))
            .unwrap();
        assert!(outcome.value >= WIN_SCORE);
    }
}

#[test]
fn test_tiny_time_budget_still_moves() {
    let board = Board::new();
    let legal = MoveGenerator::new().legal_moves(&board, Color::Red, &History::new());

    let outcome = AlphaBetaEngine::new(search_config())
        .choose_move(&board, Color::Red, &History::new(), SearchLimit::Time(0))
        .unwrap();
    assert!(legal.contains(&outcome.mv));
    assert!(outcome.stats.timed_out);
    assert_ne!(outcome.source, MoveSource::Book);
}

#[test]
fn test_no_moves_is_an_error() {
    let mut board = Board::empty();
    board.add_piece(0, 4, PieceType::General, Color::Red);
    board.add_piece(9, 4, PieceType::General, Color::Black);
    board.add_piece(9, 0, PieceType::Chariot, Color::Red);
    board.add_piece(8, 4, PieceType::Soldier, Color::Black);

    let result = AlphaBetaEngine::new(search_config()).choose_move(
        &board,
        Color::Black,
        &History::new(),
        SearchLimit::Depth(2),
    );
    assert!(matches!(result, Err(EngineError::NoLegalMoves(Color::Black))));
}
