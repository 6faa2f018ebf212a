//! Perpetual-chase detection.
//!
//! A move is forbidden when it would be the fourth consecutive check by the
//! same piece shuttling between the same squares. The look-back is bounded:
//! the candidate plus the three preceding checks by that piece, which spans
//! the last five plies of history.

use crate::engine::Move;
use crate::logic::board::{Board, BoardCoordinate, Color, Piece};
use crate::logic::history::{History, PlyRecord};
use crate::logic::rules::can_reach;

/// Histories this short can never hold three prior checks.
pub const CHASE_LOOKBACK: usize = 6;

/// Whether playing `mv` for `side` continues a perpetual check.
///
/// `board` is left untouched; all rollbacks happen on a private copy.
pub fn is_perpetual_chase(board: &Board, history: &History, mv: Move, side: Color) -> bool {
    if history.len() <= CHASE_LOOKBACK {
        return false;
    }
    let Some(piece) = board.piece_at(mv.from()) else {
        return false;
    };
    if piece.color != side {
        return false;
    }

    let mut scratch = board.clone();
    let enemy = side.opposite();

    // The candidate must itself give check
    let captured = scratch.apply_move(&mv);
    let checks_now = checks_from(&scratch, piece, mv.to(), enemy);
    scratch.undo_move(&mv, captured);
    if !checks_now {
        return false;
    }

    let (Some(h1), Some(h2), Some(h3), Some(h4), Some(h5)) = (
        history.back(1),
        history.back(2),
        history.back(3),
        history.back(4),
        history.back(5),
    ) else {
        return false;
    };

    // Opponent's reply undone: the piece was already checking from `from`
    if !rollback(&mut scratch, h1) || scratch.piece_at(mv.from()) != Some(piece) {
        return false;
    }
    if !checks_from(&scratch, piece, mv.from(), enemy) {
        return false;
    }

    // Our previous move must have brought the piece to `from`, checking before it too
    if h2.to() != mv.from() || !rollback(&mut scratch, h2) || !rollback(&mut scratch, h3) {
        return false;
    }
    if !checks_from(&scratch, piece, h2.from(), enemy) {
        return false;
    }

    // And one shuttle further back
    if h4.to() != h2.from() || !rollback(&mut scratch, h4) || !rollback(&mut scratch, h5) {
        return false;
    }
    checks_from(&scratch, piece, h4.from(), enemy)
}

fn checks_from(board: &Board, piece: Piece, from: BoardCoordinate, enemy: Color) -> bool {
    board
        .king_square(enemy)
        .is_some_and(|king| can_reach(board, piece, from, king))
}

/// Undoes `record` on `board`; `false` when the board does not match it.
fn rollback(board: &mut Board, record: &PlyRecord) -> bool {
    let (to, from) = (record.to(), record.from());
    let Some(moved) = board.piece_at(to) else {
        return false;
    };
    if board.is_occupied(from) {
        return false;
    }
    board.set_piece(to.row, to.col, record.captured);
    board.set_piece(from.row, from.col, Some(moved));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::PieceType;
    use crate::logic::position::Position;

    fn chase_position() -> Position {
        let mut board = Board::empty();
        board.add_piece(0, 3, PieceType::General, Color::Red);
        board.add_piece(4, 1, PieceType::Chariot, Color::Red);
        board.add_piece(9, 4, PieceType::General, Color::Black);
        board.add_piece(6, 0, PieceType::Soldier, Color::Black);
        let mut pos = Position::new(board, History::new());
        let script = [
            Move::new(6, 0, 5, 0),
            Move::new(4, 1, 4, 4),
            Move::new(9, 4, 9, 5),
            Move::new(4, 4, 4, 5),
            Move::new(9, 5, 9, 4),
            Move::new(4, 5, 4, 4),
            Move::new(9, 4, 9, 5),
        ];
        for mv in script {
            pos.apply(mv);
        }
        pos
    }

    #[test]
    fn test_fourth_check_is_chase() {
        let pos = chase_position();
        assert!(is_perpetual_chase(pos.board(), pos.history(), Move::new(4, 4, 4, 5), Color::Red));
        assert!(!is_perpetual_chase(pos.board(), pos.history(), Move::new(4, 4, 4, 3), Color::Red));
    }

    #[test]
    fn test_short_history_never_chases() {
        let (board, history) = chase_position().into_parts();
        let trimmed = History::from_records(history.iter().skip(1).copied().collect());
        assert_eq!(trimmed.len(), CHASE_LOOKBACK);
        assert!(!is_perpetual_chase(&board, &trimmed, Move::new(4, 4, 4, 5), Color::Red));
    }

    #[test]
    fn test_board_untouched() {
        let pos = chase_position();
        let before = pos.board().clone();
        is_perpetual_chase(pos.board(), pos.history(), Move::new(4, 4, 4, 5), Color::Red);
        assert_eq!(pos.board(), &before);
    }
}
