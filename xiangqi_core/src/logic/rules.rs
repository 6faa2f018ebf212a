use crate::logic::board::{Board, BoardCoordinate, Color, Piece, PieceType};
use crate::logic::lookup::{is_own_half, AttackTables};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    NoPieceAtSource,
    NotYourTurn,
    InvalidMovePattern,
    BlockedPath,
    TargetOccupiedByFriendly,
    PalaceRestriction,
    RiverRestriction,
    SelfCheck,
}

/// Checks if a move is valid, including rule logic and self-check prevention.
///
/// Perpetual-chase is a history rule and lives in `logic::repetition`.
pub fn validate_move(
    board: &Board,
    from: BoardCoordinate,
    to: BoardCoordinate,
    turn: Color,
) -> Result<(), MoveError> {
    validate_piece_logic(board, from, to, turn)?;

    let mut next_board = board.clone();
    let mv = crate::engine::Move::between(from, to);
    next_board.apply_move(&mv);

    if is_in_check(&next_board, turn) {
        return Err(MoveError::SelfCheck);
    }

    Ok(())
}

/// Whether `piece`, standing on `from`, has `to` in its movement pattern on
/// this board. The square `from` itself is not inspected, so this also
/// answers "could it have attacked from there" during history rollbacks.
pub fn can_reach(board: &Board, piece: Piece, from: BoardCoordinate, to: BoardCoordinate) -> bool {
    if from == to {
        return false;
    }
    if board.piece_at(to).is_some_and(|p| p.color == piece.color) {
        return false;
    }

    let tables = AttackTables::get();
    let to_sq = to.index();
    let from_sq = from.index();

    match piece.piece_type {
        PieceType::General => {
            tables.general_steps(piece.color, from_sq).contains(&to_sq)
                || is_flying_capture(board, piece.color, from, to)
        }
        PieceType::Advisor => tables.advisor_steps(piece.color, from_sq).contains(&to_sq),
        PieceType::Soldier => tables.soldier_steps(piece.color, from_sq).contains(&to_sq),
        PieceType::Elephant => tables
            .elephant_steps(piece.color, from_sq)
            .iter()
            .any(|s| s.target == to_sq && board.get_piece_sq(s.block).is_none()),
        PieceType::Horse => tables
            .horse_steps(from_sq)
            .iter()
            .any(|s| s.target == to_sq && board.get_piece_sq(s.block).is_none()),
        PieceType::Chariot => {
            (from.row == to.row || from.col == to.col) && board.count_between(from, to) == 0
        }
        PieceType::Cannon => {
            if from.row != to.row && from.col != to.col {
                return false;
            }
            let screens = board.count_between(from, to);
            if board.is_occupied(to) {
                screens == 1
            } else {
                screens == 0
            }
        }
    }
}

/// The general captures the enemy general along an open file.
fn is_flying_capture(board: &Board, color: Color, from: BoardCoordinate, to: BoardCoordinate) -> bool {
    from.col == to.col
        && board.piece_at(to) == Some(Piece::new(PieceType::General, color.opposite()))
        && board.count_between(from, to) == 0
}

/// Pseudo-legal destinations of `piece` on `from`, friendly squares excluded.
pub fn destinations(board: &Board, piece: Piece, from: BoardCoordinate, out: &mut Vec<BoardCoordinate>) {
    let tables = AttackTables::get();
    let from_sq = from.index();
    let color = piece.color;
    let open = |sq: usize| board.get_piece_sq(sq).map_or(true, |p| p.color != color);

    let mut push = |sq: usize| {
        if open(sq) {
            out.push(BoardCoordinate::from_index(sq));
        }
    };

    match piece.piece_type {
        PieceType::General => {
            tables.general_steps(color, from_sq).iter().copied().for_each(&mut push);
            if let Some(enemy) = board.king_square(color.opposite()) {
                if is_flying_capture(board, color, from, enemy) {
                    push(enemy.index());
                }
            }
        }
        PieceType::Advisor => tables.advisor_steps(color, from_sq).iter().copied().for_each(&mut push),
        PieceType::Soldier => tables.soldier_steps(color, from_sq).iter().copied().for_each(&mut push),
        PieceType::Elephant => tables
            .elephant_steps(color, from_sq)
            .iter()
            .filter(|s| board.get_piece_sq(s.block).is_none())
            .for_each(|s| push(s.target)),
        PieceType::Horse => tables
            .horse_steps(from_sq)
            .iter()
            .filter(|s| board.get_piece_sq(s.block).is_none())
            .for_each(|s| push(s.target)),
        PieceType::Chariot => tables.rook_targets(board, from).for_each(&mut push),
        PieceType::Cannon => tables.cannon_targets(board, from).for_each(&mut push),
    }
}

/// Checks if the `color` is currently in check. A side without a general is
/// never "in check"; the search treats that case as a lost game instead.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.king_square(color) else {
        return false;
    };
    is_attacked_by(board, king, color.opposite())
}

/// Whether any piece of `attacker` has `target` in its pattern.
pub fn is_attacked_by(board: &Board, target: BoardCoordinate, attacker: Color) -> bool {
    board
        .pieces_of(attacker)
        .any(|(from, piece)| can_reach(board, piece, from, target))
}

/// Validates the geometry and specific rules for a piece move, IGNORING self-check.
fn validate_piece_logic(
    board: &Board,
    from: BoardCoordinate,
    to: BoardCoordinate,
    turn: Color,
) -> Result<(), MoveError> {
    let piece = board.piece_at(from).ok_or(MoveError::NoPieceAtSource)?;

    if piece.color != turn {
        return Err(MoveError::NotYourTurn);
    }

    if from == to {
        return Err(MoveError::InvalidMovePattern);
    }

    if let Some(target) = board.piece_at(to) {
        if target.color == piece.color {
            return Err(MoveError::TargetOccupiedByFriendly);
        }
    }

    if can_reach(board, piece, from, to) {
        return Ok(());
    }

    // Work out the most specific reason for the rejection
    let d_row = to.row.abs_diff(from.row);
    let d_col = to.col.abs_diff(from.col);
    let err = match piece.piece_type {
        PieceType::General if d_row + d_col == 1 => MoveError::PalaceRestriction,
        PieceType::Advisor if d_row == 1 && d_col == 1 => MoveError::PalaceRestriction,
        PieceType::Elephant if d_row == 2 && d_col == 2 => {
            if is_own_half(piece.color, to.row) {
                MoveError::BlockedPath
            } else {
                MoveError::RiverRestriction
            }
        }
        PieceType::Horse if (d_row == 2 && d_col == 1) || (d_row == 1 && d_col == 2) => {
            MoveError::BlockedPath
        }
        PieceType::Chariot | PieceType::Cannon if from.row == to.row || from.col == to.col => {
            MoveError::BlockedPath
        }
        PieceType::Soldier if d_row + d_col == 1 && from.row == to.row => MoveError::RiverRestriction,
        _ => MoveError::InvalidMovePattern,
    };
    Err(err)
}
