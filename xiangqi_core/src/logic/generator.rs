use crate::engine::Move;
use crate::logic::board::{Board, BoardCoordinate, Color, Piece, PieceType};
use crate::logic::history::History;
use crate::logic::repetition::is_perpetual_chase;
use crate::logic::rules::{destinations, is_in_check};

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Every move `side` may legally play. The board and history are only
    /// read; simulation happens on a scratch copy.
    pub fn legal_moves(&self, board: &Board, side: Color, history: &History) -> Vec<Move> {
        let pseudo = self.pseudo_legal_moves(board, side);
        let mut scratch = board.clone();
        let mut moves = Vec::with_capacity(pseudo.len());

        for mv in pseudo {
            if leaves_general_safe(&mut scratch, mv, side)
                && !is_perpetual_chase(board, history, mv, side)
            {
                moves.push(mv);
            }
        }

        debug_assert_eq!(&scratch, board, "scratch board not restored");
        moves
    }

    /// Destinations allowed by each piece's movement pattern, before the
    /// self-check and perpetual-chase filters. The general's moves come last.
    pub fn pseudo_legal_moves(&self, board: &Board, side: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        let mut targets = Vec::with_capacity(17);
        let mut general: Option<(BoardCoordinate, Piece)> = None;

        for (from, piece) in board.pieces_of(side) {
            if piece.piece_type == PieceType::General {
                general = Some((from, piece));
                continue;
            }
            push_piece_moves(board, piece, from, &mut targets, &mut moves);
        }
        if let Some((from, piece)) = general {
            push_piece_moves(board, piece, from, &mut targets, &mut moves);
        }

        moves
    }

    /// Checks if the side has at least one legal move.
    /// Returns as soon as a valid move is found.
    pub fn has_legal_moves(&self, board: &Board, side: Color, history: &History) -> bool {
        let mut scratch = board.clone();
        self.pseudo_legal_moves(board, side).into_iter().any(|mv| {
            leaves_general_safe(&mut scratch, mv, side) && !is_perpetual_chase(board, history, mv, side)
        })
    }

    pub fn is_in_check(&self, board: &Board, side: Color) -> bool {
        is_in_check(board, side)
    }
}

fn push_piece_moves(
    board: &Board,
    piece: Piece,
    from: BoardCoordinate,
    targets: &mut Vec<BoardCoordinate>,
    moves: &mut Vec<Move>,
) {
    targets.clear();
    destinations(board, piece, from, targets);
    moves.extend(targets.iter().map(|&to| Move::between(from, to)));
}

/// Apply on scratch, look for an attack on our own general, undo.
fn leaves_general_safe(scratch: &mut Board, mv: Move, side: Color) -> bool {
    let captured = scratch.apply_move(&mv);
    let safe = !is_in_check(scratch, side);
    scratch.undo_move(&mv, captured);
    safe
}
