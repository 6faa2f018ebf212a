use crate::engine::Move;
use crate::error::EngineError;
use crate::logic::board::{Board, Color};
use crate::logic::generator::MoveGenerator;
use crate::logic::history::{History, PlyRecord};
use crate::logic::position::Position;
use log::info;
use serde::{Deserialize, Serialize};

/// Consecutive plies without a capture after which the game is drawn.
pub const NO_CAPTURE_DRAW_PLIES: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// The loser had no legal move on their turn.
    NoLegalMoves,
    /// The loser's general is gone from the board.
    GeneralCaptured,
    /// The loser submitted an illegal move or ran out of time.
    Forfeit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won { winner: Color, reason: WinReason },
    Draw,
}

#[derive(Debug, Clone)]
pub struct GameState {
    position: Position,
    pub turn: Color,
    pub status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Board::new(), Color::Red, History::new())
    }

    /// Resumes a game from an arbitrary position.
    #[must_use]
    pub fn from_position(board: Board, turn: Color, history: History) -> Self {
        let mut state = Self {
            position: Position::new(board, history),
            turn,
            status: GameStatus::Playing,
        };
        state.update_status();
        state
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn history(&self) -> &History {
        self.position.history()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        MoveGenerator::new().legal_moves(self.board(), self.turn, self.history())
    }

    /// Plays `mv` for the side to move and re-adjudicates.
    pub fn make_move(&mut self, mv: Move) -> Result<PlyRecord, EngineError> {
        if self.status != GameStatus::Playing {
            return Err(EngineError::GameOver);
        }
        if !self.legal_moves().contains(&mv) {
            return Err(EngineError::IllegalMoveRequested(mv));
        }

        let record = self.position.apply(mv);
        self.turn = self.turn.opposite();
        self.update_status();
        Ok(record)
    }

    /// `side` loses immediately.
    pub fn forfeit(&mut self, side: Color) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Won {
                winner: side.opposite(),
                reason: WinReason::Forfeit,
            };
            info!("{side:?} forfeits");
        }
    }

    /// Reverts the last ply; the game is back in play afterwards.
    pub fn undo_move(&mut self) -> Option<PlyRecord> {
        let record = *self.position.history().last()?;
        self.position.undo(record);
        self.turn = self.turn.opposite();
        self.status = GameStatus::Playing;
        Some(record)
    }

    fn update_status(&mut self) {
        let side = self.turn;
        let status = if self.board().king_square(side).is_none() {
            GameStatus::Won {
                winner: side.opposite(),
                reason: WinReason::GeneralCaptured,
            }
        } else if self.history().plies_since_capture() >= NO_CAPTURE_DRAW_PLIES {
            GameStatus::Draw
        } else if !MoveGenerator::new().has_legal_moves(self.board(), side, self.history()) {
            GameStatus::Won {
                winner: side.opposite(),
                reason: WinReason::NoLegalMoves,
            }
        } else {
            GameStatus::Playing
        };

        if status != GameStatus::Playing && self.status == GameStatus::Playing {
            info!("game over after {} plies: {status:?}", self.history().len());
        }
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::PieceType;

    #[test]
    fn test_make_move_switches_turn() {
        let mut game = GameState::new();
        let record = game.make_move(Move::new(2, 1, 2, 4)).unwrap();
        assert!(record.captured.is_none());
        assert_eq!(game.turn, Color::Black);
        assert_eq!(game.status, GameStatus::Playing);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut game = GameState::new();
        let err = game.make_move(Move::new(0, 0, 5, 0)).unwrap_err();
        assert!(matches!(err, EngineError::IllegalMoveRequested(_)));
        // Moving the opponent's piece is illegal too
        assert!(game.make_move(Move::new(6, 0, 5, 0)).is_err());
        assert_eq!(game.history().len(), 0);
    }

    #[test]
    fn test_checkmate_ends_game() {
        let mut board = Board::empty();
        board.add_piece(0, 4, PieceType::General, Color::Red);
        board.add_piece(9, 4, PieceType::General, Color::Black);
        board.add_piece(5, 0, PieceType::Chariot, Color::Red);
        board.add_piece(8, 4, PieceType::Soldier, Color::Black);
        let mut game = GameState::from_position(board, Color::Red, History::new());

        game.make_move(Move::new(5, 0, 9, 0)).unwrap();
        assert_eq!(
            game.status,
            GameStatus::Won {
                winner: Color::Red,
                reason: WinReason::NoLegalMoves
            }
        );
        assert!(matches!(
            game.make_move(Move::new(8, 4, 7, 4)),
            Err(EngineError::GameOver)
        ));

        game.undo_move();
        assert_eq!(game.status, GameStatus::Playing);
        assert_eq!(game.turn, Color::Red);
    }

    #[test]
    fn test_no_capture_draw() {
        let mut board = Board::empty();
        board.add_piece(0, 3, PieceType::General, Color::Red);
        board.add_piece(9, 5, PieceType::General, Color::Black);
        let mut game = GameState::from_position(board, Color::Red, History::new());

        // Both generals shuffle inside their palaces
        let red = [Move::new(0, 3, 1, 3), Move::new(1, 3, 0, 3)];
        let black = [Move::new(9, 5, 8, 5), Move::new(8, 5, 9, 5)];
        for i in 0..NO_CAPTURE_DRAW_PLIES / 2 {
            assert_eq!(game.status, GameStatus::Playing);
            game.make_move(red[i % 2]).unwrap();
            game.make_move(black[i % 2]).unwrap();
        }
        assert_eq!(game.status, GameStatus::Draw);
    }

    #[test]
    fn test_forfeit() {
        let mut game = GameState::new();
        game.forfeit(Color::Red);
        assert_eq!(
            game.status,
            GameStatus::Won {
                winner: Color::Black,
                reason: WinReason::Forfeit
            }
        );
    }
}
