use crate::error::EngineError;
use crate::logic::board::{Board, BoardCoordinate, Color};
use crate::logic::history::History;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod book;
pub mod clock;
pub mod config;
pub mod eval;
pub mod ordering;
pub mod random;
pub mod search;
pub mod tt;
pub mod zobrist;

/// A move between two squares; what it captures is read off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Move {
    pub from_row: u8,
    pub from_col: u8,
    pub to_row: u8,
    pub to_col: u8,
}

impl Move {
    pub const fn new(from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> Self {
        Self {
            from_row,
            from_col,
            to_row,
            to_col,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn between(from: BoardCoordinate, to: BoardCoordinate) -> Self {
        Self::new(from.row as u8, from.col as u8, to.row as u8, to.col as u8)
    }

    pub const fn from(&self) -> BoardCoordinate {
        BoardCoordinate {
            row: self.from_row as usize,
            col: self.from_col as usize,
        }
    }

    pub const fn to(&self) -> BoardCoordinate {
        BoardCoordinate {
            row: self.to_row as usize,
            col: self.to_col as usize,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})->({},{})",
            self.from_row, self.from_col, self.to_row, self.to_col
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(u64), // milliseconds
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
    /// The deadline hit before the last iteration finished.
    pub timed_out: bool,
}

/// Where a chosen move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSource {
    Book,
    Search,
    /// The search result was unusable and a random legal move was played.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub mv: Move,
    /// Score from red's point of view; zero for book and fallback moves.
    pub value: i32,
    pub source: MoveSource,
    pub stats: SearchStats,
}

pub trait Evaluator {
    /// Static score from red's point of view.
    fn evaluate(&self, board: &Board) -> i32;
}

pub trait Searcher {
    /// Picks a legal move for `side`. Errors only when there is none.
    fn choose_move(
        &mut self,
        board: &Board,
        side: Color,
        history: &History,
        limit: SearchLimit,
    ) -> Result<SearchOutcome, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_display_and_coords() {
        let mv = Move::new(2, 1, 2, 4);
        assert_eq!(mv.to_string(), "(2,1)->(2,4)");
        assert_eq!(Move::between(mv.from(), mv.to()), mv);
    }

    #[test]
    fn test_move_serde() {
        let mv = Move::new(0, 1, 2, 2);
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, r#"{"from_row":0,"from_col":1,"to_row":2,"to_col":2}"#);
        assert_eq!(serde_json::from_str::<Move>(&json).unwrap(), mv);
    }
}
