//! Xiangqi rule engine and alpha-beta search.
//!
//! `logic` holds the board, move legality and game adjudication; `engine`
//! holds evaluation, hashing, the transposition table, the opening book and
//! the search itself.

pub mod engine;
pub mod error;
pub mod logic;

pub use engine::search::AlphaBetaEngine;
pub use engine::{Move, SearchLimit, SearchOutcome, Searcher};
pub use error::EngineError;
pub use logic::board::{Board, Color, Piece, PieceType};
pub use logic::generator::MoveGenerator;
pub use logic::history::{History, PlyRecord};
pub use logic::position::Position;
