use crate::engine::Move;
use crate::logic::board::Color;
use thiserror::Error;

/// Errors surfaced by the core.
///
/// Rule outcomes (an empty move list, a finished game) are ordinary values;
/// only requests the core cannot honour and broken persisted tables end up
/// here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller asked for a move outside the legal set.
    #[error("illegal move requested: {0}")]
    IllegalMoveRequested(Move),

    /// The side to move has no legal move; the game is over.
    #[error("{0:?} has no legal moves")]
    NoLegalMoves(Color),

    /// A persisted table was keyed with different Zobrist constants.
    #[error("hash table fingerprint mismatch: expected {expected:#018x}, found {found:#018x}")]
    HashTableMismatch { expected: u64, found: u64 },

    #[error("corrupt persisted table: {0}")]
    CorruptTable(String),

    #[error("invalid piece tag {0}")]
    InvalidPieceTag(i8),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("game is already over")]
    GameOver,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
