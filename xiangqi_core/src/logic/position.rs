use crate::engine::Move;
use crate::logic::board::Board;
use crate::logic::history::{History, PlyRecord};
use std::ops::{Deref, DerefMut};

/// A board together with the plies that produced it.
///
/// Moves go through [`Position::apply`] / [`Position::undo`] so the two never
/// drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    board: Board,
    history: History,
}

impl Position {
    pub fn new(board: Board, history: History) -> Self {
        Self { board, history }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn into_parts(self) -> (Board, History) {
        (self.board, self.history)
    }

    /// Applies `mv` and appends its record. The move is not validated.
    pub fn apply(&mut self, mv: Move) -> PlyRecord {
        let captured = self.board.apply_move(&mv);
        let record = PlyRecord::new(mv, captured);
        self.history.push(record);
        record
    }

    /// Reverts `record`, which must be the most recent ply.
    ///
    /// # Panics
    /// If `record` is not the last applied ply.
    pub fn undo(&mut self, record: PlyRecord) {
        let last = self.history.pop();
        assert_eq!(last, Some(record), "undo out of order");
        self.board.undo_move(&record.mv(), record.captured);
    }

    /// Applies `mv` for the lifetime of the returned guard.
    pub fn scoped(&mut self, mv: Move) -> ScopedMove<'_> {
        let record = self.apply(mv);
        ScopedMove { position: self, record }
    }
}

/// Undoes its move when dropped, whichever way the scope is left.
pub struct ScopedMove<'a> {
    position: &'a mut Position,
    record: PlyRecord,
}

impl Deref for ScopedMove<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for ScopedMove<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for ScopedMove<'_> {
    fn drop(&mut self) {
        self.position.undo(self.record);
    }
}
