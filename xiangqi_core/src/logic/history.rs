use crate::engine::Move;
use crate::logic::board::{BoardCoordinate, Piece};
use serde::{Deserialize, Serialize};

/// One applied ply: the move plus whatever it captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlyRecord {
    pub from_row: u8,
    pub from_col: u8,
    pub to_row: u8,
    pub to_col: u8,
    pub captured: Option<Piece>,
}

impl PlyRecord {
    pub const fn new(mv: Move, captured: Option<Piece>) -> Self {
        Self {
            from_row: mv.from_row,
            from_col: mv.from_col,
            to_row: mv.to_row,
            to_col: mv.to_col,
            captured,
        }
    }

    pub const fn mv(&self) -> Move {
        Move::new(self.from_row, self.from_col, self.to_row, self.to_col)
    }

    pub const fn from(&self) -> BoardCoordinate {
        self.mv().from()
    }

    pub const fn to(&self) -> BoardCoordinate {
        self.mv().to()
    }
}

/// Append-only log of applied plies, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    records: Vec<PlyRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<PlyRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: PlyRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<PlyRecord> {
        self.records.pop()
    }

    pub fn last(&self) -> Option<&PlyRecord> {
        self.records.last()
    }

    /// The record `n` plies from the end; `back(1)` is the last one.
    pub fn back(&self, n: usize) -> Option<&PlyRecord> {
        self.records.len().checked_sub(n).and_then(|i| self.records.get(i))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PlyRecord> {
        self.records.iter()
    }

    pub fn plies_since_capture(&self) -> usize {
        self.records
            .iter()
            .rev()
            .take_while(|r| r.captured.is_none())
            .count()
    }
}
