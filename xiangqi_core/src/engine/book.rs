use crate::engine::zobrist::ZobristTable;
use crate::engine::Move;
use crate::error::EngineError;
use crate::logic::board::{Board, Color, COLS, ROWS};
use crate::logic::history::History;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Candidate moves keyed by position, valid only for the Zobrist table
/// whose fingerprint it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningBook {
    fingerprint: u64,
    entries: HashMap<u64, Vec<Move>>,
}

/// On-disk form.
#[derive(Serialize, Deserialize)]
struct BookFile {
    fingerprint: u64,
    entries: BTreeMap<u64, Vec<Move>>,
}

// Each line: the moves leading to a position, then the candidates there.
const STANDARD_LINES: &[(&[(u8, u8, u8, u8)], &[(u8, u8, u8, u8)])] = &[
    // Start position: central cannon, elephant, third/seventh pawn, horse
    (
        &[],
        &[
            (2, 1, 2, 4),
            (2, 7, 2, 4),
            (0, 2, 2, 4),
            (0, 6, 2, 4),
            (3, 2, 4, 2),
            (3, 6, 4, 6),
            (0, 1, 2, 2),
            (0, 7, 2, 6),
        ],
    ),
    // Against the central cannon: screen horses or a cannon of our own
    (&[(2, 1, 2, 4)], &[(9, 1, 7, 2), (9, 7, 7, 6), (7, 7, 7, 4)]),
    (&[(2, 7, 2, 4)], &[(9, 1, 7, 2), (9, 7, 7, 6), (7, 1, 7, 4)]),
    (&[(0, 2, 2, 4)], &[(9, 1, 7, 2), (9, 7, 7, 6), (6, 2, 5, 2)]),
    (&[(0, 6, 2, 4)], &[(9, 1, 7, 2), (9, 7, 7, 6), (6, 6, 5, 6)]),
    (&[(3, 2, 4, 2)], &[(6, 2, 5, 2), (9, 1, 7, 2)]),
    (&[(3, 6, 4, 6)], &[(6, 6, 5, 6), (9, 7, 7, 6)]),
    (&[(0, 1, 2, 2)], &[(9, 1, 7, 2), (6, 2, 5, 2)]),
    (&[(0, 7, 2, 6)], &[(9, 7, 7, 6), (6, 6, 5, 6)]),
    // Central cannon followed up with a horse
    (&[(2, 1, 2, 4), (9, 1, 7, 2)], &[(0, 1, 2, 2), (0, 7, 2, 6)]),
    (&[(2, 1, 2, 4), (9, 7, 7, 6)], &[(0, 1, 2, 2), (0, 7, 2, 6)]),
    (&[(2, 7, 2, 4), (9, 1, 7, 2)], &[(0, 7, 2, 6), (0, 1, 2, 2)]),
    (&[(2, 7, 2, 4), (9, 7, 7, 6)], &[(0, 7, 2, 6), (0, 1, 2, 2)]),
];

impl OpeningBook {
    pub fn empty(table: &ZobristTable) -> Self {
        Self {
            fingerprint: table.fingerprint(),
            entries: HashMap::new(),
        }
    }

    /// Built-in book for the first plies, keyed with the global table.
    pub fn standard() -> Self {
        let table = ZobristTable::global();
        let mut book = Self::empty(table);

        for (line, candidates) in STANDARD_LINES {
            let mut board = Board::new();
            let mut side = Color::Red;
            for &(fr, fc, tr, tc) in *line {
                board.apply_move(&Move::new(fr, fc, tr, tc));
                side = side.opposite();
            }
            let moves = candidates
                .iter()
                .map(|&(fr, fc, tr, tc)| Move::new(fr, fc, tr, tc))
                .collect();
            book.insert(Self::key(table, &board, side), moves);
        }
        book
    }

    /// Parses the persisted format, rejecting books built for other tables.
    pub fn from_json(json: &str, table: &ZobristTable) -> Result<Self, EngineError> {
        let file: BookFile =
            serde_json::from_str(json).map_err(|e| EngineError::CorruptTable(e.to_string()))?;

        let expected = table.fingerprint();
        if file.fingerprint != expected {
            return Err(EngineError::HashTableMismatch {
                expected,
                found: file.fingerprint,
            });
        }

        for (key, moves) in &file.entries {
            if let Some(bad) = moves.iter().find(|m| !on_board(m)) {
                return Err(EngineError::CorruptTable(format!(
                    "entry {key} holds off-board move {bad}"
                )));
            }
        }

        Ok(Self {
            fingerprint: file.fingerprint,
            entries: file.entries.into_iter().collect(),
        })
    }

    /// Records the move played at each position over the first `max_plies`
    /// plies of games that began from the standard layout.
    pub fn from_games(games: &[History], max_plies: usize, table: &ZobristTable) -> Self {
        let mut book = Self::empty(table);
        for (n, game) in games.iter().enumerate() {
            let mut board = Board::new();
            let mut side = Color::Red;
            for record in game.iter().take(max_plies) {
                let mv = record.mv();
                if board.piece_at(mv.from()).map(|p| p.color) != Some(side) {
                    warn!("game {n} does not replay from the start position at {mv}, ignoring the rest");
                    break;
                }
                let moves = book.entries.entry(Self::key(table, &board, side)).or_default();
                if !moves.contains(&mv) {
                    moves.push(mv);
                }
                board.apply_move(&mv);
                side = side.opposite();
            }
        }
        book
    }

    pub fn from_path(path: impl AsRef<Path>, table: &ZobristTable) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json, table)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        let file = BookFile {
            fingerprint: self.fingerprint,
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| EngineError::CorruptTable(e.to_string()))
    }

    pub fn key(table: &ZobristTable, board: &Board, side: Color) -> u64 {
        table.position_key(table.hash(board), side)
    }

    pub fn insert(&mut self, key: u64, moves: Vec<Move>) {
        self.entries.insert(key, moves);
    }

    /// Candidates for `side` to move on `board`; empty when out of book.
    pub fn lookup(&self, board: &Board, side: Color) -> &[Move] {
        let key = Self::key(ZobristTable::global(), board, side);
        self.entries.get(&key).map_or(&[], Vec::as_slice)
    }

    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn on_board(mv: &Move) -> bool {
    let rows = 0..ROWS as u8;
    let cols = 0..COLS as u8;
    rows.contains(&mv.from_row)
        && rows.contains(&mv.to_row)
        && cols.contains(&mv.from_col)
        && cols.contains(&mv.to_col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::generator::MoveGenerator;
    use crate::logic::history::PlyRecord;
    use crate::logic::position::Position;

    #[test]
    fn test_standard_book_moves_are_legal() {
        let book = OpeningBook::standard();
        let generator = MoveGenerator::new();
        assert_eq!(book.len(), STANDARD_LINES.len());

        for (line, _) in STANDARD_LINES {
            let mut board = Board::new();
            let mut side = Color::Red;
            for &(fr, fc, tr, tc) in *line {
                board.apply_move(&Move::new(fr, fc, tr, tc));
                side = side.opposite();
            }
            let legal = generator.legal_moves(&board, side, &History::new());
            let candidates = book.lookup(&board, side);
            assert!(!candidates.is_empty());
            assert!(candidates.iter().all(|m| legal.contains(m)), "line {line:?}");
        }
    }

    #[test]
    fn test_json_round_trip() {
        let book = OpeningBook::standard();
        let json = book.to_json().unwrap();
        let back = OpeningBook::from_json(&json, ZobristTable::global()).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn test_fingerprint_mismatch() {
        let other = ZobristTable::with_seed(1);
        let json = OpeningBook::empty(&other).to_json().unwrap();
        let err = OpeningBook::from_json(&json, ZobristTable::global()).unwrap_err();
        assert!(matches!(err, EngineError::HashTableMismatch { .. }));
    }

    #[test]
    fn test_corrupt_book() {
        let err = OpeningBook::from_json("not json", ZobristTable::global()).unwrap_err();
        assert!(matches!(err, EngineError::CorruptTable(_)));

        let json = format!(
            r#"{{"fingerprint": {}, "entries": {{"5": [{{"from_row": 12, "from_col": 0, "to_row": 0, "to_col": 0}}]}}}}"#,
            ZobristTable::global().fingerprint()
        );
        let err = OpeningBook::from_json(&json, ZobristTable::global()).unwrap_err();
        assert!(matches!(err, EngineError::CorruptTable(_)));
    }

    #[test]
    fn test_out_of_book() {
        let book = OpeningBook::standard();
        let mut board = Board::new();
        board.apply_move(&Move::new(0, 0, 1, 0));
        assert!(book.lookup(&board, Color::Black).is_empty());
        // Same placement, wrong side to move
        assert!(book.lookup(&Board::new(), Color::Black).is_empty());
    }

    fn played(line: &[Move]) -> History {
        let mut pos = Position::default();
        for mv in line {
            pos.apply(*mv);
        }
        pos.into_parts().1
    }

    #[test]
    fn test_book_from_played_games() {
        let games = [
            played(&[Move::new(2, 1, 2, 4), Move::new(9, 1, 7, 2), Move::new(0, 1, 2, 2)]),
            played(&[Move::new(2, 1, 2, 4), Move::new(9, 7, 7, 6)]),
            played(&[Move::new(3, 2, 4, 2)]),
        ];
        let table = ZobristTable::global();
        let built = OpeningBook::from_games(&games, 2, table);
        let book = OpeningBook::from_json(&built.to_json().unwrap(), table).unwrap();
        assert_eq!(book, built);
        assert_eq!(book.len(), 2);

        assert_eq!(
            book.lookup(&Board::new(), Color::Red),
            &[Move::new(2, 1, 2, 4), Move::new(3, 2, 4, 2)]
        );
        let mut board = Board::new();
        board.apply_move(&Move::new(2, 1, 2, 4));
        assert_eq!(
            book.lookup(&board, Color::Black),
            &[Move::new(9, 1, 7, 2), Move::new(9, 7, 7, 6)]
        );
        // Third ply is past the limit
        board.apply_move(&Move::new(9, 1, 7, 2));
        assert!(book.lookup(&board, Color::Red).is_empty());
    }

    #[test]
    fn test_foreign_game_is_not_recorded() {
        let other_start = History::from_records(vec![PlyRecord::new(Move::new(4, 4, 5, 4), None)]);
        let book = OpeningBook::from_games(&[other_start], 4, ZobristTable::global());
        assert!(book.is_empty());
    }
}
