use crate::engine::zobrist::ZobristTable;
use crate::engine::Move;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};

pub const ROWS: usize = 10;
pub const COLS: usize = 9;
pub const SQUARES: usize = ROWS * COLS;

/// Signed-tag grid as exchanged with orchestrators: `+` red, `-` black, `0` empty.
pub type TagGrid = [[i8; COLS]; ROWS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Black => 1,
        }
    }

    /// +1 for red, -1 for black.
    pub const fn sign(self) -> i32 {
        match self {
            Self::Red => 1,
            Self::Black => -1,
        }
    }
}

/// Discriminants are the tag magnitudes of the signed grid encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Soldier = 1,
    Advisor = 2,
    Elephant = 3,
    Horse = 4,
    Cannon = 5,
    Chariot = 6,
    General = 7,
}

impl PieceType {
    pub const ALL: [Self; 7] = [
        Self::Soldier,
        Self::Advisor,
        Self::Elephant,
        Self::Horse,
        Self::Cannon,
        Self::Chariot,
        Self::General,
    ];

    /// Dense index in `0..7`.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    pub const fn from_magnitude(magnitude: u8) -> Option<Self> {
        match magnitude {
            1 => Some(Self::Soldier),
            2 => Some(Self::Advisor),
            3 => Some(Self::Elephant),
            4 => Some(Self::Horse),
            5 => Some(Self::Cannon),
            6 => Some(Self::Chariot),
            7 => Some(Self::General),
            _ => None,
        }
    }

    const fn fen_char(self) -> char {
        match self {
            Self::General => 'k',
            Self::Advisor => 'a',
            Self::Elephant => 'b',
            Self::Horse => 'n',
            Self::Chariot => 'r',
            Self::Cannon => 'c',
            Self::Soldier => 'p',
        }
    }

    const fn from_fen_char(c: char) -> Option<Self> {
        match c {
            'k' => Some(Self::General),
            'a' => Some(Self::Advisor),
            'b' | 'e' => Some(Self::Elephant),
            'n' | 'h' => Some(Self::Horse),
            'r' => Some(Self::Chariot),
            'c' => Some(Self::Cannon),
            'p' => Some(Self::Soldier),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    pub const fn tag(self) -> i8 {
        match self.color {
            Color::Red => self.piece_type as i8,
            Color::Black => -(self.piece_type as i8),
        }
    }

    /// Decodes a signed tag; `Ok(None)` is an empty square.
    pub fn from_tag(tag: i8) -> Result<Option<Self>, EngineError> {
        if tag == 0 {
            return Ok(None);
        }
        let color = if tag > 0 { Color::Red } else { Color::Black };
        PieceType::from_magnitude(tag.unsigned_abs())
            .map(|pt| Some(Self::new(pt, color)))
            .ok_or(EngineError::InvalidPieceTag(tag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardCoordinate {
    pub row: usize,
    pub col: usize,
}

impl BoardCoordinate {
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < ROWS && col < COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Offsets the coordinate, staying on the board.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Self::new(row, col)
    }

    pub const fn index(self) -> usize {
        Board::square_index(self.row, self.col)
    }

    pub const fn from_index(sq: usize) -> Self {
        let (row, col) = Board::index_to_coord(sq);
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    // Mailbox for O(1) lookup
    grid: [Option<Piece>; SQUARES],

    // Fast occupancy for sliding pieces
    pub occupied_rows: [u16; ROWS], // 9 bits used
    pub occupied_cols: [u16; COLS], // 10 bits used

    kings: [Option<usize>; 2],
    zobrist_hash: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grid: [None; SQUARES],
            occupied_rows: [0; ROWS],
            occupied_cols: [0; COLS],
            kings: [None; 2],
            zobrist_hash: 0,
        }
    }

    fn setup_initial_position(&mut self) {
        // Red: rows 0-4
        self.setup_pieces(Color::Red, 0, 2, 3);
        // Black: rows 9-5
        self.setup_pieces(Color::Black, 9, 7, 6);
    }

    fn setup_pieces(&mut self, color: Color, back_row: usize, cannon_row: usize, soldier_row: usize) {
        let pieces = [
            PieceType::Chariot,
            PieceType::Horse,
            PieceType::Elephant,
            PieceType::Advisor,
            PieceType::General,
            PieceType::Advisor,
            PieceType::Elephant,
            PieceType::Horse,
            PieceType::Chariot,
        ];

        for (col, &pt) in pieces.iter().enumerate() {
            self.add_piece(back_row, col, pt, color);
        }

        self.add_piece(cannon_row, 1, PieceType::Cannon, color);
        self.add_piece(cannon_row, 7, PieceType::Cannon, color);

        for col in (0..COLS).step_by(2) {
            self.add_piece(soldier_row, col, PieceType::Soldier, color);
        }
    }

    /// Builds a board from the signed-tag grid.
    pub fn from_tags(tags: &TagGrid) -> Result<Self, EngineError> {
        let mut board = Self::empty();
        for (row, line) in tags.iter().enumerate() {
            for (col, &tag) in line.iter().enumerate() {
                if let Some(piece) = Piece::from_tag(tag)? {
                    board.add_piece(row, col, piece.piece_type, piece.color);
                }
            }
        }
        Ok(board)
    }

    #[must_use]
    pub fn to_tags(&self) -> TagGrid {
        let mut tags = [[0; COLS]; ROWS];
        for (row, line) in tags.iter_mut().enumerate() {
            for (col, tag) in line.iter_mut().enumerate() {
                *tag = self.get_piece(row, col).map_or(0, Piece::tag);
            }
        }
        tags
    }

    pub fn add_piece(&mut self, row: usize, col: usize, piece_type: PieceType, color: Color) {
        self.set_piece(row, col, Some(Piece::new(piece_type, color)));
    }

    pub fn set_piece(&mut self, row: usize, col: usize, piece: Option<Piece>) {
        let sq = Self::square_index(row, col);
        if let Some(existing) = self.grid[sq] {
            self.remove_at(sq, existing);
        }
        if let Some(p) = piece {
            self.place_at(sq, p);
        }
    }

    fn place_at(&mut self, sq: usize, piece: Piece) {
        let (row, col) = Self::index_to_coord(sq);
        self.grid[sq] = Some(piece);
        self.occupied_rows[row] |= 1 << col;
        self.occupied_cols[col] |= 1 << row;
        if piece.piece_type == PieceType::General {
            self.kings[piece.color.index()] = Some(sq);
        }
        self.zobrist_hash ^= ZobristTable::global().piece_key(piece, sq);
    }

    fn remove_at(&mut self, sq: usize, piece: Piece) {
        let (row, col) = Self::index_to_coord(sq);
        self.grid[sq] = None;
        self.occupied_rows[row] &= !(1 << col);
        self.occupied_cols[col] &= !(1 << row);
        if piece.piece_type == PieceType::General && self.kings[piece.color.index()] == Some(sq) {
            self.kings[piece.color.index()] = None;
        }
        self.zobrist_hash ^= ZobristTable::global().piece_key(piece, sq);
    }

    /// Moves the piece and returns whatever stood on the destination.
    ///
    /// # Panics
    /// If the source square is empty.
    pub fn apply_move(&mut self, mv: &Move) -> Option<Piece> {
        let from = Self::square_index(mv.from_row as usize, mv.from_col as usize);
        let to = Self::square_index(mv.to_row as usize, mv.to_col as usize);

        let Some(piece) = self.grid[from] else {
            panic!("no piece at source in apply_move: {mv}");
        };
        self.remove_at(from, piece);

        let captured = self.grid[to];
        if let Some(cap) = captured {
            self.remove_at(to, cap);
        }

        self.place_at(to, piece);
        captured
    }

    /// Exact inverse of [`Board::apply_move`].
    ///
    /// # Panics
    /// If the destination square is empty.
    pub fn undo_move(&mut self, mv: &Move, captured: Option<Piece>) {
        let from = Self::square_index(mv.from_row as usize, mv.from_col as usize);
        let to = Self::square_index(mv.to_row as usize, mv.to_col as usize);

        let Some(piece) = self.grid[to] else {
            panic!("no piece at destination in undo_move: {mv}");
        };
        self.remove_at(to, piece);
        self.place_at(from, piece);
        if let Some(cap) = captured {
            self.place_at(to, cap);
        }
    }

    #[must_use]
    pub const fn square_index(row: usize, col: usize) -> usize {
        row * COLS + col
    }

    #[must_use]
    pub const fn index_to_coord(sq: usize) -> (usize, usize) {
        (sq / COLS, sq % COLS)
    }

    #[must_use]
    pub fn get_piece(&self, row: usize, col: usize) -> Option<Piece> {
        self.grid.get(Self::square_index(row, col)).copied().flatten()
    }

    #[must_use]
    pub fn get_piece_sq(&self, sq: usize) -> Option<Piece> {
        self.grid[sq]
    }

    #[must_use]
    pub fn piece_at(&self, pos: BoardCoordinate) -> Option<Piece> {
        self.grid[pos.index()]
    }

    #[must_use]
    pub fn is_occupied(&self, pos: BoardCoordinate) -> bool {
        self.grid[pos.index()].is_some()
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<BoardCoordinate> {
        self.kings[color.index()].map(BoardCoordinate::from_index)
    }

    #[must_use]
    pub const fn zobrist_hash(&self) -> u64 {
        self.zobrist_hash
    }

    /// All occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (BoardCoordinate, Piece)> + '_ {
        self.grid
            .iter()
            .enumerate()
            .filter_map(|(sq, p)| p.map(|piece| (BoardCoordinate::from_index(sq), piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (BoardCoordinate, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Number of pieces strictly between two squares on the same rank or file.
    #[must_use]
    pub fn count_between(&self, from: BoardCoordinate, to: BoardCoordinate) -> u32 {
        let (line, lo, hi) = if from.row == to.row {
            (self.occupied_rows[from.row], from.col.min(to.col), from.col.max(to.col))
        } else if from.col == to.col {
            (self.occupied_cols[from.col], from.row.min(to.row), from.row.max(to.row))
        } else {
            return 0;
        };
        if hi <= lo + 1 {
            return 0;
        }
        let mask = ((1u16 << hi) - 1) & !((1u16 << (lo + 1)) - 1);
        (line & mask).count_ones()
    }

    pub fn to_fen_string(&self, turn: Color) -> String {
        let mut fen = String::new();
        // Rank 9 (black's back rank) first
        for r in (0..ROWS).rev() {
            let mut empty_count = 0;
            for c in 0..COLS {
                if let Some(piece) = self.get_piece(r, c) {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    let ch = piece.piece_type.fen_char();
                    fen.push(if piece.color == Color::Red {
                        ch.to_ascii_uppercase()
                    } else {
                        ch
                    });
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if r > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if turn == Color::Red { 'w' } else { 'b' });
        fen
    }

    /// Parses the placement and side fields of a Xiangqi FEN; trailing fields are ignored.
    pub fn from_fen(fen: &str) -> Result<(Self, Color), EngineError> {
        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or_else(|| EngineError::InvalidFen("empty string".into()))?;
        let turn = match fields.next() {
            None | Some("w" | "r") => Color::Red,
            Some("b") => Color::Black,
            Some(other) => return Err(EngineError::InvalidFen(format!("bad side '{other}'"))),
        };

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != ROWS {
            return Err(EngineError::InvalidFen(format!("expected {ROWS} ranks, found {}", ranks.len())));
        }

        let mut board = Self::empty();
        for (i, rank) in ranks.iter().enumerate() {
            let row = ROWS - 1 - i;
            let mut col = 0;
            for ch in rank.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    col += skip as usize;
                    continue;
                }
                let piece_type = PieceType::from_fen_char(ch.to_ascii_lowercase())
                    .ok_or_else(|| EngineError::InvalidFen(format!("bad piece '{ch}'")))?;
                if col >= COLS {
                    return Err(EngineError::InvalidFen(format!("rank {row} overflows")));
                }
                let color = if ch.is_ascii_uppercase() { Color::Red } else { Color::Black };
                board.add_piece(row, col, piece_type, color);
                col += 1;
            }
            if col != COLS {
                return Err(EngineError::InvalidFen(format!("rank {row} has {col} files")));
            }
        }
        Ok((board, turn))
    }
}
