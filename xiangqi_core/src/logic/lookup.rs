use crate::logic::board::{Board, BoardCoordinate, Color, COLS, ROWS, SQUARES};
use std::sync::OnceLock;

// Max dimension is 10 (rows 0..9).
// Occupancy mask is up to 10 bits. 1 << 10 = 1024.
const MAX_DIM: usize = 10;
const OCC_SIZE: usize = 1024;

/// A step destination together with the square that must be empty for it
/// (the elephant's eye or the horse's leg).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedStep {
    pub target: usize,
    pub block: usize,
}

/// Precomputed move tables shared by the generator and the attack checks.
pub struct AttackTables {
    rook_table: Box<[[u16; OCC_SIZE]; MAX_DIM]>,
    cannon_table: Box<[[u16; OCC_SIZE]; MAX_DIM]>,
    general: [Vec<Vec<usize>>; 2],
    advisor: [Vec<Vec<usize>>; 2],
    soldier: [Vec<Vec<usize>>; 2],
    elephant: [Vec<Vec<BlockedStep>>; 2],
    horse: Vec<Vec<BlockedStep>>,
}

impl AttackTables {
    fn new() -> Self {
        let mut rook_table = Box::new([[0; OCC_SIZE]; MAX_DIM]);
        let mut cannon_table = Box::new([[0; OCC_SIZE]; MAX_DIM]);

        for idx in 0..MAX_DIM {
            for occ in 0..OCC_SIZE {
                rook_table[idx][occ] = compute_rook_attacks(idx, occ, MAX_DIM);
                cannon_table[idx][occ] = compute_cannon_attacks(idx, occ, MAX_DIM);
            }
        }

        let per_color = |f: fn(Color, BoardCoordinate) -> Vec<usize>| {
            [Color::Red, Color::Black].map(|color| {
                (0..SQUARES)
                    .map(|sq| f(color, BoardCoordinate::from_index(sq)))
                    .collect::<Vec<_>>()
            })
        };

        Self {
            rook_table,
            cannon_table,
            general: per_color(general_steps),
            advisor: per_color(advisor_steps),
            soldier: per_color(soldier_steps),
            elephant: [Color::Red, Color::Black].map(|color| {
                (0..SQUARES)
                    .map(|sq| elephant_steps(color, BoardCoordinate::from_index(sq)))
                    .collect()
            }),
            horse: (0..SQUARES)
                .map(|sq| horse_steps(BoardCoordinate::from_index(sq)))
                .collect(),
        }
    }

    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<AttackTables> = OnceLock::new();
        INSTANCE.get_or_init(AttackTables::new)
    }

    pub fn get_rook_attacks(&self, idx: usize, occ: u16, len: usize) -> u16 {
        // Mask occupancy to length
        let mask = (1 << len) - 1;
        let effective_occ = (occ & mask) as usize;
        self.rook_table[idx][effective_occ] & mask
    }

    pub fn get_cannon_attacks(&self, idx: usize, occ: u16, len: usize) -> u16 {
        let mask = (1 << len) - 1;
        let effective_occ = (occ & mask) as usize;
        self.cannon_table[idx][effective_occ] & mask
    }

    /// Squares a chariot on `from` reaches along its rank and file, including
    /// the first blocker in each direction.
    pub fn rook_targets(&self, board: &Board, from: BoardCoordinate) -> impl Iterator<Item = usize> {
        let rank = self.get_rook_attacks(from.col, board.occupied_rows[from.row], COLS);
        let file = self.get_rook_attacks(from.row, board.occupied_cols[from.col], ROWS);
        line_squares(from, rank, file)
    }

    /// Quiet slides plus the square beyond exactly one screen in each direction.
    pub fn cannon_targets(&self, board: &Board, from: BoardCoordinate) -> impl Iterator<Item = usize> {
        let rank = self.get_cannon_attacks(from.col, board.occupied_rows[from.row], COLS);
        let file = self.get_cannon_attacks(from.row, board.occupied_cols[from.col], ROWS);
        line_squares(from, rank, file)
    }

    pub fn general_steps(&self, color: Color, sq: usize) -> &[usize] {
        &self.general[color.index()][sq]
    }

    pub fn advisor_steps(&self, color: Color, sq: usize) -> &[usize] {
        &self.advisor[color.index()][sq]
    }

    pub fn soldier_steps(&self, color: Color, sq: usize) -> &[usize] {
        &self.soldier[color.index()][sq]
    }

    pub fn elephant_steps(&self, color: Color, sq: usize) -> &[BlockedStep] {
        &self.elephant[color.index()][sq]
    }

    pub fn horse_steps(&self, sq: usize) -> &[BlockedStep] {
        &self.horse[sq]
    }
}

fn line_squares(from: BoardCoordinate, rank: u16, file: u16) -> impl Iterator<Item = usize> {
    let row = from.row;
    let col = from.col;
    BitIter(rank)
        .map(move |c| Board::square_index(row, c))
        .chain(BitIter(file).map(move |r| Board::square_index(r, col)))
}

struct BitIter(u16);

impl Iterator for BitIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(idx)
    }
}

pub fn is_in_palace(color: Color, pos: BoardCoordinate) -> bool {
    if !(3..=5).contains(&pos.col) {
        return false;
    }
    match color {
        Color::Red => pos.row <= 2,
        Color::Black => pos.row >= 7,
    }
}

pub const fn is_own_half(color: Color, row: usize) -> bool {
    match color {
        Color::Red => row <= 4,
        Color::Black => row >= 5,
    }
}

fn general_steps(color: Color, from: BoardCoordinate) -> Vec<usize> {
    [(1, 0), (-1, 0), (0, 1), (0, -1)]
        .into_iter()
        .filter_map(|(dr, dc)| from.offset(dr, dc))
        .filter(|to| is_in_palace(color, *to))
        .map(BoardCoordinate::index)
        .collect()
}

fn advisor_steps(color: Color, from: BoardCoordinate) -> Vec<usize> {
    [(1, 1), (1, -1), (-1, 1), (-1, -1)]
        .into_iter()
        .filter_map(|(dr, dc)| from.offset(dr, dc))
        .filter(|to| is_in_palace(color, *to))
        .map(BoardCoordinate::index)
        .collect()
}

fn soldier_steps(color: Color, from: BoardCoordinate) -> Vec<usize> {
    let forward = match color {
        Color::Red => 1,
        Color::Black => -1,
    };
    let mut steps = Vec::with_capacity(3);
    if let Some(to) = from.offset(forward, 0) {
        steps.push(to.index());
    }
    if !is_own_half(color, from.row) {
        for dc in [-1, 1] {
            if let Some(to) = from.offset(0, dc) {
                steps.push(to.index());
            }
        }
    }
    steps
}

fn elephant_steps(color: Color, from: BoardCoordinate) -> Vec<BlockedStep> {
    [(2, 2), (2, -2), (-2, 2), (-2, -2)]
        .into_iter()
        .filter_map(|(dr, dc)| {
            let to = from.offset(dr, dc)?;
            if !is_own_half(color, to.row) {
                return None;
            }
            let eye = from.offset(dr / 2, dc / 2)?;
            Some(BlockedStep {
                target: to.index(),
                block: eye.index(),
            })
        })
        .collect()
}

fn horse_steps(from: BoardCoordinate) -> Vec<BlockedStep> {
    // (dr, dc) of the jump; the leg is the orthogonal neighbour along the long side
    [
        (2, 1),
        (2, -1),
        (-2, 1),
        (-2, -1),
        (1, 2),
        (-1, 2),
        (1, -2),
        (-1, -2),
    ]
    .into_iter()
    .filter_map(|(dr, dc): (isize, isize)| {
        let to = from.offset(dr, dc)?;
        let leg = if dr.abs() == 2 {
            from.offset(dr / 2, 0)?
        } else {
            from.offset(0, dc / 2)?
        };
        Some(BlockedStep {
            target: to.index(),
            block: leg.index(),
        })
    })
    .collect()
}

fn compute_rook_attacks(idx: usize, occ: usize, len: usize) -> u16 {
    let mut attacks = 0;
    // Right
    for i in (idx + 1)..len {
        attacks |= 1 << i;
        if (occ & (1 << i)) != 0 {
            break;
        }
    }
    // Left
    for i in (0..idx).rev() {
        attacks |= 1 << i;
        if (occ & (1 << i)) != 0 {
            break;
        }
    }
    attacks
}

fn compute_cannon_attacks(idx: usize, occ: usize, len: usize) -> u16 {
    let mut attacks = 0;
    for dir in [1isize, -1] {
        let mut jumped = false;
        let mut i = idx as isize + dir;
        while (0..len as isize).contains(&i) {
            let bit = 1 << i;
            if occ & bit != 0 {
                if jumped {
                    attacks |= bit; // Capture
                    break;
                }
                jumped = true;
            } else if !jumped {
                attacks |= bit; // Move
            }
            i += dir;
        }
    }
    attacks as u16
}
