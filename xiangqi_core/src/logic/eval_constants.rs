// Piece Values
pub const VAL_PAWN: i32 = 70;
pub const VAL_ADVISOR: i32 = 110;
pub const VAL_ELEPHANT: i32 = 110;
pub const VAL_HORSE: i32 = 300;
pub const VAL_CANNON: i32 = 300;
pub const VAL_ROOK: i32 = 600;
pub const VAL_KING: i32 = 1_000_000;

// Piece-Square Tables, written for Red; Black reads the mirrored row.
// 10 rows, 9 cols. (0,0) is Red's bottom-left.
// Advisors, elephants and the general have no positional term.

#[rustfmt::skip]
pub const PST_CANNON: [[i32; 9]; 10] = [
    [   0,    0,    2,    6,    6,    6,    2,    0,    0], // Row 0 (red back rank)
    [   0,    2,    4,    6,    6,    6,    4,    2,    0],
    [   4,    0,    8,    6,   10,    6,    8,    0,    4],
    [   0,    0,    0,    2,    4,    2,    0,    0,    0],
    [  -2,    0,    4,    2,    6,    2,    4,    0,   -2],
    [   0,    0,    0,    2,    8,    2,    0,    0,    0],
    [   0,    0,   -2,    4,   10,    4,   -2,    0,    0],
    [   2,    2,    0,  -10,   -8,  -10,    0,    2,    2],
    [   2,    2,    0,   -4,  -14,   -4,    0,    2,    2],
    [   6,    4,    0,  -10,  -12,  -10,    0,    4,    6], // Row 9 (black back rank)
];

#[rustfmt::skip]
pub const PST_HORSE: [[i32; 9]; 10] = [
    [   0,   -4,    0,    0,    0,    0,    0,   -4,    0], // Row 0 (red back rank)
    [   0,    2,    4,    4,   -2,    4,    4,    2,    0],
    [   4,    2,    8,    8,    4,    8,    8,    2,    4],
    [   2,    6,    8,    6,   10,    6,    8,    6,    2],
    [   4,   12,   16,   14,   12,   14,   16,   12,    4],
    [   6,   16,   14,   18,   16,   18,   14,   16,    6],
    [   8,   24,   18,   24,   20,   24,   18,   24,    8],
    [  12,   14,   16,   20,   18,   20,   16,   14,   12],
    [   4,   10,   28,   16,    8,   16,   28,   10,    4],
    [   4,    8,   16,   12,    4,   12,   16,    8,    4], // Row 9 (black back rank)
];

#[rustfmt::skip]
pub const PST_CHARIOT: [[i32; 9]; 10] = [
    [  -2,   10,    6,   14,   12,   14,    6,   10,   -2], // Row 0 (red back rank)
    [   8,    4,    8,   16,    8,   16,    8,    4,    8],
    [   4,    8,    6,   14,   12,   14,    6,    8,    4],
    [   6,   10,    8,   14,   14,   14,    8,   10,    6],
    [  12,   16,   14,   20,   20,   20,   14,   16,   12],
    [  12,   14,   12,   18,   18,   18,   12,   14,   12],
    [  12,   18,   16,   22,   22,   22,   16,   18,   12],
    [  12,   12,   12,   18,   18,   18,   12,   12,   12],
    [  16,   20,   18,   24,   26,   24,   18,   20,   16],
    [  14,   14,   12,   18,   16,   18,   12,   14,   14], // Row 9 (black back rank)
];

#[rustfmt::skip]
pub const PST_SOLDIER: [[i32; 9]; 10] = [
    [   0,    0,    0,    0,    0,    0,    0,    0,    0], // Row 0 (red back rank)
    [   0,    0,    0,    0,    0,    0,    0,    0,    0],
    [   0,    0,    0,    0,    0,    0,    0,    0,    0],
    [   0,    0,   -2,    0,    4,    0,   -2,    0,    0],
    [   2,    0,    8,    0,    8,    0,    8,    0,    2],
    [   6,   12,   18,   18,   20,   18,   18,   12,    6],
    [  10,   20,   30,   34,   40,   34,   30,   20,   10],
    [  14,   26,   42,   60,   80,   60,   42,   26,   14],
    [  18,   36,   56,   80,  120,   80,   56,   36,   18],
    [   0,    3,    6,    9,   12,    9,    6,    3,    0], // Row 9 (black back rank)
];
use crate::logic::board::{Color, PieceType};

pub fn get_pst_value(pt: PieceType, color: Color, row: usize, col: usize) -> i32 {
    let (r, c) = if color == Color::Red {
        (row, col)
    } else {
        (9 - row, col)
    };

    let table = match pt {
        PieceType::Soldier => &PST_SOLDIER,
        PieceType::Horse => &PST_HORSE,
        PieceType::Chariot => &PST_CHARIOT,
        PieceType::Cannon => &PST_CANNON,
        PieceType::General | PieceType::Advisor | PieceType::Elephant => return 0,
    };
    table.get(r).and_then(|line| line.get(c)).copied().unwrap_or(0)
}
