use crate::logic::board::{Board, Color, Piece, SQUARES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::sync::OnceLock;

/// Seed of the process-wide table; persisted books are keyed against it.
pub const DEFAULT_SEED: u64 = 0x5851_F42D_4C95_7F2D;

// 7 piece types * 2 colors per square
const PIECE_KINDS: usize = 14;
const TABLE_SIZE: usize = SQUARES * PIECE_KINDS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZobristTable {
    #[serde(with = "BigArray")]
    piece_keys: [u64; TABLE_SIZE],
    side_key: u64,
}

impl ZobristTable {
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut piece_keys = [0; TABLE_SIZE];
        for key in &mut piece_keys {
            *key = rng.gen();
        }
        let side_key = rng.gen();

        Self {
            piece_keys,
            side_key,
        }
    }

    /// The table every `Board` hashes with.
    pub fn global() -> &'static Self {
        static INSTANCE: OnceLock<ZobristTable> = OnceLock::new();
        INSTANCE.get_or_init(|| ZobristTable::with_seed(DEFAULT_SEED))
    }

    pub fn piece_key(&self, piece: Piece, sq: usize) -> u64 {
        let kind = piece.color.index() * 7 + piece.piece_type.index();
        self.piece_keys[kind * SQUARES + sq]
    }

    pub const fn side_key(&self) -> u64 {
        self.side_key
    }

    /// Placement key recomputed from scratch.
    pub fn hash(&self, board: &Board) -> u64 {
        board
            .pieces()
            .fold(0, |acc, (pos, piece)| acc ^ self.piece_key(piece, pos.index()))
    }

    /// Key for search tables: placement plus side to move.
    pub fn position_key(&self, placement: u64, side: Color) -> u64 {
        match side {
            Color::Red => placement,
            Color::Black => placement ^ self.side_key,
        }
    }

    /// FNV-1a over every constant. Two tables agree on all keys iff (with
    /// overwhelming probability) their fingerprints match.
    pub fn fingerprint(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
        self.piece_keys
            .iter()
            .chain(std::iter::once(&self.side_key))
            .fold(FNV_OFFSET, |acc, k| (acc ^ k).wrapping_mul(FNV_PRIME))
    }
}
