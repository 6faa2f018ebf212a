use crate::engine::config::EngineConfig;
use crate::engine::Move;
use crate::logic::board::Board;
use std::cmp::Reverse;

/// Killer slots are kept per remaining depth up to this bound.
pub const MAX_KILLER_DEPTH: usize = 64;

/// Two moves per remaining depth that recently caused a beta cutoff.
#[derive(Debug, Clone)]
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_KILLER_DEPTH],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    pub const fn new() -> Self {
        Self {
            slots: [[None; 2]; MAX_KILLER_DEPTH],
        }
    }

    pub fn get(&self, depth: u8) -> [Option<Move>; 2] {
        self.slots
            .get(depth as usize)
            .copied()
            .unwrap_or([None; 2])
    }

    pub fn store(&mut self, depth: u8, mv: Move) {
        // Shift: 0 -> 1, New -> 0
        if let Some(killers) = self.slots.get_mut(depth as usize) {
            if killers[0] != Some(mv) {
                killers[1] = killers[0];
                killers[0] = Some(mv);
            }
        }
    }

    pub fn clear(&mut self) {
        self.slots = [[None; 2]; MAX_KILLER_DEPTH];
    }
}

/// Transposition move, killer 0, killer 1, captures by victim value
/// (highest first), then quiet moves in generation order.
pub fn order_moves(
    board: &Board,
    moves: &mut [Move],
    tt_move: Option<Move>,
    killers: [Option<Move>; 2],
    config: &EngineConfig,
) {
    moves.sort_by_key(|mv| {
        let mv = Some(*mv);
        if mv == tt_move {
            return (0, Reverse(0));
        }
        if mv == killers[0] {
            return (1, Reverse(0));
        }
        if mv == killers[1] {
            return (2, Reverse(0));
        }
        match mv.and_then(|m| board.piece_at(m.to())) {
            Some(victim) => (3, Reverse(config.piece_value(victim.piece_type))),
            None => (4, Reverse(0)),
        }
    });
}
