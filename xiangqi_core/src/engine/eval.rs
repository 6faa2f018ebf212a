use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::Board;
use crate::logic::eval_constants::get_pst_value;
use std::sync::Arc;

/// Weighted material plus piece-square bonuses, red minus black.
pub struct SimpleEvaluator {
    config: Arc<EngineConfig>,
}

impl SimpleEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }
}

impl Evaluator for SimpleEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        let mut material = 0;
        let mut position = 0;

        for (pos, piece) in board.pieces() {
            let sign = piece.color.sign();
            material += sign * self.config.piece_value(piece.piece_type);
            position += sign * get_pst_value(piece.piece_type, piece.color, pos.row, pos.col);
        }

        self.config.material_weight * material + self.config.position_weight * position
    }
}
