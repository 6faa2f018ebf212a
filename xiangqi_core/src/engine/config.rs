use crate::engine::SearchLimit;
use crate::logic::board::PieceType;
use crate::logic::eval_constants::{
    VAL_ADVISOR, VAL_CANNON, VAL_ELEPHANT, VAL_HORSE, VAL_KING, VAL_PAWN, VAL_ROOK,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_pawn: i32,
    pub val_advisor: i32,
    pub val_elephant: i32,
    pub val_horse: i32,
    pub val_cannon: i32,
    pub val_rook: i32,
    pub val_king: i32,
    pub material_weight: i32,
    pub position_weight: i32,

    // Search Parameters
    pub max_depth: u8,
    /// Per-move clock; when set it replaces the fixed `max_depth`.
    pub time_budget_ms: Option<u64>,
    pub tt_size_mb: usize,

    // Opening book is consulted for this many engine moves per game
    pub book_max_plies: u32,

    /// Seeds book and fallback choices; `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_advisor: VAL_ADVISOR,
            val_elephant: VAL_ELEPHANT,
            val_horse: VAL_HORSE,
            val_cannon: VAL_CANNON,
            val_rook: VAL_ROOK,
            val_king: VAL_KING,
            material_weight: 1,
            position_weight: 8,

            max_depth: 3,
            time_budget_ms: None,
            tt_size_mb: 16,

            book_max_plies: 4,
            rng_seed: None,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_advisor: Option<f32>,
    val_elephant: Option<f32>,
    val_horse: Option<f32>,
    val_cannon: Option<f32>,
    val_rook: Option<f32>,
    val_king: Option<f32>,
    material_weight: Option<f32>,
    position_weight: Option<f32>,

    max_depth: Option<u8>,
    time_budget_ms: Option<u64>,
    tt_size_mb: Option<usize>,
    book_max_plies: Option<u32>,
    rng_seed: Option<u64>,
}

impl EngineConfig {
    /// Reads the tuning format: evaluation fields are multipliers of the
    /// defaults, search fields are absolute.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_advisor: apply_scale(default.val_advisor, json_config.val_advisor),
            val_elephant: apply_scale(default.val_elephant, json_config.val_elephant),
            val_horse: apply_scale(default.val_horse, json_config.val_horse),
            val_cannon: apply_scale(default.val_cannon, json_config.val_cannon),
            val_rook: apply_scale(default.val_rook, json_config.val_rook),
            val_king: apply_scale(default.val_king, json_config.val_king),
            material_weight: apply_scale(default.material_weight, json_config.material_weight),
            position_weight: apply_scale(default.position_weight, json_config.position_weight),

            max_depth: json_config.max_depth.unwrap_or(default.max_depth),
            time_budget_ms: json_config.time_budget_ms.or(default.time_budget_ms),
            tt_size_mb: json_config.tt_size_mb.unwrap_or(default.tt_size_mb),
            book_max_plies: json_config.book_max_plies.unwrap_or(default.book_max_plies),
            rng_seed: json_config.rng_seed.or(default.rng_seed),
        })
    }

    pub const fn piece_value(&self, pt: PieceType) -> i32 {
        match pt {
            PieceType::General => self.val_king,
            PieceType::Advisor => self.val_advisor,
            PieceType::Elephant => self.val_elephant,
            PieceType::Horse => self.val_horse,
            PieceType::Chariot => self.val_rook,
            PieceType::Cannon => self.val_cannon,
            PieceType::Soldier => self.val_pawn,
        }
    }

    pub const fn search_limit(&self) -> SearchLimit {
        match self.time_budget_ms {
            Some(ms) => SearchLimit::Time(ms),
            None => SearchLimit::Depth(self.max_depth),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}
