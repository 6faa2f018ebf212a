use crate::engine::{MoveSource, SearchLimit, SearchOutcome, SearchStats, Searcher};
use crate::error::EngineError;
use crate::logic::board::{Board, Color};
use crate::logic::generator::MoveGenerator;
use crate::logic::history::History;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Baseline opponent: a uniformly random legal move.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self { rng }
    }
}

impl Searcher for RandomPlayer {
    fn choose_move(
        &mut self,
        board: &Board,
        side: Color,
        history: &History,
        _limit: SearchLimit,
    ) -> Result<SearchOutcome, EngineError> {
        let legal = MoveGenerator::new().legal_moves(board, side, history);
        let mv = *legal
            .choose(&mut self.rng)
            .ok_or(EngineError::NoLegalMoves(side))?;
        Ok(SearchOutcome {
            mv,
            value: 0,
            source: MoveSource::Fallback,
            stats: SearchStats::default(),
        })
    }
}
