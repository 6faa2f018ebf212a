use crate::engine::book::OpeningBook;
use crate::engine::clock::Deadline;
use crate::engine::config::EngineConfig;
use crate::engine::eval::SimpleEvaluator;
use crate::engine::ordering::{order_moves, KillerTable};
use crate::engine::tt::{TTFlag, TranspositionTable};
use crate::engine::zobrist::ZobristTable;
use crate::engine::{
    Evaluator, Move, MoveSource, SearchLimit, SearchOutcome, SearchStats, Searcher,
};
use crate::error::EngineError;
use crate::logic::board::{Board, Color};
use crate::logic::generator::MoveGenerator;
use crate::logic::history::History;
use crate::logic::position::Position;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

/// Score of a won position before the remaining-depth bonus.
pub const WIN_SCORE: i32 = 100_000_000;
const INFINITY: i32 = 1_000_000_000;
const MAX_DEPTH: u8 = 63;

pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: SimpleEvaluator,
    generator: MoveGenerator,
    tt: TranspositionTable,
    killers: KillerTable,
    book: OpeningBook,
    rng: StdRng,
    session_plies: u32,
    nodes_searched: u64,
    deadline: Deadline,
}

/// Result of one root search, before the legality cross-check.
struct RootResult {
    best_move: Option<Move>,
    score: i32,
    stats: SearchStats,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self::with_book(config, OpeningBook::standard())
    }

    pub fn with_book(config: Arc<EngineConfig>, book: OpeningBook) -> Self {
        let rng = config
            .rng_seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            evaluator: SimpleEvaluator::new(config.clone()),
            generator: MoveGenerator::new(),
            tt: TranspositionTable::new(config.tt_size_mb),
            killers: KillerTable::new(),
            book,
            rng,
            session_plies: 0,
            nodes_searched: 0,
            deadline: Deadline::start(None),
            config,
        }
    }

    /// Loads a persisted book. A book built for other Zobrist constants is
    /// dropped with a warning; an unreadable one is an error.
    pub fn with_book_json(config: Arc<EngineConfig>, json: &str) -> Result<Self, EngineError> {
        let table = ZobristTable::global();
        let book = match OpeningBook::from_json(json, table) {
            Ok(book) => book,
            Err(EngineError::HashTableMismatch { expected, found }) => {
                warn!(
                    "opening book fingerprint {found:#018x} does not match {expected:#018x}, playing without book"
                );
                OpeningBook::empty(table)
            }
            Err(e) => return Err(e),
        };
        Ok(Self::with_book(config, book))
    }

    /// Forgets everything learned in the previous game.
    pub fn new_game(&mut self) {
        self.session_plies = 0;
        self.killers.clear();
        self.tt.clear();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn book_move(&mut self, board: &Board, side: Color, legal: &[Move]) -> Option<Move> {
        let candidates: Vec<Move> = self
            .book
            .lookup(board, side)
            .iter()
            .filter(|m| legal.contains(m))
            .copied()
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    fn tt_key(board: &Board, side: Color) -> u64 {
        ZobristTable::global().position_key(board.zobrist_hash(), side)
    }

    /// Negamax alpha-beta. Scores are from `side`'s point of view; `None`
    /// means the deadline passed and the caller must unwind.
    fn alpha_beta(
        &mut self,
        pos: &mut Position,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        side: Color,
    ) -> Option<i32> {
        self.nodes_searched += 1;
        if self.deadline.check(self.nodes_searched) {
            return None;
        }

        let win = WIN_SCORE + i32::from(depth);
        let board = pos.board();
        if board.king_square(side).is_none() {
            return Some(-win);
        }
        if board.king_square(side.opposite()).is_none() {
            return Some(win);
        }
        if depth == 0 {
            return Some(side.sign() * self.evaluator.evaluate(board));
        }

        let key = Self::tt_key(board, side);
        if let Some(score) = self.tt.lookup(key, depth, alpha, beta) {
            return Some(score);
        }

        let mut moves = self.generator.legal_moves(board, side, pos.history());
        if moves.is_empty() {
            self.tt.store(key, None, -win, depth, TTFlag::Exact);
            return Some(-win);
        }
        let tt_move = self.tt.best_move(key);
        order_moves(board, &mut moves, tt_move, self.killers.get(depth), &self.config);

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            let score = {
                let mut child = pos.scoped(mv);
                -self.alpha_beta(&mut child, depth - 1, -beta, -alpha, side.opposite())?
            };

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.killers.store(depth, mv);
                break;
            }
        }

        let flag = if best_score <= alpha_orig {
            TTFlag::UpperBound
        } else if best_score >= beta {
            TTFlag::LowerBound
        } else {
            TTFlag::Exact
        };
        self.tt.store(key, best_move, best_score, depth, flag);

        Some(best_score)
    }

    /// Iterative deepening over the root moves. The best move of the last
    /// finished iteration wins; a partial iteration only fills a gap.
    fn search(
        &mut self,
        board: &Board,
        side: Color,
        history: &History,
        legal: &[Move],
        limit: SearchLimit,
    ) -> RootResult {
        self.nodes_searched = 0;
        let (max_depth, time_limit) = match limit {
            SearchLimit::Depth(d) => (d.clamp(1, MAX_DEPTH), None),
            // A forced reply needs no deepening
            SearchLimit::Time(ms) if legal.len() == 1 => (1, Some(ms)),
            SearchLimit::Time(ms) => (MAX_DEPTH, Some(ms)),
        };
        self.deadline = Deadline::start(time_limit);

        let mut pos = Position::new(board.clone(), history.clone());
        let mut result = RootResult {
            best_move: None,
            score: 0,
            stats: SearchStats::default(),
        };

        for depth in 1..=max_depth {
            let mut moves = legal.to_vec();
            order_moves(board, &mut moves, None, self.killers.get(depth), &self.config);
            // Previous iteration's choice goes first
            if let Some(prev) = result.best_move {
                if let Some(i) = moves.iter().position(|m| *m == prev) {
                    moves[..=i].rotate_right(1);
                }
            }

            let mut alpha = -INFINITY;
            let mut best_score = -INFINITY;
            let mut best_move = None;
            let mut timed_out = false;

            for mv in moves {
                let score = {
                    let mut child = pos.scoped(mv);
                    self.alpha_beta(&mut child, depth - 1, -INFINITY, -alpha, side.opposite())
                };
                let Some(score) = score.map(|s| -s) else {
                    timed_out = true;
                    break;
                };
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            }

            if timed_out {
                result.stats.timed_out = true;
                if result.best_move.is_none() {
                    result.best_move = best_move;
                    result.score = best_score;
                }
                break;
            }

            let key = Self::tt_key(board, side);
            self.tt.store(key, best_move, best_score, depth, TTFlag::Exact);

            result.best_move = best_move;
            result.score = best_score;
            result.stats.depth = depth;
            debug!(
                "depth {depth}: best {} score {best_score} nodes {}",
                best_move.map_or_else(|| "-".to_string(), |m| m.to_string()),
                self.nodes_searched
            );

            // Fixed-depth searches keep going so the value stays exact at that depth
            if time_limit.is_some() && best_score.abs() >= WIN_SCORE {
                break;
            }
        }

        if result.stats.timed_out && result.stats.depth == 0 {
            warn!("search timed out before finishing depth 1");
        }

        result.stats.nodes = self.nodes_searched;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            result.stats.time_ms = self.deadline.elapsed_ms().max(0.0) as u64;
        }
        debug_assert_eq!(pos.board(), board, "search left moves applied");
        result
    }
}

impl Searcher for AlphaBetaEngine {
    fn choose_move(
        &mut self,
        board: &Board,
        side: Color,
        history: &History,
        limit: SearchLimit,
    ) -> Result<SearchOutcome, EngineError> {
        let legal = self.generator.legal_moves(board, side, history);
        if legal.is_empty() {
            return Err(EngineError::NoLegalMoves(side));
        }

        let in_book = self.session_plies < self.config.book_max_plies;
        self.session_plies += 1;

        if in_book {
            if let Some(mv) = self.book_move(board, side, &legal) {
                info!("{side:?} plays book move {mv}");
                return Ok(SearchOutcome {
                    mv,
                    value: 0,
                    source: MoveSource::Book,
                    stats: SearchStats::default(),
                });
            }
        }

        let result = self.search(board, side, history, &legal, limit);
        let value = side.sign() * result.score;

        match result.best_move.filter(|mv| legal.contains(mv)) {
            Some(mv) => Ok(SearchOutcome {
                mv,
                value,
                source: MoveSource::Search,
                stats: result.stats,
            }),
            None => {
                let mv = *legal
                    .choose(&mut self.rng)
                    .ok_or(EngineError::NoLegalMoves(side))?;
                warn!("search produced no usable move for {side:?}, playing random {mv}");
                Ok(SearchOutcome {
                    mv,
                    value: 0,
                    source: MoveSource::Fallback,
                    stats: result.stats,
                })
            }
        }
    }
}
