use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use xiangqi_core::engine::book::OpeningBook;
use xiangqi_core::engine::config::EngineConfig;
use xiangqi_core::engine::zobrist::ZobristTable;
use xiangqi_core::engine::random::RandomPlayer;
use xiangqi_core::logic::game::{GameState, GameStatus};
use xiangqi_core::{AlphaBetaEngine, Board, Color, EngineError, History, SearchLimit, Searcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    Engine,
    Random,
}

#[derive(Parser)]
#[command(name = "xiangqi")]
#[command(about = "Headless Xiangqi match runner", long_about = None)]
struct Args {
    /// Fixed search depth (defaults to the config's search limit)
    #[arg(short, long)]
    depth: Option<u8>,

    /// Time budget per move in milliseconds; overrides --depth
    #[arg(short, long)]
    time_ms: Option<u64>,

    /// Engine config with absolute values
    #[arg(short, long, conflicts_with = "scaled_config")]
    config: Option<PathBuf>,

    /// Engine config where evaluation fields are multipliers of the defaults
    #[arg(long)]
    scaled_config: Option<PathBuf>,

    /// Opening book in JSON form (built-in book when absent)
    #[arg(long)]
    book: Option<PathBuf>,

    /// Build an opening book from the games played here and write it as JSON
    #[arg(long, conflicts_with = "fen")]
    write_book: Option<PathBuf>,

    /// Plies of each game recorded by --write-book
    #[arg(long, default_value = "8")]
    book_plies: usize,

    /// Start position as FEN
    #[arg(long)]
    fen: Option<String>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long, default_value = "1")]
    games: u32,

    #[arg(long, value_enum, default_value = "engine")]
    red: PlayerKind,

    #[arg(long, value_enum, default_value = "random")]
    black: PlayerKind,

    /// Adjudicate a draw after this many plies
    #[arg(long, default_value = "400")]
    max_plies: usize,
}

enum Player {
    Engine(Box<AlphaBetaEngine>),
    Random(RandomPlayer),
}

impl Player {
    fn build(kind: PlayerKind, config: &Arc<EngineConfig>, book: Option<&str>, seed: Option<u64>) -> Result<Self> {
        Ok(match kind {
            PlayerKind::Random => Self::Random(RandomPlayer::new(seed)),
            PlayerKind::Engine => {
                let mut config = (**config).clone();
                if seed.is_some() {
                    config.rng_seed = seed;
                }
                let config = Arc::new(config);
                let engine = match book {
                    Some(json) => AlphaBetaEngine::with_book_json(config, json)?,
                    None => AlphaBetaEngine::new(config),
                };
                Self::Engine(Box::new(engine))
            }
        })
    }

    fn new_game(&mut self) {
        if let Self::Engine(engine) = self {
            engine.new_game();
        }
    }

    fn searcher(&mut self) -> &mut dyn Searcher {
        match self {
            Self::Engine(engine) => engine.as_mut(),
            Self::Random(random) => random,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    red: u32,
    black: u32,
    draws: u32,
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    if let Some(path) = &args.config {
        let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        return serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()));
    }
    if let Some(path) = &args.scaled_config {
        let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        return EngineConfig::load_from_json(&json).with_context(|| format!("parsing {}", path.display()));
    }
    Ok(EngineConfig::default())
}

fn start_position(fen: Option<&str>) -> Result<GameState> {
    Ok(match fen {
        Some(fen) => {
            let (board, turn) = Board::from_fen(fen)?;
            GameState::from_position(board, turn, History::new())
        }
        None => GameState::new(),
    })
}

fn play_game(
    game: &mut GameState,
    red: &mut Player,
    black: &mut Player,
    limit: SearchLimit,
    max_plies: usize,
) -> Result<()> {
    let mut plies = 0;
    while game.status == GameStatus::Playing {
        if plies >= max_plies {
            info!("ply cap {max_plies} reached, adjudicating a draw");
            game.status = GameStatus::Draw;
            break;
        }

        let side = game.turn;
        let player = match side {
            Color::Red => &mut *red,
            Color::Black => &mut *black,
        };
        let outcome = match player.searcher().choose_move(game.board(), side, game.history(), limit) {
            Ok(outcome) => outcome,
            Err(EngineError::NoLegalMoves(_)) => break,
            Err(e) => return Err(e.into()),
        };
        debug!(
            "{side:?} {} value {} source {:?} depth {} nodes {} {}ms",
            outcome.mv,
            outcome.value,
            outcome.source,
            outcome.stats.depth,
            outcome.stats.nodes,
            outcome.stats.time_ms
        );

        match game.make_move(outcome.mv) {
            Ok(_) => plies += 1,
            Err(EngineError::IllegalMoveRequested(mv)) => {
                warn!("{side:?} requested illegal move {mv}, forfeiting");
                game.forfeit(side);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Arc::new(load_config(&args)?);
    let book = args
        .book
        .as_ref()
        .map(|path| std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display())))
        .transpose()?;

    let limit = match (args.time_ms, args.depth) {
        (Some(ms), _) => SearchLimit::Time(ms),
        (None, Some(depth)) => SearchLimit::Depth(depth),
        (None, None) => config.search_limit(),
    };
    info!("red {:?} vs black {:?}, {} game(s), limit {limit:?}", args.red, args.black, args.games);

    let mut red = Player::build(args.red, &config, book.as_deref(), args.seed)?;
    let mut black = Player::build(args.black, &config, book.as_deref(), args.seed.map(|s| s.wrapping_add(1)))?;
    let mut tally = Tally::default();
    let mut recorded = Vec::new();

    for n in 1..=args.games {
        red.new_game();
        black.new_game();
        let mut game = start_position(args.fen.as_deref())?;
        play_game(&mut game, &mut red, &mut black, limit, args.max_plies)?;

        match game.status {
            GameStatus::Won { winner: Color::Red, reason } => {
                tally.red += 1;
                info!("game {n}: red wins ({reason:?}) after {} plies", game.history().len());
            }
            GameStatus::Won { winner: Color::Black, reason } => {
                tally.black += 1;
                info!("game {n}: black wins ({reason:?}) after {} plies", game.history().len());
            }
            GameStatus::Draw | GameStatus::Playing => {
                tally.draws += 1;
                info!("game {n}: draw after {} plies", game.history().len());
            }
        }
        debug!("final position {}", game.board().to_fen_string(game.turn));
        if args.write_book.is_some() {
            recorded.push(game.history().clone());
        }
    }

    if let Some(path) = &args.write_book {
        let book = OpeningBook::from_games(&recorded, args.book_plies, ZobristTable::global());
        std::fs::write(path, book.to_json()?).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {} book positions to {}", book.len(), path.display());
    }

    println!("red {} / black {} / draws {}", tally.red, tally.black, tally.draws);
    Ok(())
}
