//! Checkers-Rust: a checkers rule engine with a lookahead computer player.
//!
//! ## Usage
//!
//! - `checkers-rust` - Show a demo
//! - `checkers-rust play` - Start the text protocol on stdin/stdout
//! - `checkers-rust demo` - Let two computer players play each other

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use checkers_rust::engine::{GameEngine, TurnState};
use checkers_rust::moves::{chain_to_string, generate_all_moves};
use checkers_rust::player::{Player, PlayerId, Players};
use checkers_rust::position::Vertical;
use checkers_rust::protocol::ProtocolEngine;
use checkers_rust::search::{SearchConfig, SearchError};

/// Checkers-Rust: checkers with a lookahead computer player
#[derive(Parser)]
#[command(name = "checkers-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol for use by a front-end
    Play {
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Let two computer players play a game against each other
    Demo {
        #[command(flatten)]
        search: SearchArgs,

        /// Seed for the random opening
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Number of turns played at random before the search takes over
        #[arg(long, default_value_t = 2)]
        random_opening: usize,

        /// Stop after this many turns
        #[arg(long, default_value_t = 200)]
        max_turns: usize,
    },
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Deepest thought level (the root is level 0)
    #[arg(long, default_value_t = checkers_rust::constants::SEARCH_DEPTH)]
    depth: usize,

    /// Best potential moves kept per level
    #[arg(long, default_value_t = checkers_rust::constants::TOP_MOVE_PRUNING)]
    top: usize,

    /// Worst potential moves kept per level
    #[arg(long, default_value_t = checkers_rust::constants::BOTTOM_MOVE_PRUNING)]
    bottom: usize,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.depth,
            top_k: self.top,
            bottom_k: self.bottom,
            ..SearchConfig::default()
        }
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Play { search }) => {
            let mut engine = ProtocolEngine::with_config(Players::standard(), search.config());
            engine.run().context("protocol loop failed")
        }
        Some(Commands::Demo {
            search,
            seed,
            random_opening,
            max_turns,
        }) => run_demo(search.config(), seed, random_opening, max_turns),
        None => run_demo(SearchConfig::default(), 1, 2, 200),
    }
}

/// Play one turn by picking uniformly among the active player's moves,
/// continuing any capture chain at random as well.
fn play_random_turn(game: &mut GameEngine, rng: &mut fastrand::Rng) -> Result<String> {
    let moves = generate_all_moves(game.board(), game.active_player());
    if moves.is_empty() {
        bail!(SearchError::NoLegalMoves(game.active_player()));
    }
    let mut mv = moves[rng.usize(..moves.len())];
    let mut played = vec![mv];
    game.select_tile(mv.target);
    game.select_tile(mv.destination);

    while let TurnState::ChainSelected { valid_moves, .. } = game.state() {
        mv = valid_moves[rng.usize(..valid_moves.len())];
        played.push(mv);
        game.select_tile(mv.destination);
    }
    game.drain_events();
    Ok(chain_to_string(&played))
}

fn run_demo(config: SearchConfig, seed: u64, random_opening: usize, max_turns: usize) -> Result<()> {
    println!("Checkers-Rust: lookahead AI self-play\n");

    let players = Players::new(
        Player::ai("Red", 'r', Vertical::Down, config.clone()),
        Player::ai("Black", 'b', Vertical::Up, config),
    )?;
    let symbols = [
        players.get(PlayerId::FIRST).symbol,
        players.get(PlayerId::SECOND).symbol,
    ];
    let mut game = GameEngine::new(players);
    let mut rng = fastrand::Rng::with_seed(seed);

    println!("{}", game.board().render(symbols));

    for turn in 1..=max_turns {
        let active = game.active_player();
        let name = game.players().get(active).name.clone();

        if !game.has_legal_moves() {
            println!("{name} has no legal moves; {} wins", game.players().get(active.other()).name);
            return Ok(());
        }

        let played = if turn <= random_opening {
            play_random_turn(&mut game, &mut rng)?
        } else {
            let chain = game
                .take_ai_turn()
                .with_context(|| format!("search failed for {name}"))?;
            game.drain_events();
            chain_to_string(&chain)
        };

        info!(turn, player = %name, %played, "turn played");
        println!("{turn:>3}. {name}: {played}");
        println!("{}", game.board().render(symbols));

        if let Some(winner) = game.winner() {
            println!("{} wins after {turn} turns", game.players().get(winner).name);
            return Ok(());
        }
    }

    println!("No winner after {max_turns} turns");
    Ok(())
}
