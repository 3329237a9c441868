//! arrocco entry point: UCI engine loop (default) or a game between two
//! move-selection backends.

use std::process::ExitCode;

use arrocco::player::{MinimaxPlayer, MoveSelector, RandomPlayer, ShakmatyPlayer};
use arrocco::search::{SearchParams, DEFAULT_DEPTH};
use arrocco::uci::{run_uci_loop, EngineClient, EngineConfig};
use arrocco::{Color, Game, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Speak UCI on stdin/stdout
    Uci {
        /// Depth used when `go` has none
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_DEPTH,
            value_parser = clap::value_parser!(u8).range(1..)
        )]
        depth: u8,
    },
    /// Play a game between two backends and print it
    Play {
        #[arg(long, value_enum, default_value_t = Backend::Minimax)]
        white: Backend,

        #[arg(long, value_enum, default_value_t = Backend::Random)]
        black: Backend,

        /// Minimax depth in plies
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_DEPTH,
            value_parser = clap::value_parser!(u8).range(1..)
        )]
        depth: u8,

        /// Seed for the random backends
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// External UCI engine executable for the `uci` backend
        #[arg(long, default_value = "stockfish")]
        engine: String,

        /// Depth requested from the external engine
        #[arg(
            long,
            default_value_t = 10,
            value_parser = clap::value_parser!(u8).range(1..)
        )]
        engine_depth: u8,

        /// Stop after this many plies
        #[arg(long, default_value_t = 200)]
        max_plies: u32,

        /// Starting position
        #[arg(long)]
        fen: Option<String>,

        /// Print backend statistics after every move
        #[arg(long)]
        stats: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    Minimax,
    Random,
    Shakmaty,
    Uci,
}

struct PlayOptions {
    depth: u8,
    seed: u64,
    engine: String,
    engine_depth: u8,
}

fn build_player(
    backend: Backend,
    opts: &PlayOptions,
    salt: u64,
) -> Result<Box<dyn MoveSelector>> {
    let rng = StdRng::seed_from_u64(opts.seed.wrapping_add(salt));
    let player: Box<dyn MoveSelector> = match backend {
        Backend::Minimax => Box::new(MinimaxPlayer::new(SearchParams::new().depth(opts.depth))),
        Backend::Random => Box::new(RandomPlayer::new(rng)),
        Backend::Shakmaty => Box::new(ShakmatyPlayer::new(rng)),
        Backend::Uci => {
            let config = EngineConfig::new(opts.engine.clone()).depth(opts.engine_depth);
            Box::new(EngineClient::start(config)?)
        }
    };
    Ok(player)
}

fn play(
    white: Backend,
    black: Backend,
    opts: PlayOptions,
    max_plies: u32,
    fen: Option<String>,
    stats: bool,
) -> Result<()> {
    let mut game = match fen {
        Some(f) => Game::from_fen(&f)?,
        None => Game::new(),
    };
    let mut white_player = build_player(white, &opts, 0)?;
    let mut black_player = build_player(black, &opts, 1)?;

    for ply in 0..max_plies {
        let side = game.side();
        let player = match side {
            Color::White => white_player.as_mut(),
            Color::Black => black_player.as_mut(),
        };
        let started = std::time::Instant::now();
        match game.step(player) {
            Ok(Some(mv)) => {
                println!(
                    "{:>3}. {:?} {} ({} ms)",
                    ply + 1,
                    side,
                    mv,
                    started.elapsed().as_millis()
                );
                if stats {
                    player.report();
                }
            }
            Ok(None) => break,
            Err(e) => {
                // Backend failure: decline to move, leave the board as is
                eprintln!("{:?} declines to move: {}", side, e);
                break;
            }
        }
        if game.status().is_over {
            break;
        }
    }

    println!("{}", game.board());
    println!("{}", game.board().to_fen(game.side()));
    let status = game.status();
    match (status.is_over, status.winner, status.reason) {
        (true, Some(winner), Some(reason)) => println!("{:?}: {:?} wins", reason, winner),
        (true, None, Some(reason)) => println!("{:?}: draw", reason),
        _ => println!("game unfinished"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match args.command.unwrap_or(Cmd::Uci { depth: DEFAULT_DEPTH }) {
        Cmd::Uci { depth } => {
            if let Err(e) = run_uci_loop(SearchParams::new().depth(depth)) {
                eprintln!("UCI loop failed: {:?}", e);
                return ExitCode::FAILURE;
            }
        }
        Cmd::Play {
            white,
            black,
            depth,
            seed,
            engine,
            engine_depth,
            max_plies,
            fen,
            stats,
        } => {
            let opts = PlayOptions {
                depth,
                seed,
                engine,
                engine_depth,
            };
            if let Err(e) = play(white, black, opts, max_plies, fen, stats) {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
